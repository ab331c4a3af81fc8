//! 로그아웃 내비게이션 어댑터.
//!
//! 헤드리스 클라이언트에는 브라우저가 없으므로 대상을 로그로 남기고
//! 앱 종료 신호를 보내는 것으로 전체 페이지 이동을 대신한다.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use jikimi_core::error::CoreError;
use jikimi_core::ports::navigator::SignOutNavigator;

use crate::lifecycle::LifecycleManager;

/// 로그 기반 내비게이터 — `SignOutNavigator` 포트 구현
pub struct LoggingNavigator {
    lifecycle: Arc<LifecycleManager>,
    last_target: Mutex<Option<String>>,
}

impl LoggingNavigator {
    /// 새 내비게이터 생성
    pub fn new(lifecycle: Arc<LifecycleManager>) -> Self {
        Self {
            lifecycle,
            last_target: Mutex::new(None),
        }
    }

    /// 마지막 이동 대상
    pub fn last_target(&self) -> Option<String> {
        self.last_target.lock().expect("대상 잠금 오염").clone()
    }
}

#[async_trait]
impl SignOutNavigator for LoggingNavigator {
    async fn navigate(&self, location: &str) -> Result<(), CoreError> {
        info!("로그아웃 대상으로 이동: {location}");
        *self.last_target.lock().expect("대상 잠금 오염") = Some(location.to_string());
        self.lifecycle.shutdown();
        Ok(())
    }
}
