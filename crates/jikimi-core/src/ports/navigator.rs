//! 로그아웃 내비게이션 포트.
//!
//! 구현: `jikimi-app` crate

use async_trait::async_trait;

use crate::error::CoreError;

/// 전체 페이지 이동 인터페이스
///
/// 모니터는 종료 시 이 포트로 한 번 이동을 요청할 뿐,
/// 추가 협상은 하지 않는다.
#[async_trait]
pub trait SignOutNavigator: Send + Sync {
    /// 대상 위치로 이동
    async fn navigate(&self, location: &str) -> Result<(), CoreError>;
}
