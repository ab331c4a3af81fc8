//! 콘솔 경고 다이얼로그 어댑터.
//!
//! `WarningDialog` 포트의 터미널 구현.
//! 경고 본문과 카운트다운을 표준 출력으로 렌더링한다.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Local;
use tracing::debug;

use jikimi_core::error::CoreError;
use jikimi_core::models::time::CountdownDisplay;
use jikimi_core::ports::dialog::{WarningDialog, WarningView};

/// 콘솔 다이얼로그
#[derive(Default)]
pub struct ConsoleWarningDialog {
    /// 다이얼로그가 열려 있는지 여부
    open: AtomicBool,
}

impl ConsoleWarningDialog {
    /// 새 콘솔 다이얼로그 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 다이얼로그 표시 여부
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WarningDialog for ConsoleWarningDialog {
    async fn show(&self, view: &WarningView) -> Result<(), CoreError> {
        self.open.store(true, Ordering::SeqCst);

        let expires_local = view.expires_at.with_timezone(&Local);
        println!();
        println!("┌──────────────────────────────────────────────┐");
        println!("│ ⚠️  {}", view.title);
        println!("├──────────────────────────────────────────────┤");
        println!("│ {}", view.message);
        println!("│ 조치가 없으면 {}에 로그아웃됩니다.", expires_local.format("%H:%M:%S"));
        println!("│");
        println!("│ [Enter] {}   [q] 종료", view.keep_alive_label);
        println!("└──────────────────────────────────────────────┘");

        Ok(())
    }

    async fn update_countdown(&self, display: CountdownDisplay) -> Result<(), CoreError> {
        if !self.is_open() {
            debug!("닫힌 다이얼로그에 대한 카운트다운 갱신 무시");
            return Ok(());
        }

        println!("  남은 시간: {display}");
        Ok(())
    }

    async fn close(&self) -> Result<(), CoreError> {
        if self.open.swap(false, Ordering::SeqCst) {
            println!("  (경고 다이얼로그 닫힘)");
        }
        Ok(())
    }

    async fn set_scroll_lock(&self, locked: bool) -> Result<(), CoreError> {
        // 터미널에는 스크롤 잠금 개념이 없다 — 상태만 기록
        debug!("배경 스크롤 잠금: {locked}");
        Ok(())
    }
}
