//! 표준 입력 명령 루프.
//!
//! 터미널 입력을 모니터 명령으로 변환한다.
//! Enter 또는 `k` → 연장, `esc` → ESC 이벤트, `q` → 해체.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::warn;

use jikimi_monitor::SessionTimeoutMonitor;

/// 입력 루프 구동. 종료 신호나 EOF에서 반환한다.
pub async fn run(monitor: Arc<SessionTimeoutMonitor>, mut shutdown_rx: watch::Receiver<bool>) {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = shutdown_rx.changed() => return,
        };

        match line {
            Ok(Some(input)) => match input.trim() {
                "" | "k" => monitor.extend().await,
                "esc" => monitor.escape_pressed().await,
                "q" => {
                    monitor.dispose().await;
                    return;
                }
                other => {
                    println!("알 수 없는 입력: {other} (Enter=연장, esc=ESC, q=종료)");
                }
            },
            Ok(None) => return, // EOF
            Err(e) => {
                warn!("입력 읽기 실패: {e}");
                return;
            }
        }
    }
}
