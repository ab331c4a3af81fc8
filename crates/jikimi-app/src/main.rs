//! # jikimi-app
//!
//! 지킴이 클라이언트 바이너리 진입점.
//! DI 컨테이너 역할, 라이프사이클 관리, 콘솔 어댑터 와이어링.

mod console_dialog;
mod lifecycle;
mod navigator;
mod stdin_input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jikimi_core::config_manager::ConfigManager;
use jikimi_core::ports::dialog::WarningDialog;
use jikimi_core::ports::keep_alive::KeepAliveClient;
use jikimi_core::ports::navigator::SignOutNavigator;
use jikimi_monitor::SessionTimeoutMonitor;
use jikimi_network::keep_alive::HttpKeepAliveClient;

use crate::console_dialog::ConsoleWarningDialog;
use crate::lifecycle::LifecycleManager;
use crate::navigator::LoggingNavigator;

/// 지킴이 — 세션 타임아웃 지킴이
///
/// 세션 만료를 경고하고, 연장하거나, 강제 로그아웃한다.
#[derive(Parser, Debug)]
#[command(name = "jikimi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 전체 세션 타임아웃 (초)
    #[arg(long)]
    timeout: Option<u64>,

    /// 경고 리드 타임 (초)
    #[arg(long)]
    countdown: Option<u64>,

    /// keep-alive 엔드포인트
    #[arg(long)]
    keep_alive_url: Option<String>,

    /// 로그아웃 대상
    #[arg(long)]
    logout_url: Option<String>,

    /// ESC 키를 연장 동작으로 처리
    #[arg(long)]
    close_on_escape: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "jikimi={lvl},jikimi_app={lvl},jikimi_core={lvl},jikimi_monitor={lvl},jikimi_network={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("지킴이 클라이언트 시작");

    // 설정 로드 + CLI 오버라이드
    let manager = match args.config {
        Some(path) => ConfigManager::with_path(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = manager.get();

    if let Some(timeout) = args.timeout {
        config.session.timeout_secs = timeout;
    }
    if let Some(countdown) = args.countdown {
        config.session.countdown_secs = countdown;
    }
    if let Some(url) = args.keep_alive_url {
        config.session.keep_alive_url = url;
    }
    if let Some(url) = args.logout_url {
        config.session.logout_url = Some(url);
    }
    if args.close_on_escape {
        config.session.close_on_escape = true;
    }
    config.validate()?;

    info!(
        "설정: 타임아웃={}초, 경고 리드={}초, keep-alive={}",
        config.session.timeout_secs, config.session.countdown_secs, config.session.keep_alive_url
    );

    // 어댑터 와이어링
    let lifecycle = Arc::new(LifecycleManager::new());
    let keep_alive: Arc<dyn KeepAliveClient> = Arc::new(HttpKeepAliveClient::new(
        &config.session.keep_alive_url,
        config.request_timeout(),
    )?);
    let dialog: Arc<dyn WarningDialog> = Arc::new(ConsoleWarningDialog::new());
    let navigator: Arc<dyn SignOutNavigator> = Arc::new(LoggingNavigator::new(lifecycle.clone()));

    let monitor = Arc::new(SessionTimeoutMonitor::start(
        config, keep_alive, dialog, navigator,
    )?);

    // 입력 루프 + 시그널 대기
    let input_task = tokio::spawn(stdin_input::run(monitor.clone(), lifecycle.subscribe()));
    let signal_task = tokio::spawn({
        let lifecycle = lifecycle.clone();
        async move { lifecycle.wait_for_signal().await }
    });

    // 종료 신호 또는 모니터 최종 단계 대기
    let mut shutdown_rx = lifecycle.subscribe();
    let mut phase_rx = monitor.subscribe();
    tokio::select! {
        _ = shutdown_rx.changed() => {}
        _ = async {
            while phase_rx.changed().await.is_ok() {
                if phase_rx.borrow().is_terminal() {
                    break;
                }
            }
        } => {
            info!("모니터 최종 단계 감지");
        }
    }

    monitor.dispose().await;
    input_task.abort();
    signal_task.abort();

    info!("지킴이 클라이언트 종료");
    Ok(())
}
