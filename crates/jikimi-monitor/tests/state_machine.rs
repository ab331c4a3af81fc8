//! 상태 머신 통합 테스트.
//!
//! 멈춘 tokio 시계(start_paused)로 타이머 체인을 결정적으로 검증한다.
//! 테스트 태스크가 타이머 없이 대기하면 시계가 다음 타이머까지
//! 자동으로 전진하므로, 긴 타임아웃도 실시간 없이 돈다.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::Instant;

use jikimi_core::config::AppConfig;
use jikimi_core::error::CoreError;
use jikimi_core::models::phase::{MonitorPhase, SignOutReason};
use jikimi_core::models::time::CountdownDisplay;
use jikimi_core::ports::dialog::{WarningDialog, WarningView};
use jikimi_core::ports::keep_alive::{KeepAliveClient, KeepAliveVerdict};
use jikimi_core::ports::navigator::SignOutNavigator;
use jikimi_monitor::SessionTimeoutMonitor;

/// 표시/갱신/제거 호출을 전부 기록하는 목 다이얼로그
#[derive(Default)]
struct RecordingDialog {
    views: Mutex<Vec<WarningView>>,
    show_times: Mutex<Vec<Instant>>,
    updates: Mutex<Vec<CountdownDisplay>>,
    closes: AtomicU32,
    scroll_locks: Mutex<Vec<bool>>,
}

impl RecordingDialog {
    fn shows(&self) -> Vec<Instant> {
        self.show_times.lock().unwrap().clone()
    }

    fn updates(&self) -> Vec<CountdownDisplay> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarningDialog for RecordingDialog {
    async fn show(&self, view: &WarningView) -> Result<(), CoreError> {
        self.views.lock().unwrap().push(view.clone());
        self.show_times.lock().unwrap().push(Instant::now());
        Ok(())
    }

    async fn update_countdown(&self, display: CountdownDisplay) -> Result<(), CoreError> {
        self.updates.lock().unwrap().push(display);
        Ok(())
    }

    async fn close(&self) -> Result<(), CoreError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_scroll_lock(&self, locked: bool) -> Result<(), CoreError> {
        self.scroll_locks.lock().unwrap().push(locked);
        Ok(())
    }
}

/// 판정을 고정해서 돌려주는 목 keep-alive 클라이언트
struct StubKeepAlive {
    /// None이면 전송 계층 에러를 흉내낸다
    verdict: Option<KeepAliveVerdict>,
    calls: AtomicU32,
}

impl StubKeepAlive {
    fn granting() -> Self {
        Self {
            verdict: Some(KeepAliveVerdict::Granted),
            calls: AtomicU32::new(0),
        }
    }

    fn denying() -> Self {
        Self {
            verdict: Some(KeepAliveVerdict::Denied),
            calls: AtomicU32::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            verdict: None,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeepAliveClient for StubKeepAlive {
    async fn extend_session(&self) -> Result<KeepAliveVerdict, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.verdict {
            Some(v) => Ok(v),
            None => Err(CoreError::Network("연결 끊김".to_string())),
        }
    }
}

/// 이동 대상을 기록하는 목 내비게이터
#[derive(Default)]
struct RecordingNavigator {
    targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignOutNavigator for RecordingNavigator {
    async fn navigate(&self, location: &str) -> Result<(), CoreError> {
        self.targets.lock().unwrap().push(location.to_string());
        Ok(())
    }
}

const LOGOUT_URL: &str = "https://tax.example/sign-out";
const REDIRECT_URL: &str = "https://tax.example/";

fn test_config(timeout: u64, countdown: u64) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.session.timeout_secs = timeout;
    config.session.countdown_secs = countdown;
    config.session.keep_alive_url = "https://tax.example/keep-alive".to_string();
    config.session.logout_url = Some(LOGOUT_URL.to_string());
    config.session.logout_redirect_url = REDIRECT_URL.to_string();
    config
}

struct Harness {
    monitor: SessionTimeoutMonitor,
    dialog: Arc<RecordingDialog>,
    keep_alive: Arc<StubKeepAlive>,
    navigator: Arc<RecordingNavigator>,
    phase_rx: watch::Receiver<MonitorPhase>,
}

fn start(config: AppConfig, keep_alive: StubKeepAlive) -> Harness {
    let dialog = Arc::new(RecordingDialog::default());
    let keep_alive = Arc::new(keep_alive);
    let navigator = Arc::new(RecordingNavigator::default());

    let monitor = SessionTimeoutMonitor::start(
        config,
        keep_alive.clone(),
        dialog.clone(),
        navigator.clone(),
    )
    .expect("모니터 시작 실패");
    let phase_rx = monitor.subscribe();

    Harness {
        monitor,
        dialog,
        keep_alive,
        navigator,
        phase_rx,
    }
}

impl Harness {
    /// 조건을 만족하는 단계가 올 때까지 대기
    async fn wait_until(&mut self, pred: impl Fn(MonitorPhase) -> bool) -> MonitorPhase {
        loop {
            let current = *self.phase_rx.borrow_and_update();
            if pred(current) {
                return current;
            }
            self.phase_rx.changed().await.expect("단계 채널 닫힘");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn warning_fires_at_exact_lead_time() {
    let t0 = Instant::now();
    let mut h = start(test_config(1800, 120), StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;

    let shows = h.dialog.shows();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].duration_since(t0), Duration::from_secs(1680));

    h.monitor.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn extend_while_idle_is_ignored() {
    let t0 = Instant::now();
    let mut h = start(test_config(1800, 120), StubKeepAlive::granting());

    // 다이얼로그가 없는 동안의 연장은 아무 효과가 없어야 한다
    h.monitor.extend().await;
    h.monitor.escape_pressed().await;

    h.wait_until(|p| p == MonitorPhase::Warning).await;

    assert_eq!(h.keep_alive.calls(), 0);
    assert_eq!(
        h.dialog.shows()[0].duration_since(t0),
        Duration::from_secs(1680)
    );

    h.monitor.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_to_zero_and_forces_sign_out() {
    let mut h = start(test_config(10, 3), StubKeepAlive::granting());

    let phase = h.wait_until(|p| p.is_terminal()).await;
    assert_matches!(phase, MonitorPhase::Terminated(SignOutReason::CountdownExpired));

    assert_eq!(
        h.dialog.updates(),
        vec![
            CountdownDisplay::Seconds(2),
            CountdownDisplay::Seconds(1),
            CountdownDisplay::Seconds(0),
        ]
    );
    assert_eq!(h.navigator.targets(), vec![LOGOUT_URL.to_string()]);
    assert!(h.dialog.closes.load(Ordering::SeqCst) >= 1);
    assert_eq!(h.keep_alive.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn countdown_of_120_takes_exactly_120_ticks() {
    let mut h = start(test_config(1800, 120), StubKeepAlive::granting());

    h.wait_until(|p| p.is_terminal()).await;

    let updates = h.dialog.updates();
    assert_eq!(updates.len(), 120);
    assert_eq!(updates[0], CountdownDisplay::Seconds(119));
    assert_eq!(updates[59], CountdownDisplay::Seconds(60));
    assert_eq!(updates[119], CountdownDisplay::Seconds(0));

    // 최초 표시는 분 단위
    let views = h.dialog.views.lock().unwrap();
    assert_eq!(views[0].initial_display, CountdownDisplay::Minutes(2));
}

#[tokio::test(start_paused = true)]
async fn minute_boundary_rendered_as_minutes_during_countdown() {
    let mut h = start(test_config(200, 121), StubKeepAlive::granting());

    h.wait_until(|p| p.is_terminal()).await;

    let updates = h.dialog.updates();
    assert_eq!(updates.len(), 121);
    // 남은 시간 120초: 60초 초과 + 분 경계 → 분 단위
    assert_eq!(updates[0], CountdownDisplay::Minutes(2));
    assert_eq!(updates[1], CountdownDisplay::Seconds(119));
    // 남은 시간 60초부터는 초 단위
    assert_eq!(updates[60], CountdownDisplay::Seconds(60));
    assert_eq!(updates[120], CountdownDisplay::Seconds(0));
}

#[tokio::test(start_paused = true)]
async fn extend_granted_with_restart_rearms_full_timer() {
    let mut h = start(test_config(100, 10), StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.extend().await;
    h.wait_until(|p| p == MonitorPhase::Idle).await;

    assert_eq!(h.keep_alive.calls(), 1);
    assert!(h.dialog.closes.load(Ordering::SeqCst) >= 1);

    // 재장전된 타이머는 연장 시점부터 다시 timeout - countdown
    h.wait_until(|p| p == MonitorPhase::Warning).await;
    let shows = h.dialog.shows();
    assert_eq!(shows.len(), 2);
    assert_eq!(shows[1].duration_since(shows[0]), Duration::from_secs(90));

    // 연장과 재경고 사이에 떠도는 카운트다운 틱이 없어야 한다 (직렬 체인)
    assert_eq!(h.dialog.updates().len(), 0);

    h.monitor.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn extend_granted_without_restart_goes_dormant() {
    let mut config = test_config(100, 10);
    config.session.restart_on_yes = false;
    let mut h = start(config, StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.extend().await;
    h.wait_until(|p| p == MonitorPhase::Dormant).await;

    // 시간이 아무리 지나도 더는 아무 일도 없다
    tokio::time::advance(Duration::from_secs(10_000)).await;
    tokio::task::yield_now().await;

    assert_eq!(h.monitor.phase(), MonitorPhase::Dormant);
    assert_eq!(h.dialog.shows().len(), 1);
    assert!(h.navigator.targets().is_empty());

    h.monitor.dispose().await;
    assert_eq!(h.monitor.phase(), MonitorPhase::Disposed);
}

#[tokio::test(start_paused = true)]
async fn extend_denied_signs_out_to_logout_url() {
    let mut h = start(test_config(100, 10), StubKeepAlive::denying());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.extend().await;

    let phase = h.wait_until(|p| p.is_terminal()).await;
    assert_matches!(phase, MonitorPhase::Terminated(SignOutReason::KeepAliveDenied));
    assert_eq!(h.navigator.targets(), vec![LOGOUT_URL.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn keep_alive_transport_failure_treated_as_denied() {
    let mut h = start(test_config(100, 10), StubKeepAlive::failing());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.extend().await;

    let phase = h.wait_until(|p| p.is_terminal()).await;
    assert_matches!(phase, MonitorPhase::Terminated(SignOutReason::KeepAliveDenied));
    assert_eq!(h.keep_alive.calls(), 1);
    assert_eq!(h.navigator.targets(), vec![LOGOUT_URL.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn escape_ignored_when_disabled() {
    let mut h = start(test_config(10, 3), StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.escape_pressed().await;

    // ESC가 무시되어 카운트다운이 계속 진행, 만료로 종료
    let phase = h.wait_until(|p| p.is_terminal()).await;
    assert_matches!(phase, MonitorPhase::Terminated(SignOutReason::CountdownExpired));
    assert_eq!(h.keep_alive.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn escape_acts_as_extend_when_enabled() {
    let mut config = test_config(100, 10);
    config.session.close_on_escape = true;
    let mut h = start(config, StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.escape_pressed().await;
    h.wait_until(|p| p == MonitorPhase::Idle).await;

    assert_eq!(h.keep_alive.calls(), 1);

    h.monitor.dispose().await;
}

#[tokio::test(start_paused = true)]
async fn forced_expiry_uses_redirect_when_logout_url_missing() {
    let mut config = test_config(10, 3);
    config.session.logout_url = None;
    let mut h = start(config, StubKeepAlive::granting());

    let phase = h.wait_until(|p| p.is_terminal()).await;

    // 강제 만료도 리다이렉트 대상으로 이동한다
    assert_matches!(phase, MonitorPhase::Terminated(SignOutReason::CountdownExpired));
    assert_eq!(h.navigator.targets(), vec![REDIRECT_URL.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn scroll_lock_toggled_around_warning() {
    let mut config = test_config(10, 3);
    config.session.background_no_scroll = true;
    let mut h = start(config, StubKeepAlive::granting());

    h.wait_until(|p| p.is_terminal()).await;

    assert_eq!(h.dialog.scroll_locks.lock().unwrap().clone(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn dispose_in_idle_cancels_armed_timer() {
    let h = start(test_config(1800, 120), StubKeepAlive::granting());

    h.monitor.dispose().await;
    assert_eq!(h.monitor.phase(), MonitorPhase::Disposed);

    // 타이머가 남아있지 않다 — 시간이 지나도 경고가 뜨지 않는다
    tokio::time::advance(Duration::from_secs(3600)).await;
    tokio::task::yield_now().await;
    assert!(h.dialog.shows().is_empty());

    // 두 번째 호출도 안전
    h.monitor.dispose().await;
    assert_eq!(h.monitor.phase(), MonitorPhase::Disposed);
}

#[tokio::test(start_paused = true)]
async fn dispose_in_warning_closes_dialog_without_navigation() {
    let mut h = start(test_config(100, 10), StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;
    h.monitor.dispose().await;

    assert_eq!(h.monitor.phase(), MonitorPhase::Disposed);
    assert!(h.dialog.closes.load(Ordering::SeqCst) >= 1);
    assert!(h.navigator.targets().is_empty());
    assert_eq!(h.keep_alive.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn dispose_after_termination_is_safe() {
    let mut h = start(test_config(10, 3), StubKeepAlive::granting());

    h.wait_until(|p| p.is_terminal()).await;
    h.monitor.dispose().await;
    h.monitor.dispose().await;

    assert_matches!(
        h.monitor.phase(),
        MonitorPhase::Terminated(SignOutReason::CountdownExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn warning_view_renders_templates() {
    let mut h = start(test_config(900, 120), StubKeepAlive::granting());

    h.wait_until(|p| p == MonitorPhase::Warning).await;

    let views = h.dialog.views.lock().unwrap();
    assert_eq!(views[0].title, "곧 로그아웃됩니다");
    assert_eq!(
        views[0].message,
        "보안을 위해 2분 동안 활동이 없으면 자동으로 로그아웃됩니다."
    );
    assert_eq!(views[0].keep_alive_label, "15분 더 사용하기");
    drop(views);

    h.monitor.dispose().await;
}

#[tokio::test]
async fn invalid_config_rejected_at_start() {
    let dialog = Arc::new(RecordingDialog::default());
    let keep_alive = Arc::new(StubKeepAlive::granting());
    let navigator = Arc::new(RecordingNavigator::default());

    let mut config = test_config(60, 60);
    config.session.countdown_secs = 60; // timeout과 같음 — 유효하지 않음

    let result = SessionTimeoutMonitor::start(config, keep_alive, dialog, navigator);
    assert_matches!(result, Err(CoreError::Config(_)));
}
