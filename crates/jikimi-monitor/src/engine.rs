//! 세션 타임아웃 상태 머신 엔진.
//!
//! 전환 테이블은 [`Engine::run`]과 그 하위 `run_*` 함수에 모여 있다.
//! 타이머 체인은 항상 직렬이다: 경고 대기 타이머(sleep)와 카운트다운
//! 티커(interval)가 동시에 살아있는 순간이 없다.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use jikimi_core::config::AppConfig;
use jikimi_core::error::CoreError;
use jikimi_core::models::event::MonitorCommand;
use jikimi_core::models::phase::{MonitorPhase, SignOutReason};
use jikimi_core::models::time::{CountdownDisplay, TimeParts};
use jikimi_core::ports::dialog::{WarningDialog, WarningView};
use jikimi_core::ports::keep_alive::{KeepAliveClient, KeepAliveVerdict};
use jikimi_core::ports::navigator::SignOutNavigator;
use jikimi_core::template;

/// 명령 채널 버퍼 크기
const COMMAND_BUFFER: usize = 8;

/// 세션 타임아웃 모니터
///
/// 호스트(페이지) 수명 주기가 소유하는 단일 인스턴스.
/// [`SessionTimeoutMonitor::start`]가 엔진 태스크 하나를 생성하고,
/// 이 핸들은 명령 전송과 단계 관측만 담당한다.
/// 핸들이 dispose 없이 드롭되면 엔진은 해체 경로로 종료된다.
#[derive(Debug)]
pub struct SessionTimeoutMonitor {
    cmd_tx: mpsc::Sender<MonitorCommand>,
    phase_rx: watch::Receiver<MonitorPhase>,
    engine: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTimeoutMonitor {
    /// 모니터 시작 — 경고 타이머 체인을 정확히 한 번 장전한다.
    ///
    /// tokio 런타임 위에서 호출해야 한다.
    pub fn start(
        config: AppConfig,
        keep_alive: Arc<dyn KeepAliveClient>,
        dialog: Arc<dyn WarningDialog>,
        navigator: Arc<dyn SignOutNavigator>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (phase_tx, phase_rx) = watch::channel(MonitorPhase::Idle);

        let engine = Engine {
            config,
            keep_alive,
            dialog,
            navigator,
            cmd_rx,
            phase_tx,
        };
        let handle = tokio::spawn(engine.run());

        Ok(Self {
            cmd_tx,
            phase_rx,
            engine: Mutex::new(Some(handle)),
        })
    }

    /// 현재 단계
    pub fn phase(&self) -> MonitorPhase {
        *self.phase_rx.borrow()
    }

    /// 단계 변경 수신기 생성
    pub fn subscribe(&self) -> watch::Receiver<MonitorPhase> {
        self.phase_rx.clone()
    }

    /// 사용자 연장 동작 (keep-alive 버튼)
    ///
    /// 경고 단계가 아니면 무시된다.
    pub async fn extend(&self) {
        self.send(MonitorCommand::ExtendSession).await;
    }

    /// ESC 키 입력 전달
    ///
    /// `close_on_escape` 설정 시에만 연장으로 처리된다.
    pub async fn escape_pressed(&self) {
        self.send(MonitorCommand::EscapePressed).await;
    }

    /// 모니터 해체
    ///
    /// 어느 단계에서든 안전하고 멱등이다. 엔진 태스크가 타이머를
    /// 정리하고 종료할 때까지 대기한다.
    pub async fn dispose(&self) {
        self.send(MonitorCommand::Dispose).await;
        if let Some(handle) = self.engine.lock().await.take() {
            if let Err(e) = handle.await {
                warn!("엔진 태스크 join 실패: {e}");
            }
        }
    }

    async fn send(&self, cmd: MonitorCommand) {
        if self.cmd_tx.send(cmd).await.is_err() {
            debug!("엔진이 이미 종료됨 — {cmd:?} 무시");
        }
    }
}

/// Idle 단계 종료 사유
enum ArmedOutcome {
    /// 경고 타이머 발화
    WarningDue,
    /// 해체 요청 (또는 핸들 드롭)
    Disposed,
}

/// Warning 단계 종료 사유
enum WarningOutcome {
    /// 연장 성공 + restart_on_yes — 타이머 재장전
    Rearm,
    /// 연장 성공, 재장전 없음 — 휴면
    Dormant,
    /// 로그아웃 (만료 또는 연장 거부)
    SignOut(SignOutReason),
    /// 해체 요청
    Disposed,
}

/// Warning 단계의 select 루프가 고른 다음 행동
enum WarnAction {
    Expired,
    Extend,
    Dispose,
}

/// 엔진 — 상태 머신 본체
struct Engine {
    config: AppConfig,
    keep_alive: Arc<dyn KeepAliveClient>,
    dialog: Arc<dyn WarningDialog>,
    navigator: Arc<dyn SignOutNavigator>,
    cmd_rx: mpsc::Receiver<MonitorCommand>,
    phase_tx: watch::Sender<MonitorPhase>,
}

impl Engine {
    /// 상태 머신 구동. 태스크 하나가 이 함수 안에서 생애를 마친다.
    async fn run(mut self) {
        info!(
            "세션 타임아웃 모니터 시작: 타임아웃={}초, 경고 리드={}초",
            self.config.session.timeout_secs, self.config.session.countdown_secs
        );

        loop {
            if let ArmedOutcome::Disposed = self.run_idle().await {
                self.finish_disposed().await;
                return;
            }

            match self.run_warning().await {
                WarningOutcome::Rearm => continue,
                WarningOutcome::Dormant => {
                    self.set_phase(MonitorPhase::Dormant);
                    info!("휴면 상태 — 추가 타이머 없음");
                    self.run_dormant().await;
                    self.finish_disposed().await;
                    return;
                }
                WarningOutcome::SignOut(reason) => {
                    self.sign_out(reason).await;
                    return;
                }
                WarningOutcome::Disposed => {
                    self.finish_disposed().await;
                    return;
                }
            }
        }
    }

    /// Idle: 경고 타이머 하나만 장전한 채 대기
    async fn run_idle(&mut self) -> ArmedOutcome {
        self.set_phase(MonitorPhase::Idle);

        let delay = self.config.warning_delay();
        let deadline = Instant::now() + delay;
        debug!("경고 타이머 장전: {}초 후 발화", delay.as_secs());

        loop {
            let cmd = tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return ArmedOutcome::WarningDue,
                cmd = self.cmd_rx.recv() => cmd,
            };

            match cmd {
                Some(MonitorCommand::Dispose) | None => return ArmedOutcome::Disposed,
                Some(other) => {
                    // 다이얼로그가 없는 동안의 연장/ESC는 의미가 없다
                    debug!("Idle 단계에서 {other:?} 무시");
                }
            }
        }
    }

    /// Warning: 다이얼로그 표시 + 1초 카운트다운
    async fn run_warning(&mut self) -> WarningOutcome {
        self.set_phase(MonitorPhase::Warning);

        let close_on_escape = self.config.session.close_on_escape;
        let mut remaining = self.config.session.countdown_secs;

        if self.config.session.background_no_scroll {
            if let Err(e) = self.dialog.set_scroll_lock(true).await {
                warn!("배경 스크롤 잠금 실패: {e}");
            }
        }

        let view = self.build_view(remaining);
        if let Err(e) = self.dialog.show(&view).await {
            warn!("경고 다이얼로그 표시 실패: {e}");
        }
        info!("경고 다이얼로그 표시: 남은 시간 {remaining}초");

        // 경고 대기 타이머는 이미 소진됐으므로 살아있는 타이머는 이 티커 하나뿐
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.tick().await; // interval의 최초 틱은 즉시 발화하므로 소비

        enum WarnEvent {
            Tick,
            Cmd(Option<MonitorCommand>),
        }

        let action = loop {
            let event = tokio::select! {
                _ = ticker.tick() => WarnEvent::Tick,
                cmd = self.cmd_rx.recv() => WarnEvent::Cmd(cmd),
            };

            match event {
                WarnEvent::Tick => {
                    remaining -= 1;
                    let display = CountdownDisplay::for_remaining(remaining);
                    if let Err(e) = self.dialog.update_countdown(display).await {
                        warn!("카운트다운 갱신 실패: {e}");
                    }
                    if remaining == 0 {
                        break WarnAction::Expired;
                    }
                }
                WarnEvent::Cmd(Some(MonitorCommand::ExtendSession)) => break WarnAction::Extend,
                WarnEvent::Cmd(Some(MonitorCommand::EscapePressed)) => {
                    if close_on_escape {
                        break WarnAction::Extend;
                    }
                    debug!("close_on_escape 비활성 — ESC 무시");
                }
                WarnEvent::Cmd(Some(MonitorCommand::Dispose)) | WarnEvent::Cmd(None) => {
                    break WarnAction::Dispose;
                }
            }
        };

        // 카운트다운 티커 해제 — keep-alive 요청 전에 타이머부터 사라진다
        drop(ticker);

        match action {
            WarnAction::Expired => WarningOutcome::SignOut(SignOutReason::CountdownExpired),
            WarnAction::Extend => self.extend_session().await,
            WarnAction::Dispose => WarningOutcome::Disposed,
        }
    }

    /// Dormant: 타이머 없이 해체 요청만 대기
    async fn run_dormant(&mut self) {
        loop {
            match self.cmd_rx.recv().await {
                Some(MonitorCommand::Dispose) | None => return,
                Some(other) => debug!("휴면 단계에서 {other:?} 무시"),
            }
        }
    }

    /// 연장 동작 처리.
    ///
    /// 다이얼로그 제거가 keep-alive 요청보다 먼저 일어나고,
    /// 응답이 다음 단계를 결정한다. 전송 실패는 거부와 같다.
    async fn extend_session(&self) -> WarningOutcome {
        self.close_dialog().await;

        info!("세션 연장 요청");
        let verdict = match self.keep_alive.extend_session().await {
            Ok(v) => v,
            Err(e) => {
                warn!("keep-alive 요청 실패: {e} — 거부로 처리");
                KeepAliveVerdict::Denied
            }
        };

        if verdict == KeepAliveVerdict::Denied {
            info!("세션 연장 거부됨");
            return WarningOutcome::SignOut(SignOutReason::KeepAliveDenied);
        }

        if self.config.session.restart_on_yes {
            debug!("연장 성공 — 경고 타이머 재장전");
            WarningOutcome::Rearm
        } else {
            debug!("연장 성공 — 휴면 전환");
            WarningOutcome::Dormant
        }
    }

    /// 종료 처리: 다이얼로그 제거 → 단계 브로드캐스트 → 내비게이션
    ///
    /// logout_url이 없으면 강제 여부와 무관하게 logout_redirect_url로
    /// 이동한다. 사유는 단계 브로드캐스트로 전달되므로 호스트가
    /// 직접 분기할 수 있다.
    async fn sign_out(&self, reason: SignOutReason) {
        self.close_dialog().await;
        self.set_phase(MonitorPhase::Terminated(reason));

        let session = &self.config.session;
        let target = session
            .logout_url
            .as_deref()
            .unwrap_or(&session.logout_redirect_url);
        info!("로그아웃 이동: {target} (강제={})", reason.is_forced());

        if let Err(e) = self.navigator.navigate(target).await {
            warn!("로그아웃 내비게이션 실패: {e}");
        }
    }

    /// 해체 마무리: 다이얼로그 정리 후 Disposed 브로드캐스트
    async fn finish_disposed(&self) {
        self.close_dialog().await;
        self.set_phase(MonitorPhase::Disposed);
        info!("모니터 해체 완료");
    }

    /// 다이얼로그 제거 및 스크롤 잠금 해제 (둘 다 멱등)
    async fn close_dialog(&self) {
        if let Err(e) = self.dialog.close().await {
            warn!("다이얼로그 제거 실패: {e}");
        }
        if self.config.session.background_no_scroll {
            if let Err(e) = self.dialog.set_scroll_lock(false).await {
                warn!("배경 스크롤 잠금 해제 실패: {e}");
            }
        }
    }

    /// 다이얼로그 내용 렌더링 — 플레이스홀더 치환 포함
    fn build_view(&self, remaining_secs: u64) -> WarningView {
        let dialog_cfg = &self.config.dialog;
        let initial = CountdownDisplay::initial(remaining_secs);
        let timeout_minutes = TimeParts::from_secs(self.config.session.timeout_secs).minutes;

        let message = template::render(
            &dialog_cfg.message,
            &[
                ("time", initial.value().to_string()),
                ("unit", initial.unit_label().to_string()),
            ],
        );
        let keep_alive_label = template::render(
            &dialog_cfg.keep_alive_button_text,
            &[("minutes", timeout_minutes.to_string())],
        );

        WarningView {
            title: dialog_cfg.title.clone(),
            message,
            keep_alive_label,
            initial_display: initial,
            expires_at: Utc::now() + chrono::Duration::seconds(remaining_secs as i64),
        }
    }

    fn set_phase(&self, phase: MonitorPhase) {
        debug!("단계 전환: {phase}");
        let _ = self.phase_tx.send(phase);
    }
}
