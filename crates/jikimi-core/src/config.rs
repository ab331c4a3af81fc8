//! 애플리케이션 설정 구조체.
//!
//! 세션 만료/경고 시간, keep-alive 엔드포인트, 다이얼로그 문구 등
//! 런타임 설정을 정의한다. JSON 파일에서 로드한다 (`config_manager` 참조).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 세션 타임아웃 설정
    pub session: SessionConfig,
    /// 경고 다이얼로그 문구 설정
    #[serde(default)]
    pub dialog: DialogConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            session: SessionConfig::default(),
            dialog: DialogConfig::default(),
        }
    }

    /// 설정값 유효성 검증
    ///
    /// 경고 리드 타임은 0보다 크고 전체 타임아웃보다 작아야 한다.
    pub fn validate(&self) -> Result<(), CoreError> {
        let session = &self.session;

        if session.countdown_secs == 0 {
            return Err(CoreError::Config(
                "countdown_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if session.countdown_secs >= session.timeout_secs {
            return Err(CoreError::Config(format!(
                "countdown_secs({})는 timeout_secs({})보다 작아야 합니다",
                session.countdown_secs, session.timeout_secs
            )));
        }
        if session.keep_alive_url.is_empty() {
            return Err(CoreError::Config(
                "keep_alive_url이 비어 있습니다".to_string(),
            ));
        }
        if session.logout_url.is_none() && session.logout_redirect_url.is_empty() {
            return Err(CoreError::Config(
                "logout_url과 logout_redirect_url이 모두 비어 있습니다".to_string(),
            ));
        }

        Ok(())
    }

    /// 경고 타이머 지연 시간 (타임아웃 - 경고 리드 타임)
    pub fn warning_delay(&self) -> Duration {
        Duration::from_secs(self.session.timeout_secs - self.session.countdown_secs)
    }

    /// keep-alive 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.session.request_timeout_ms)
    }
}

// ============================================================
// 세션 타임아웃 설정
// ============================================================

/// 세션 타임아웃 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 전체 세션 타임아웃 (초). 이 시간 동안 활동이 없으면 강제 로그아웃.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 경고 리드 타임 (초). 만료 이 시간 전에 경고 다이얼로그를 표시.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
    /// 세션 연장(keep-alive) 엔드포인트
    #[serde(default = "default_keep_alive_url")]
    pub keep_alive_url: String,
    /// 로그아웃 대상. 없으면 `logout_redirect_url`로 이동.
    #[serde(default = "default_logout_url")]
    pub logout_url: Option<String>,
    /// `logout_url` 미설정 시 이동할 대상
    #[serde(default = "default_logout_redirect_url")]
    pub logout_redirect_url: String,
    /// 연장 성공 시 경고 타이머 재장전 여부
    #[serde(default = "default_true")]
    pub restart_on_yes: bool,
    /// ESC 키를 연장 동작으로 처리할지 여부
    #[serde(default)]
    pub close_on_escape: bool,
    /// 다이얼로그 표시 중 배경 스크롤 잠금 여부
    #[serde(default)]
    pub background_no_scroll: bool,
    /// keep-alive 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            countdown_secs: default_countdown_secs(),
            keep_alive_url: default_keep_alive_url(),
            logout_url: default_logout_url(),
            logout_redirect_url: default_logout_redirect_url(),
            restart_on_yes: true,
            close_on_escape: false,
            background_no_scroll: false,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    900 // 15분
}

fn default_countdown_secs() -> u64 {
    120 // 2분
}

fn default_keep_alive_url() -> String {
    "http://localhost:9090/keep-alive".to_string()
}

fn default_logout_url() -> Option<String> {
    Some("http://localhost:9090/sign-out".to_string())
}

fn default_logout_redirect_url() -> String {
    "http://localhost:9090/".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

// ============================================================
// 다이얼로그 문구 설정
// ============================================================

/// 경고 다이얼로그 문구 설정
///
/// `{time}`, `{unit}`, `{minutes}` 이름 플레이스홀더를 지원한다
/// ([`crate::template::render`] 참조).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// 다이얼로그 제목
    #[serde(default = "default_title")]
    pub title: String,
    /// 본문. `{time}`/`{unit}`이 남은 시간으로 치환된다.
    #[serde(default = "default_message")]
    pub message: String,
    /// 연장 버튼 라벨. `{minutes}`가 전체 타임아웃의 분 단위 값으로 치환된다.
    #[serde(default = "default_keep_alive_button_text")]
    pub keep_alive_button_text: String,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            message: default_message(),
            keep_alive_button_text: default_keep_alive_button_text(),
        }
    }
}

fn default_title() -> String {
    "곧 로그아웃됩니다".to_string()
}

fn default_message() -> String {
    "보안을 위해 {time}{unit} 동안 활동이 없으면 자동으로 로그아웃됩니다.".to_string()
}

fn default_keep_alive_button_text() -> String {
    "{minutes}분 더 사용하기".to_string()
}
