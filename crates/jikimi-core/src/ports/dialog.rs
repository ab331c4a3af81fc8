//! 경고 다이얼로그 포트.
//!
//! 구현: `jikimi-app` crate (콘솔 어댑터)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::models::time::CountdownDisplay;

/// 렌더링된 경고 다이얼로그 내용
///
/// 문구의 플레이스홀더 치환은 엔진이 끝낸 상태로 전달된다.
#[derive(Debug, Clone)]
pub struct WarningView {
    /// 다이얼로그 제목
    pub title: String,
    /// 본문
    pub message: String,
    /// 연장 버튼 라벨
    pub keep_alive_label: String,
    /// 최초 표시 단위
    pub initial_display: CountdownDisplay,
    /// 조치가 없을 때의 예상 로그아웃 시각
    pub expires_at: DateTime<Utc>,
}

/// 경고 다이얼로그 인터페이스
///
/// `close`와 `set_scroll_lock(false)`는 이미 닫힌/풀린 상태에서
/// 다시 호출될 수 있으므로 멱등이어야 한다.
#[async_trait]
pub trait WarningDialog: Send + Sync {
    /// 다이얼로그 표시
    async fn show(&self, view: &WarningView) -> Result<(), CoreError>;

    /// 카운트다운 표시 갱신 (1초 간격)
    async fn update_countdown(&self, display: CountdownDisplay) -> Result<(), CoreError>;

    /// 다이얼로그 제거
    async fn close(&self) -> Result<(), CoreError>;

    /// 배경 스크롤 잠금 토글 (`background_no_scroll` 설정 시에만 호출)
    async fn set_scroll_lock(&self, locked: bool) -> Result<(), CoreError>;
}
