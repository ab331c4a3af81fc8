//! 지킴이 핵심 에러 타입.
//!
//! 어댑터 crate는 외부 라이브러리 에러를 이 타입으로 매핑해서 반환한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정, 네트워크, 다이얼로그 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 다이얼로그 렌더링/제거 실패
    #[error("다이얼로그 에러: {0}")]
    Dialog(String),

    /// 로그아웃 내비게이션 실패
    #[error("내비게이션 에러: {0}")]
    Navigation(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
