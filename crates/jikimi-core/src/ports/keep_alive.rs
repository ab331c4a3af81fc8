//! 세션 연장(keep-alive) 포트.
//!
//! 구현: `jikimi-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;

/// keep-alive 응답 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAliveVerdict {
    /// 연장 허용 (응답 본문이 정확히 `"OK"`)
    Granted,
    /// 연장 거부 (그 외 모든 응답)
    Denied,
}

/// 세션 연장 클라이언트
#[async_trait]
pub trait KeepAliveClient: Send + Sync {
    /// 서버의 세션 만료 시계를 리셋한다.
    ///
    /// 전송 계층 실패는 `Err`로 반환하며, 호출자는 거부와
    /// 동일하게 처리한다 (재시도 없음).
    async fn extend_session(&self) -> Result<KeepAliveVerdict, CoreError>;
}
