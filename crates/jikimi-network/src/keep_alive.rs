//! keep-alive HTTP 어댑터.
//!
//! `KeepAliveClient` 포트 구현. 응답 본문이 정확히 `"OK"`일 때만 연장을
//! 허용하고, 그 외 본문과 에러 상태 코드는 전부 거부로 판정한다.
//! 재시도는 하지 않는다 — 실패한 keep-alive는 그 경고 사이클에서 최종이다.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use jikimi_core::error::CoreError;
use jikimi_core::ports::keep_alive::{KeepAliveClient, KeepAliveVerdict};

/// 연장 허용 응답 본문
const KEEP_ALIVE_OK_BODY: &str = "OK";

/// keep-alive HTTP 클라이언트 — `KeepAliveClient` 포트 구현
pub struct HttpKeepAliveClient {
    client: reqwest::Client,
    url: String,
}

impl HttpKeepAliveClient {
    /// 새 keep-alive 클라이언트 생성
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// 엔드포인트 URL 반환
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeepAliveClient for HttpKeepAliveClient {
    async fn extend_session(&self) -> Result<KeepAliveVerdict, CoreError> {
        debug!("keep-alive 요청: {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("keep-alive 요청 실패: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("keep-alive 응답 상태 {status} — 연장 거부로 처리");
            return Ok(KeepAliveVerdict::Denied);
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("keep-alive 응답 본문 읽기 실패: {e}")))?;

        if body == KEEP_ALIVE_OK_BODY {
            debug!("keep-alive 허용");
            Ok(KeepAliveVerdict::Granted)
        } else {
            warn!(
                "keep-alive 응답 본문 불일치 ({}바이트) — 연장 거부로 처리",
                body.len()
            );
            Ok(KeepAliveVerdict::Denied)
        }
    }
}
