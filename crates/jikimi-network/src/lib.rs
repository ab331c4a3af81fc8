//! # jikimi-network
//!
//! keep-alive HTTP 네트워크 어댑터.
//! 서버의 세션 연장 엔드포인트를 호출하고 응답 본문으로 허용/거부를 판정한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use jikimi_network::keep_alive::HttpKeepAliveClient;
//! use std::time::Duration;
//!
//! let client = HttpKeepAliveClient::new("https://tax.example/keep-alive", Duration::from_secs(10))?;
//! ```

pub mod keep_alive;
