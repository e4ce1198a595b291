//! Per-attempt failure classification.
//!
//! None of these escape [`JikanClient`](super::JikanClient); they only drive
//! the retry loop and its log output.

use super::transport::HttpResponse;
use super::types::JikanError;
use serde_json::Value;
use thiserror::Error;

/// Why a single request attempt failed
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("request error: {0}")]
    Network(String),

    /// Non-success status other than 429
    #[error("API request failed with status {status}{}", detail(.message))]
    Status {
        status: u16,
        /// `message` from Jikan's error body, when it sent one
        message: Option<String>,
    },

    /// 2xx body that is not valid JSON
    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Result of one request attempt
#[derive(Debug)]
pub enum AttemptResult {
    Success(Value),
    /// HTTP 429
    RateLimited,
    Failed(FetchError),
}

impl AttemptResult {
    /// Classify a completed HTTP exchange
    pub fn classify(response: HttpResponse) -> Self {
        match response.status {
            429 => AttemptResult::RateLimited,
            200..=299 => match serde_json::from_str(&response.body) {
                Ok(value) => AttemptResult::Success(value),
                Err(e) => AttemptResult::Failed(FetchError::Decode(e)),
            },
            status => {
                let message = serde_json::from_str::<JikanError>(&response.body)
                    .ok()
                    .and_then(|e| e.message);
                AttemptResult::Failed(FetchError::Status { status, message })
            }
        }
    }
}

impl From<Result<HttpResponse, FetchError>> for AttemptResult {
    fn from(result: Result<HttpResponse, FetchError>) -> Self {
        match result {
            Ok(response) => AttemptResult::classify(response),
            Err(e) => AttemptResult::Failed(e),
        }
    }
}
