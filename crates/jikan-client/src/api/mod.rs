//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited, retry-enabled client for interacting
//! with the Jikan API (MyAnimeList unofficial API). Queries never fail: once
//! retries are exhausted they resolve to an empty listing.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod outcome;
pub mod rate_limiter;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::JikanClient;
pub use endpoints::{Endpoint, TopFilter};
pub use error::{AttemptResult, FetchError};
pub use outcome::Outcome;
pub use rate_limiter::RateLimiter;
pub use retry::RetryPolicy;
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::*;
