//! Jikan client library for browsing the MyAnimeList catalog.
//!
//! Provides a rate-limited, retrying client for the Jikan API v4 with named
//! catalog queries (seasonal, top, recent, details, characters, search,
//! genres).

pub mod api;

pub use api::{Endpoint, JikanClient, Outcome, RateLimiter, RetryPolicy, TopFilter};
