//! Jikan API client with rate limiting and retry logic.

use super::endpoints::{Endpoint, TopFilter};
use super::error::AttemptResult;
use super::outcome::Outcome;
use super::rate_limiter::RateLimiter;
use super::retry::RetryPolicy;
use super::transport::{ReqwestTransport, Transport};
use anyhow::Result;
use shared::config::JikanConfig;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Jikan API v4 client
///
/// Every query resolves to an [`Outcome`]; failures are retried and, once
/// attempts run out, replaced by [`Outcome::Fallback`]. Retry state lives on
/// the stack of each call, so one client can serve concurrent callers.
pub struct JikanClient<T: Transport = ReqwestTransport> {
    transport: T,
    /// Base URL for Jikan API
    base_url: String,
    policy: RetryPolicy,
    /// Gate shared with other clients of the process, if any
    rate_limiter: Option<Arc<RateLimiter>>,
}

impl JikanClient<ReqwestTransport> {
    /// Create a client from the `[jikan]` configuration section
    pub fn from_config(config: &JikanConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(config)?;
        let client = Self::with_transport(
            transport,
            config.base_url.clone(),
            RetryPolicy::from(&config.retry),
        );

        Ok(match RateLimiter::from_config(&config.rate_limit) {
            Some(limiter) => client.with_rate_limiter(limiter),
            None => client,
        })
    }
}

impl<T: Transport> JikanClient<T> {
    /// Create a client over any transport, without a request gate
    pub fn with_transport(transport: T, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
            policy,
            rate_limiter: None,
        }
    }

    /// Route every attempt through a shared request gate
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `path` with the configured number of attempts
    pub async fn execute(&self, path: &str) -> Outcome {
        self.execute_with_retries(path, self.policy.max_retries()).await
    }

    /// GET `path`, making at most `max_retries` attempts (at least one)
    ///
    /// Dropping the returned future abandons any pending request or delay.
    pub async fn execute_with_retries(&self, path: &str, max_retries: u32) -> Outcome {
        let max_retries = max_retries.max(1);
        let url = format!("{}{}", self.base_url, path);

        for attempt in 0..max_retries {
            if attempt > 0 {
                let delay = self.policy.pre_attempt_delay(attempt);
                debug!(url = %url, delay_ms = delay.as_millis() as u64, "Backing off before retry");
                sleep(delay).await;
            }

            if let Some(limiter) = &self.rate_limiter {
                limiter.acquire().await;
            }

            debug!(url = %url, attempt = attempt + 1, "Making API request");

            match AttemptResult::from(self.transport.get(&url).await) {
                AttemptResult::Success(value) => {
                    debug!(url = %url, "Request successful");
                    sleep(self.policy.success_delay()).await;
                    return Outcome::Fetched(value);
                }
                AttemptResult::RateLimited => {
                    let delay = self.policy.rate_limit_delay(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited by server, waiting"
                    );
                    sleep(delay).await;
                }
                AttemptResult::Failed(e) => {
                    if attempt + 1 == max_retries {
                        error!(
                            url = %url,
                            attempts = max_retries,
                            error = %e,
                            "Request failed, returning empty result"
                        );
                        return Outcome::Fallback;
                    }

                    let delay = self.policy.failure_delay(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    sleep(delay).await;
                }
            }
        }

        // Only reachable when the last attempt was rate limited
        error!(url = %url, attempts = max_retries, "Rate limited on every attempt, returning empty result");
        Outcome::Fallback
    }

    /// Run a named query
    pub async fn query(&self, endpoint: &Endpoint) -> Outcome {
        self.execute(&endpoint.path()).await
    }

    /// Fetch the current season's anime
    pub async fn seasonal(&self) -> Outcome {
        info!("Fetching seasonal anime");
        self.query(&Endpoint::Seasonal).await
    }

    /// Fetch the top anime ranking
    pub async fn top(&self, filter: TopFilter) -> Outcome {
        info!(filter = %filter, "Fetching top anime");
        self.query(&Endpoint::Top(filter)).await
    }

    /// Fetch the ten most recently started airing anime
    pub async fn recent(&self) -> Outcome {
        info!("Fetching recent anime");
        self.query(&Endpoint::Recent).await
    }

    /// Fetch full anime details by MAL ID
    pub async fn details(&self, id: &str) -> Outcome {
        debug!(id = id, "Fetching anime details");
        self.query(&Endpoint::Details(id.to_string())).await
    }

    /// Fetch the character list of an anime
    pub async fn characters(&self, id: &str) -> Outcome {
        debug!(id = id, "Fetching anime characters");
        self.query(&Endpoint::Characters(id.to_string())).await
    }

    /// Search by title, optionally restricted to one genre
    pub async fn search(&self, query: &str, genre: Option<u32>) -> Outcome {
        info!(query = query, genre = ?genre, "Searching anime");
        self.query(&Endpoint::Search {
            query: query.to_string(),
            genre,
        })
        .await
    }

    /// Fetch all anime genres
    pub async fn genres(&self) -> Outcome {
        info!("Fetching anime genres");
        self.query(&Endpoint::Genres).await
    }
}
