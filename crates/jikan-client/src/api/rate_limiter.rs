//! Process-wide request gate.
//!
//! Enforces both a per-second spacing and a sliding per-minute window across
//! every query that shares the gate, so concurrent callers cannot add up to
//! more than the upstream allows.

use shared::config::RateLimitConfig;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    max_per_minute: usize,
    state: Mutex<Window>,
}

#[derive(Debug, Default)]
struct Window {
    last_request: Option<Instant>,
    recent_requests: VecDeque<Instant>,
}

impl Window {
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.recent_requests.front() {
            if now.duration_since(oldest) >= WINDOW {
                self.recent_requests.pop_front();
            } else {
                break;
            }
        }
    }
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// Non-positive rates disable the corresponding constraint.
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        let min_interval = if max_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / max_per_second)
        } else {
            Duration::ZERO
        };
        let max_per_minute = if max_per_minute == 0 {
            usize::MAX
        } else {
            max_per_minute as usize
        };

        Self {
            min_interval,
            max_per_minute,
            state: Mutex::new(Window::default()),
        }
    }

    /// Shared gate built from the `[jikan.rate_limit]` section, if enabled
    pub fn from_config(config: &RateLimitConfig) -> Option<Arc<Self>> {
        config
            .enabled
            .then(|| Arc::new(Self::new(config.requests_per_second, config.requests_per_minute)))
    }

    /// Wait until a request can be made, respecting both rate limits
    ///
    /// Waiters are served one at a time in lock order.
    pub async fn acquire(&self) {
        let mut window = self.state.lock().await;

        window.prune(Instant::now());
        if window.recent_requests.len() >= self.max_per_minute {
            if let Some(&oldest) = window.recent_requests.front() {
                let wait_time = WINDOW.saturating_sub(oldest.elapsed());
                debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Rate limit: waiting for per-minute limit"
                );
                sleep(wait_time).await;
                window.prune(Instant::now());
            }
        }

        if let Some(last) = window.last_request {
            let wait_time = self.min_interval.saturating_sub(last.elapsed());
            if !wait_time.is_zero() {
                debug!(
                    wait_ms = wait_time.as_millis() as u64,
                    "Rate limit: waiting for per-second limit"
                );
                sleep(wait_time).await;
            }
        }

        let request_time = Instant::now();
        window.last_request = Some(request_time);
        window.recent_requests.push_back(request_time);
    }

    /// Number of requests admitted in the last minute
    pub async fn current_minute_count(&self) -> usize {
        let mut window = self.state.lock().await;
        window.prune(Instant::now());
        window.recent_requests.len()
    }
}
