//! Retry and throttle timings.

use shared::config::{BackoffCurve, RetryConfig};
use std::time::Duration;

/// Default maximum attempts per query
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay schedule applied by the retry loop
///
/// With the default linear curve and bases, attempt `i` waits
/// `3000ms * i` before it is sent, a 429 on attempt `i` waits
/// `5000ms * (i + 1)`, a generic failure on attempt `i` waits
/// `3000ms * (i + 1)`, and every success waits 2000ms before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    retry_delay: Duration,
    rate_limit_delay: Duration,
    success_delay: Duration,
    backoff: BackoffCurve,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            rate_limit_delay: Duration::from_millis(config.rate_limit_delay_ms),
            success_delay: Duration::from_millis(config.success_delay_ms),
            backoff: config.backoff,
        }
    }
}

impl RetryPolicy {
    /// Policy with explicit bases and a linear curve
    pub fn new(
        max_retries: u32,
        retry_delay: Duration,
        rate_limit_delay: Duration,
        success_delay: Duration,
    ) -> Self {
        Self {
            max_retries: max_retries.max(1),
            retry_delay,
            rate_limit_delay,
            success_delay,
            backoff: BackoffCurve::Linear,
        }
    }

    /// Policy that never sleeps
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffCurve) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> BackoffCurve {
        self.backoff
    }

    /// Wait before sending attempt `attempt` (zero for the first attempt)
    pub fn pre_attempt_delay(&self, attempt: u32) -> Duration {
        scale(self.backoff, self.retry_delay, attempt)
    }

    /// Wait after a generic failure on attempt `attempt`
    pub fn failure_delay(&self, attempt: u32) -> Duration {
        scale(self.backoff, self.retry_delay, attempt.saturating_add(1))
    }

    /// Wait after a 429 on attempt `attempt`
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        scale(self.backoff, self.rate_limit_delay, attempt.saturating_add(1))
    }

    /// Wait after every successful response
    pub fn success_delay(&self) -> Duration {
        self.success_delay
    }
}

fn scale(curve: BackoffCurve, base: Duration, step: u32) -> Duration {
    if step == 0 {
        return Duration::ZERO;
    }
    let factor = match curve {
        BackoffCurve::Linear => step,
        BackoffCurve::Exponential => 2u32.saturating_pow(step - 1),
    };
    base.saturating_mul(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_default_schedule_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), DEFAULT_MAX_RETRIES);

        assert_eq!(policy.pre_attempt_delay(0), Duration::ZERO);
        assert_eq!(policy.pre_attempt_delay(1), ms(3000));
        assert_eq!(policy.pre_attempt_delay(2), ms(6000));

        assert_eq!(policy.failure_delay(0), ms(3000));
        assert_eq!(policy.failure_delay(1), ms(6000));

        assert_eq!(policy.rate_limit_delay(0), ms(5000));
        assert_eq!(policy.rate_limit_delay(1), ms(10000));
        assert_eq!(policy.rate_limit_delay(2), ms(15000));

        assert_eq!(policy.success_delay(), ms(2000));
    }

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy::default().with_backoff(BackoffCurve::Exponential);

        assert_eq!(policy.pre_attempt_delay(0), Duration::ZERO);
        assert_eq!(policy.pre_attempt_delay(1), ms(3000));
        assert_eq!(policy.pre_attempt_delay(2), ms(6000));
        assert_eq!(policy.pre_attempt_delay(3), ms(12000));
        assert_eq!(policy.rate_limit_delay(3), ms(40000));
    }

    #[test]
    fn test_max_retries_clamped_to_one() {
        assert_eq!(RetryPolicy::immediate(0).max_retries(), 1);

        let config = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        assert_eq!(RetryPolicy::from(&config).max_retries(), 1);
    }

    #[test]
    fn test_huge_steps_saturate() {
        let policy = RetryPolicy::default().with_backoff(BackoffCurve::Exponential);
        assert_eq!(
            policy.failure_delay(u32::MAX),
            ms(3000).saturating_mul(u32::MAX)
        );
    }
}
