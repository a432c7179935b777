//! Retry policy with exponential backoff.
//!
//! The original transport performed a single attempt and silently logged
//! failures; the bounded policy here is an explicit design choice so the
//! dispatcher's failure handling is testable. Transports stay
//! single-attempt: cross-attempt context lives with the dispatcher.

use std::time::Duration;

/// Bounded retry with exponential backoff and down-jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total delivery attempts per message, including the first. Clamped to
    /// at least 1.
    pub max_attempts: u32,
    /// Backoff delay before the first retry.
    pub initial_delay: Duration,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
    /// Down-jitter factor (0.25 = delay reduced by up to 25%). Zero makes
    /// delays deterministic.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `backoff_step + 1`.
    ///
    /// `backoff_step` is 0 before the first retry, 1 before the second, and
    /// so on; the base delay doubles each step up to [`max_delay`], then
    /// jitter shaves off up to `jitter_factor` of it.
    ///
    /// [`max_delay`]: RetryPolicy::max_delay
    #[must_use]
    pub fn delay_before(&self, backoff_step: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step.min(63) as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let jitter = 1.0 - rand::random::<f64>() * self.jitter_factor;
        Duration::from_secs_f64(capped * jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            jitter_factor: 0.0,
        };

        assert_eq!(policy.delay_before(0), Duration::from_millis(100));
        assert_eq!(policy.delay_before(1), Duration::from_millis(200));
        // 400ms would exceed the cap.
        assert_eq!(policy.delay_before(2), Duration::from_millis(300));
        assert_eq!(policy.delay_before(3), Duration::from_millis(300));
    }

    #[test]
    fn jitter_only_shortens_the_delay() {
        let policy = RetryPolicy {
            jitter_factor: 0.25,
            ..RetryPolicy::default()
        };

        // First retry: base 250ms, jitter keeps it within [187.5ms, 250ms].
        for _ in 0..100 {
            let delay = policy.delay_before(0);
            assert!(delay >= Duration::from_secs_f64(0.250 * 0.75));
            assert!(delay <= Duration::from_millis(250));
        }
    }

    #[test]
    fn large_step_does_not_overflow() {
        let policy = RetryPolicy {
            jitter_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_before(u32::MAX), policy.max_delay);
    }
}
