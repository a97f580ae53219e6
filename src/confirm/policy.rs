//! Retry policies for receipt polling.

use std::time::Duration;

use crate::client::blocks::BLOCK_INTERVAL;
use crate::config::ConfirmationConfig;

/// Interval of the wall-clock bounded policy.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Blocks waited for by [`PendingTx::wait`](crate::confirm::PendingTx::wait).
pub const DEFAULT_WAIT_BLOCKS: u32 = 6;

/// How a poll loop spaces and bounds its attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause before the first attempt.
    pub initial_delay: Duration,
    /// Pause between attempts.
    pub interval: Duration,
    /// Maximum number of attempts.
    pub max_attempts: u32,
    /// Wall-clock budget measured from the start of polling.
    pub deadline: Option<Duration>,
    /// Upper bound of a random extra pause added to each interval.
    pub jitter: Duration,
}

impl PollPolicy {
    /// Poll about once per block, for `blocks` blocks.
    pub fn blocks(blocks: u32) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval: BLOCK_INTERVAL,
            max_attempts: blocks,
            deadline: None,
            jitter: Duration::ZERO,
        }
    }

    /// Poll every 500ms until `timeout` has elapsed.
    pub fn duration(timeout: Duration) -> Self {
        Self {
            initial_delay: Duration::ZERO,
            interval: RECEIPT_POLL_INTERVAL,
            max_attempts: u32::MAX,
            deadline: Some(timeout),
            jitter: Duration::ZERO,
        }
    }

    /// Block-bounded policy from `[confirmation]`, capped by its wall-clock
    /// budget.
    pub fn from_config(config: &ConfirmationConfig) -> Self {
        Self::blocks(config.wait_blocks)
            .with_deadline(Duration::from_secs(config.wait_timeout_secs))
            .with_jitter(Duration::from_millis(config.jitter_ms))
    }

    /// Wall-clock bounded policy using the `[confirmation]` pacing.
    pub fn timeout_from_config(config: &ConfirmationConfig, timeout: Duration) -> Self {
        Self::duration(timeout)
            .with_interval(Duration::from_millis(config.poll_interval_ms))
            .with_jitter(Duration::from_millis(config.jitter_ms))
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Pause before the next attempt, jitter included.
    pub fn next_pause(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.interval;
        }
        let extra = fastrand::u64(0..=self.jitter.as_millis() as u64);
        self.interval + Duration::from_millis(extra)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::blocks(DEFAULT_WAIT_BLOCKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_policy() {
        let policy = PollPolicy::blocks(6);
        assert_eq!(policy.max_attempts, 6);
        assert_eq!(policy.interval, Duration::from_secs(10));
        assert!(policy.deadline.is_none());
    }

    #[test]
    fn test_duration_policy() {
        let policy = PollPolicy::duration(Duration::from_secs(3));
        assert_eq!(policy.interval, Duration::from_millis(500));
        assert_eq!(policy.deadline, Some(Duration::from_secs(3)));
        assert_eq!(policy.max_attempts, u32::MAX);
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = PollPolicy::duration(Duration::from_secs(1))
            .with_jitter(Duration::from_millis(100));
        for _ in 0..50 {
            let pause = policy.next_pause();
            assert!(pause >= Duration::from_millis(500));
            assert!(pause <= Duration::from_millis(600));
        }
    }

    #[test]
    fn test_policies_from_config() {
        let config = ConfirmationConfig {
            wait_blocks: 3,
            wait_timeout_secs: 45,
            poll_interval_ms: 250,
            jitter_ms: 20,
        };

        let policy = PollPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.interval, BLOCK_INTERVAL);
        assert_eq!(policy.deadline, Some(Duration::from_secs(45)));
        assert_eq!(policy.jitter, Duration::from_millis(20));

        let policy = PollPolicy::timeout_from_config(&config, Duration::from_secs(5));
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.deadline, Some(Duration::from_secs(5)));
        assert_eq!(policy.jitter, Duration::from_millis(20));
    }

    #[test]
    fn test_default_waits_six_blocks() {
        assert_eq!(PollPolicy::default(), PollPolicy::blocks(DEFAULT_WAIT_BLOCKS));
    }
}
