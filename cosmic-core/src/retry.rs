use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jitter {
    /// Exact doubling: base, base*2, base*4, ...
    #[default]
    None,
    /// Uniform in `[0, backoff]`.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter: Jitter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            jitter: Jitter::None,
        }
    }
}

impl RetryPolicy {
    /// Attempt budget. A request is always sent at least once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Undithered delay after the failed attempt with zero-based index `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.checked_mul(factor).unwrap_or(Duration::MAX)
    }

    pub fn delay_after<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let backoff = self.backoff(attempt);
        match self.jitter {
            Jitter::None => backoff,
            Jitter::Full => {
                let max_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
                Duration::from_millis(rng.gen_range(0..=max_ms))
            }
        }
    }

    /// `delay_after` with the thread-local generator.
    pub fn delay_before_retry(&self, attempt: u32) -> Duration {
        self.delay_after(attempt, &mut rand::thread_rng())
    }

    pub fn is_last(&self, attempt: u32) -> bool {
        attempt + 1 >= self.attempts()
    }
}
