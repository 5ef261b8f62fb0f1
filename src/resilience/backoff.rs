//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay schedule between retry attempts.
///
/// The first retry waits `base`; each further retry doubles it until `max`.
/// Up to a tenth of the delay is added as jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    pub fn from_millis(base_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(max_ms))
    }

    /// Delay before a retry follows failed attempt `attempt` (1-based), without jitter.
    pub fn ceiling(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Delay before a retry follows failed attempt `attempt`, jitter included.
    pub fn delay(&self, attempt: u32) -> Duration {
        let ceiling = self.ceiling(attempt);
        let spread = ceiling / 10;
        if spread.is_zero() {
            return ceiling;
        }
        ceiling + spread.mul_f64(rand::thread_rng().gen_range(0.0..1.0))
    }
}
