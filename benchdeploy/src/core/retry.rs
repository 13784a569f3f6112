//! Backoff schedule for retried lookups

use std::time::Duration;

/// Exponential backoff: `base * 2^attempt`, saturating
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(1u32 << attempt.min(16))
}
