//! Linear backoff with optional jitter.

use std::time::Duration;
use rand::Rng;

/// Calculate the delay before attempt `attempt + 1`.
///
/// Attempt `n` (1-based) waits `base_ms × n`, capped at `max_ms`, plus up to
/// `jitter_ratio` of that delay at random.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter_ratio: f64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let delay_ms = base_ms.saturating_mul(attempt as u64);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = (capped_delay as f64 * jitter_ratio.clamp(0.0, 1.0)) as u64;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
