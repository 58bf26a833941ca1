//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` is the number of the attempt that just failed (1-based); the
/// exponent is zero-based, so the first retry waits roughly `base_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Jitter up to 10% of the delay.
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_per_attempt() {
        let b1 = calculate_backoff(1, 100, 10_000);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 200);

        let b2 = calculate_backoff(2, 100, 10_000);
        assert!(b2.as_millis() >= 200 && b2.as_millis() < 400);

        let b3 = calculate_backoff(3, 100, 10_000);
        assert!(b3.as_millis() >= 400 && b3.as_millis() < 800);
    }

    #[test]
    fn caps_at_max() {
        let b = calculate_backoff(10, 100, 1_000);
        assert!(b.as_millis() >= 1_000 && b.as_millis() < 1_200);
    }

    #[test]
    fn zero_attempt_is_immediate() {
        assert_eq!(calculate_backoff(0, 100, 1_000), Duration::ZERO);
    }

    #[test]
    fn no_overflow_on_huge_attempt() {
        let b = calculate_backoff(u32::MAX, u64::MAX, 2_000);
        assert!(b.as_millis() <= 2_200);
    }
}
