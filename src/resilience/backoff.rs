//! Exponential backoff with jitter.
//!
//! Jitter is drawn from a caller-supplied RNG, so a seeded client replays the
//! same retry schedule.

use std::time::Duration;

use rand::Rng;

/// Un-jittered delay before retry number `attempt` (1-based).
pub fn base_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    let exponential = 2u64.saturating_pow(attempt - 1);
    Duration::from_millis(base_ms.saturating_mul(exponential).min(max_ms))
}

/// [`base_delay`] plus up to 10% jitter drawn from `rng`.
pub fn calculate_backoff<R: Rng + ?Sized>(attempt: u32, base_ms: u64, max_ms: u64, rng: &mut R) -> Duration {
    let delay = base_delay(attempt, base_ms, max_ms);
    let jitter_range = delay.as_millis() as u64 / 10;
    if jitter_range == 0 {
        return delay;
    }
    delay + Duration::from_millis(rng.gen_range(0..jitter_range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_delay_doubles_then_caps() {
        assert_eq!(base_delay(1, 100, 2000), Duration::from_millis(100));
        assert_eq!(base_delay(2, 100, 2000), Duration::from_millis(200));
        assert_eq!(base_delay(4, 100, 2000), Duration::from_millis(800));
        assert_eq!(base_delay(10, 100, 1000), Duration::from_millis(1000));
        assert_eq!(base_delay(200, 100, 5000), Duration::from_millis(5000));
        assert_eq!(base_delay(0, 100, 1000), Duration::ZERO);
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let mut rng = StdRng::seed_from_u64(3);
        for attempt in 1..8 {
            let base = base_delay(attempt, 100, 2000);
            let jittered = calculate_backoff(attempt, 100, 2000, &mut rng);
            assert!(jittered >= base);
            assert!(jittered < base + base / 10 + Duration::from_millis(1));
        }
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let schedule_a: Vec<Duration> = (1..6).map(|n| calculate_backoff(n, 200, 3000, &mut a)).collect();
        let schedule_b: Vec<Duration> = (1..6).map(|n| calculate_backoff(n, 200, 3000, &mut b)).collect();
        assert_eq!(schedule_a, schedule_b);
    }

    #[test]
    fn test_small_delays_have_no_jitter() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(calculate_backoff(1, 5, 100, &mut rng), Duration::from_millis(5));
    }
}
