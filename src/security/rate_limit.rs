//! Sliding-window rate limiting per client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::env::Environment;

/// Per-client log of recent request instants.
///
/// Logs are pruned lazily: each check drops the instants that fell out of the
/// trailing window for that client. Keys are never evicted.
pub struct SlidingWindowLimiter {
    log: DashMap<String, Vec<Instant>>,
    window: Duration,
    max: usize,
    env: Arc<dyn Environment>,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max: usize, env: Arc<dyn Environment>) -> Self {
        Self {
            log: DashMap::new(),
            window,
            max,
            env,
        }
    }

    /// Prune the client's log and report whether it is at its limit.
    pub fn is_rate_limited(&self, client_id: &str) -> bool {
        let now = self.env.now();
        let mut entry = self.log.entry(client_id.to_string()).or_default();
        prune(entry.value_mut(), now, self.window);
        entry.len() >= self.max
    }

    /// Append the current instant to the client's log.
    pub fn record(&self, client_id: &str) {
        let now = self.env.now();
        self.log.entry(client_id.to_string()).or_default().push(now);
    }

    /// Check and record under one lock on the client's entry.
    ///
    /// Returns false when the client is limited; nothing is recorded then.
    pub fn try_acquire(&self, client_id: &str) -> bool {
        let now = self.env.now();
        let mut entry = self.log.entry(client_id.to_string()).or_default();
        let timestamps = entry.value_mut();
        prune(timestamps, now, self.window);
        if timestamps.len() >= self.max {
            return false;
        }
        timestamps.push(now);
        true
    }

    /// Requests currently counted against the client, without pruning.
    pub fn recorded(&self, client_id: &str) -> usize {
        self.log.get(client_id).map(|r| r.len()).unwrap_or(0)
    }
}

fn prune(timestamps: &mut Vec<Instant>, now: Instant, window: Duration) {
    timestamps.retain(|t| now.saturating_duration_since(*t) < window);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SimEnv;

    fn limiter(env: &SimEnv, max: usize) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(Duration::from_secs(10), max, Arc::new(env.clone()))
    }

    #[test]
    fn test_limited_after_max_records() {
        let env = SimEnv::default();
        let limiter = limiter(&env, 3);

        for _ in 0..3 {
            assert!(!limiter.is_rate_limited("10.0.0.1"));
            limiter.record("10.0.0.1");
        }
        assert!(limiter.is_rate_limited("10.0.0.1"));
    }

    #[test]
    fn test_window_elapses() {
        let env = SimEnv::default();
        let limiter = limiter(&env, 2);
        limiter.record("ip");
        limiter.record("ip");
        assert!(limiter.is_rate_limited("ip"));

        env.advance(Duration::from_secs(10));
        assert!(!limiter.is_rate_limited("ip"));
        assert_eq!(limiter.recorded("ip"), 0);
    }

    #[test]
    fn test_window_slides_per_entry() {
        let env = SimEnv::default();
        let limiter = limiter(&env, 2);
        limiter.record("ip");
        env.advance(Duration::from_secs(6));
        limiter.record("ip");
        assert!(limiter.is_rate_limited("ip"));

        // First entry leaves the window, second is still inside it.
        env.advance(Duration::from_secs(5));
        assert!(!limiter.is_rate_limited("ip"));
        assert_eq!(limiter.recorded("ip"), 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let env = SimEnv::default();
        let limiter = limiter(&env, 1);
        assert!(limiter.try_acquire("a"));
        assert!(!limiter.try_acquire("a"));
        assert!(limiter.try_acquire("b"));
    }

    #[test]
    fn test_try_acquire_does_not_record_when_limited() {
        let env = SimEnv::default();
        let limiter = limiter(&env, 2);
        assert!(limiter.try_acquire("ip"));
        assert!(limiter.try_acquire("ip"));
        assert!(!limiter.try_acquire("ip"));
        assert_eq!(limiter.recorded("ip"), 2);
    }

    #[test]
    fn test_concurrent_acquire_never_exceeds_max() {
        let env = SimEnv::default();
        let limiter = Arc::new(limiter(&env, 5));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..10).filter(|_| limiter.try_acquire("shared")).count())
            })
            .collect();
        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(granted, 5);
    }
}
