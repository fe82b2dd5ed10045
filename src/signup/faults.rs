//! Simulated backend failures.
//!
//! The flow fails on purpose so that clients have to retry. Every draw goes
//! through the injected [`Environment`], never a global RNG.

use std::sync::Arc;
use std::time::Duration;

use crate::env::Environment;
use crate::observability::metrics;

pub struct FaultInjector {
    env: Arc<dyn Environment>,
    display_name_timeout_prob: f64,
    email_reject_rate: f64,
    timeout_delay: Duration,
}

impl FaultInjector {
    pub fn new(
        env: Arc<dyn Environment>,
        display_name_timeout_prob: f64,
        email_reject_rate: f64,
        timeout_delay: Duration,
    ) -> Self {
        Self {
            env,
            display_name_timeout_prob,
            email_reject_rate,
            timeout_delay,
        }
    }

    /// Whether this display-name check should stall and fail.
    pub fn display_name_timeout(&self) -> bool {
        let hit = self.env.chance(self.display_name_timeout_prob);
        if hit {
            tracing::info!(delay = ?self.timeout_delay, "Injecting display name check timeout");
            metrics::record_fault("display_name_timeout");
        }
        hit
    }

    /// Whether this submission gets a spurious email rejection.
    pub fn email_rejection(&self) -> bool {
        let hit = self.env.chance(self.email_reject_rate);
        if hit {
            tracing::info!("Injecting intermittent email rejection");
            metrics::record_fault("email_rejection");
        }
        hit
    }

    pub fn timeout_delay(&self) -> Duration {
        self.timeout_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SimEnv;

    #[test]
    fn test_probabilities_force_branches() {
        let env = Arc::new(SimEnv::new(3));
        let always = FaultInjector::new(env.clone(), 1.0, 1.0, Duration::ZERO);
        let never = FaultInjector::new(env, 0.0, 0.0, Duration::ZERO);

        for _ in 0..50 {
            assert!(always.display_name_timeout());
            assert!(always.email_rejection());
            assert!(!never.display_name_timeout());
            assert!(!never.email_rejection());
        }
    }

    #[test]
    fn test_same_seed_same_faults() {
        let draw = |seed| {
            let faults = FaultInjector::new(Arc::new(SimEnv::new(seed)), 0.5, 0.5, Duration::ZERO);
            (0..32).map(|_| faults.email_rejection()).collect::<Vec<_>>()
        };
        assert_eq!(draw(11), draw(11));
    }
}
