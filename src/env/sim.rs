//! Simulated environment with a hand-driven clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::Environment;

/// Wall-clock origin reported by a fresh `SimEnv` (2024-01-01T00:00:00Z).
const SIM_EPOCH_MILLIS: u64 = 1_704_067_200_000;

/// Deterministic environment for tests.
///
/// Cloning shares the clock and RNG, so a test can keep a handle and advance
/// time underneath a running service.
#[derive(Clone)]
pub struct SimEnv {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
    rng: Arc<Mutex<StdRng>>,
}

impl SimEnv {
    pub fn new(seed: u64) -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.elapsed.lock() += by;
    }

    /// Time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn unix_millis(&self) -> u64 {
        SIM_EPOCH_MILLIS + self.elapsed().as_millis() as u64
    }

    fn random_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}
