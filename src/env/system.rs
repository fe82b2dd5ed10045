//! Production environment using system time and a process-local RNG.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::Environment;

/// Production environment.
///
/// - Uses `Instant::now()` and `SystemTime::now()` for time
/// - Uses a `StdRng` owned by this instance, seeded from OS entropy unless a
///   seed is supplied (handy for replaying a flaky session)
pub struct SystemEnv {
    rng: Mutex<StdRng>,
}

impl SystemEnv {
    /// Create a system environment. `seed` pins the fault sequence.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                tracing::info!(seed, "Using fixed RNG seed");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for SystemEnv {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn random_unit(&self) -> f64 {
        self.rng.lock().gen::<f64>()
    }
}
