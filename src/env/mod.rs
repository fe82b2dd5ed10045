//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the signup logic from system resources
//! (time and randomness). Production wiring uses [`SystemEnv`]; tests use
//! [`SimEnv`], whose clock only moves when told to and whose RNG is seeded.
//!
//! # Invariants
//!
//! - Monotonicity: `env.now()` must never go backwards
//! - Determinism: given the same seed, `random_unit()` produces the same
//!   sequence
//! - Isolation: implementations must not share global state

pub mod sim;
pub mod system;

use std::time::Instant;

pub use sim::SimEnv;
pub use system::SystemEnv;

/// Time and randomness as seen by the signup service.
pub trait Environment: Send + Sync + 'static {
    /// Monotonic time, used for idle timeouts and rate-limit windows.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch.
    fn unix_millis(&self) -> u64;

    /// A uniformly distributed sample in `[0, 1)`.
    fn random_unit(&self) -> f64;

    /// Returns true with the given probability.
    ///
    /// A sample is drawn even for 0.0 and 1.0.
    fn chance(&self, probability: f64) -> bool {
        self.random_unit() < probability
    }
}
