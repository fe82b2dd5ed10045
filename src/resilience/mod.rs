//! Resilience subsystem (client side).
//!
//! # Data Flow
//! ```text
//! Request to the signup service:
//!     → per-request timeout (reqwest)
//!     → On failure: retries.rs (retryable?) → backoff.rs (how long to wait)
//! ```
//!
//! # Design Decisions
//! - Only idempotent calls are retried on 5xx and timeouts
//! - Backoff is exponential with jitter

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
