//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! POST /submit:
//!     → client_id.rs (who is asking: X-Forwarded-For or peer IP)
//!     → rate_limit.rs (sliding-window check per client)
//!     → signup pipeline (honeypot, captcha, field rules)
//! ```
//!
//! # Design Decisions
//! - Limits are per client identifier, never global
//! - Check and record happen under the same per-key lock

pub mod client_id;
pub mod rate_limit;

pub use client_id::ClientId;
pub use rate_limit::SlidingWindowLimiter;
