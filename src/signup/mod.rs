//! Signup flow subsystem.
//!
//! # Data Flow
//! ```text
//! /check_display_name → service.rs → faults.rs (maybe stall) → registry.rs
//! /submit             → service.rs → rate limit → form.rs gates
//!                                   → rules.rs → faults.rs → registry.rs
//! ```
//!
//! # Design Decisions
//! - All state lives in a `SignupService` instance, never in globals
//! - Field rules collect every error; only the gates short-circuit
//! - Flakiness draws from the injected environment

pub mod faults;
pub mod form;
pub mod registry;
pub mod rules;
pub mod service;

pub use form::{PendingFlag, RecoveryPhrase, SignupForm};
pub use registry::DisplayNameRegistry;
pub use service::{AccountCreated, SignupService};
