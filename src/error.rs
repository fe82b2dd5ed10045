//! Errors surfaced by the signup flow.
//!
//! Every variant maps to one HTTP status and one JSON body; see
//! `http::response` for the mapping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validation problem attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignupError {
    /// Too many submissions from one client inside the window.
    #[error("rate limited")]
    RateLimited,

    /// The honeypot field was filled in.
    #[error("honeypot triggered")]
    BotDetected,

    /// One or more fields failed validation.
    #[error("validation failed ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// Submitted while a display-name check was still outstanding.
    #[error("display name check still pending")]
    StateConflict,

    /// The simulated availability backend stalled.
    #[error("simulated backend timeout")]
    BackendTimeout,
}

impl SignupError {
    /// Short machine-readable reason, used for logs and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            SignupError::RateLimited => "rate_limited",
            SignupError::BotDetected => "honeypot_triggered",
            SignupError::Validation(_) => "validation",
            SignupError::StateConflict => "state_inconsistent",
            SignupError::BackendTimeout => "timeout",
        }
    }
}
