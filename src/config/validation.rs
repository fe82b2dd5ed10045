//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and addresses.
//! Every problem is reported, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a socket address: {value}")]
    BadAddress { field: &'static str, value: String },

    /// The request timeout would cut the stall short and answer 408 instead
    /// of the 500 `timeout` body.
    #[error(
        "simulation.display_name_timeout_delay_ms ({delay_ms}) must be below \
         listener.request_timeout_secs ({timeout_ms} ms)"
    )]
    StallOutlastsRequestTimeout { delay_ms: u64, timeout_ms: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let signup = &config.signup;

    for (field, value) in [
        ("signup.display_name_timeout_prob", signup.display_name_timeout_prob),
        ("signup.email_reject_rate", signup.email_reject_rate),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::ProbabilityOutOfRange { field, value });
        }
    }

    if signup.session_timeout_seconds == 0 {
        errors.push(ValidationError::Zero { field: "signup.session_timeout_seconds" });
    }
    if signup.rate_limit_window_s == 0 {
        errors.push(ValidationError::Zero { field: "signup.rate_limit_window_s" });
    }
    if signup.rate_limit_max == 0 {
        errors.push(ValidationError::Zero { field: "signup.rate_limit_max" });
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "listener.request_timeout_secs" });
    }

    let delay_ms = config.simulation.display_name_timeout_delay_ms;
    let timeout_ms = config.listener.request_timeout_secs.saturating_mul(1000);
    if timeout_ms > 0 && delay_ms >= timeout_ms {
        errors.push(ValidationError::StallOutlastsRequestTimeout { delay_ms, timeout_ms });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
