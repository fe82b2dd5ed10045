//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the signup
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the signup service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, request limits).
    pub listener: ListenerConfig,

    /// Signup flow tuning. Dumped verbatim by `/static-config`.
    pub signup: SignupConfig,

    /// Knobs for the simulated backend.
    pub simulation: SimulationConfig,

    /// Display names that are taken from the start.
    pub registry: RegistryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8000").
    pub bind_address: String,

    /// Use the first `X-Forwarded-For` entry as the client identifier.
    pub trust_forwarded_for: bool,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            trust_forwarded_for: true,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Behavior tuning for the signup flow.
///
/// Field names are part of the external contract: `/static-config` reports
/// them unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignupConfig {
    /// Probability that a display-name check stalls and fails.
    pub display_name_timeout_prob: f64,

    /// Probability that a submission gets a spurious email rejection.
    pub email_reject_rate: f64,

    /// Idle time after which a session is discarded.
    pub session_timeout_seconds: u64,

    /// Length of the sliding rate-limit window.
    pub rate_limit_window_s: u64,

    /// Submissions allowed per client inside one window.
    pub rate_limit_max: usize,

    /// Reject submissions that fill in the hidden `middle_initial` field.
    pub honeypot_enabled: bool,

    /// Reported to the front end only.
    pub accessibility_mode: bool,
}

impl Default for SignupConfig {
    fn default() -> Self {
        Self {
            display_name_timeout_prob: 0.05,
            email_reject_rate: 0.03,
            session_timeout_seconds: 30,
            rate_limit_window_s: 10,
            rate_limit_max: 10,
            honeypot_enabled: true,
            accessibility_mode: false,
        }
    }
}

impl SignupConfig {
    /// A configuration with every random failure switched off.
    pub fn deterministic() -> Self {
        Self {
            display_name_timeout_prob: 0.0,
            email_reject_rate: 0.0,
            ..Self::default()
        }
    }
}

/// Simulated backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Stall before a display-name check reports a timeout, in milliseconds.
    pub display_name_timeout_delay_ms: u64,

    /// Fixed RNG seed. Unset means seeded from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            display_name_timeout_delay_ms: 2000,
            rng_seed: None,
        }
    }
}

/// Display name registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub reserved_display_names: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reserved_display_names: vec![
                "alice".to_string(),
                "bob".to_string(),
                "charlie".to_string(),
            ],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [signup]
            rate_limit_max = 3
            honeypot_enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.signup.rate_limit_max, 3);
        assert!(!config.signup.honeypot_enabled);
        assert_eq!(config.signup.session_timeout_seconds, 30);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8000");
        assert_eq!(config.registry.reserved_display_names.len(), 3);
    }

    #[test]
    fn test_signup_config_json_keys() {
        let json = serde_json::to_value(SignupConfig::default()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();

        for key in [
            "display_name_timeout_prob",
            "email_reject_rate",
            "session_timeout_seconds",
            "rate_limit_window_s",
            "rate_limit_max",
            "honeypot_enabled",
            "accessibility_mode",
        ] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn test_log_format_parses_snake_case() {
        let config: ObservabilityConfig = toml::from_str("log_format = \"json\"").unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
