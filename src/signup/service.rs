//! The signup pipeline.
//!
//! ```text
//! submit:
//!     admit     rate limit (429), attempt recorded
//!     register  honeypot (403)
//!               captcha (400, captcha error only)
//!               field rules, all collected
//!               injected email rejection
//!               pending display-name check (409)
//!               field errors (400)
//!               account id + display name reserved
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::{SignupConfig, SimulationConfig};
use crate::env::Environment;
use crate::error::{FieldError, SignupError};
use crate::observability::metrics;
use crate::security::{ClientId, SlidingWindowLimiter};
use crate::signup::faults::FaultInjector;
use crate::signup::form::SignupForm;
use crate::signup::registry::DisplayNameRegistry;
use crate::signup::rules::{self, FIELD_CAPTCHA, FIELD_EMAIL, MSG_CAPTCHA, MSG_EMAIL_BLACKLISTED};

/// A successful signup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountCreated {
    pub account_id: String,
    pub display_name: Option<String>,
}

/// Owns all mutable signup state for one service instance.
pub struct SignupService {
    config: SignupConfig,
    registry: DisplayNameRegistry,
    limiter: SlidingWindowLimiter,
    faults: FaultInjector,
    env: Arc<dyn Environment>,
}

impl SignupService {
    pub fn new(
        config: SignupConfig,
        simulation: &SimulationConfig,
        reserved_names: &[String],
        env: Arc<dyn Environment>,
    ) -> Self {
        let limiter = SlidingWindowLimiter::new(
            Duration::from_secs(config.rate_limit_window_s),
            config.rate_limit_max,
            env.clone(),
        );
        let faults = FaultInjector::new(
            env.clone(),
            config.display_name_timeout_prob,
            config.email_reject_rate,
            Duration::from_millis(simulation.display_name_timeout_delay_ms),
        );

        Self {
            config,
            registry: DisplayNameRegistry::with_reserved(reserved_names),
            limiter,
            faults,
            env,
        }
    }

    pub fn config(&self) -> &SignupConfig {
        &self.config
    }

    pub fn registry(&self) -> &DisplayNameRegistry {
        &self.registry
    }

    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }

    /// Report whether `name` is taken, unless the simulated backend stalls.
    pub async fn check_display_name(&self, name: &str) -> Result<bool, SignupError> {
        if self.faults.display_name_timeout() {
            tokio::time::sleep(self.faults.timeout_delay()).await;
            return Err(SignupError::BackendTimeout);
        }
        Ok(self.registry.is_taken(name))
    }

    /// Rate-limit gate for a submission. Admitted attempts are recorded.
    pub fn admit(&self, client: &ClientId) -> Result<(), SignupError> {
        if self.limiter.try_acquire(client.as_str()) {
            Ok(())
        } else {
            Err(self.reject(client, SignupError::RateLimited))
        }
    }

    /// Everything after the rate limit.
    pub fn register(&self, client: &ClientId, form: SignupForm) -> Result<AccountCreated, SignupError> {
        if self.config.honeypot_enabled && form.honeypot_filled() {
            return Err(self.reject(client, SignupError::BotDetected));
        }

        if !form.captcha_passed() {
            let errors = vec![FieldError::new(FIELD_CAPTCHA, MSG_CAPTCHA)];
            return Err(self.reject(client, SignupError::Validation(errors)));
        }

        let mut errors = rules::validate_fields(&form);
        if self.faults.email_rejection() {
            errors.push(FieldError::new(FIELD_EMAIL, MSG_EMAIL_BLACKLISTED));
        }

        if form.check_pending() {
            return Err(self.reject(client, SignupError::StateConflict));
        }

        if !errors.is_empty() {
            return Err(self.reject(client, SignupError::Validation(errors)));
        }

        let account_id = format!("acct_{}", self.env.unix_millis());
        let display_name = form.display_name.filter(|name| !name.is_empty());
        if let Some(name) = &display_name {
            self.registry.reserve(name);
        }

        tracing::info!(
            client = %client.as_str(),
            account_id = %account_id,
            display_name = ?display_name,
            "Account created"
        );
        metrics::record_account_created();

        Ok(AccountCreated {
            account_id,
            display_name,
        })
    }

    /// Full submission: [`admit`](Self::admit) then [`register`](Self::register).
    pub fn submit(&self, client: &ClientId, form: SignupForm) -> Result<AccountCreated, SignupError> {
        self.admit(client)?;
        self.register(client, form)
    }

    fn reject(&self, client: &ClientId, error: SignupError) -> SignupError {
        match &error {
            SignupError::Validation(errors) => tracing::warn!(
                client = %client.as_str(),
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Signup rejected"
            ),
            other => tracing::warn!(
                client = %client.as_str(),
                reason = other.reason(),
                "Signup rejected"
            ),
        }
        metrics::record_rejection(error.reason());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SimEnv;
    use crate::signup::form::{PendingFlag, RecoveryPhrase};

    fn service_with(config: SignupConfig, env: &SimEnv) -> SignupService {
        let reserved = vec!["alice".to_string(), "bob".to_string(), "charlie".to_string()];
        let simulation = SimulationConfig {
            display_name_timeout_delay_ms: 0,
            rng_seed: None,
        };
        SignupService::new(config, &simulation, &reserved, Arc::new(env.clone()))
    }

    fn service() -> SignupService {
        service_with(SignupConfig::deterministic(), &SimEnv::default())
    }

    fn client() -> ClientId {
        ClientId("198.51.100.4".into())
    }

    fn valid_form() -> SignupForm {
        SignupForm {
            name: "bob1".into(),
            email: "a@b.com".into(),
            password: "abc123".into(),
            confirm_password: "abc123".into(),
            recovery_phrase: Some(RecoveryPhrase::Phrase("x".into())),
            captcha: Some("passed".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_submission_succeeds() {
        let env = SimEnv::default();
        let service = service_with(SignupConfig::deterministic(), &env);
        let form = SignupForm {
            display_name: Some("Bobby".into()),
            ..valid_form()
        };

        let created = service.submit(&client(), form).unwrap();
        assert_eq!(created.account_id, format!("acct_{}", env.unix_millis()));
        assert!(service.registry().is_taken("bobby"));
    }

    #[test]
    fn test_missing_captcha_is_only_error() {
        let form = SignupForm {
            captcha: None,
            name: "x".into(),
            ..valid_form()
        };
        let err = service().submit(&client(), form).unwrap_err();
        assert_eq!(
            err,
            SignupError::Validation(vec![FieldError::new("captcha", "Captcha not passed")])
        );
    }

    #[test]
    fn test_honeypot_beats_everything_else() {
        let form = SignupForm {
            middle_initial: Some("J".into()),
            captcha: None,
            ..Default::default()
        };
        assert_eq!(service().submit(&client(), form), Err(SignupError::BotDetected));
    }

    #[test]
    fn test_honeypot_ignored_when_disabled() {
        let config = SignupConfig {
            honeypot_enabled: false,
            ..SignupConfig::deterministic()
        };
        let form = SignupForm {
            middle_initial: Some("J".into()),
            ..valid_form()
        };
        assert!(service_with(config, &SimEnv::default()).submit(&client(), form).is_ok());
    }

    #[test]
    fn test_pending_check_wins_over_field_errors() {
        let form = SignupForm {
            email: "nope".into(),
            display_name_check_pending: Some(PendingFlag::pending()),
            ..valid_form()
        };
        assert_eq!(service().submit(&client(), form), Err(SignupError::StateConflict));
    }

    #[test]
    fn test_failed_rules_create_no_account() {
        let service = service();
        let form = SignupForm {
            password: "abcdef".into(),
            confirm_password: "abcdeg".into(),
            display_name: Some("zed".into()),
            ..valid_form()
        };

        let errors = match service.submit(&client(), form) {
            Err(SignupError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["password", "confirm_password"]);
        assert!(!service.registry().is_taken("zed"));
    }

    #[test]
    fn test_injected_email_rejection() {
        let config = SignupConfig {
            email_reject_rate: 1.0,
            ..SignupConfig::deterministic()
        };
        let err = service_with(config, &SimEnv::default())
            .submit(&client(), valid_form())
            .unwrap_err();
        assert_eq!(
            err,
            SignupError::Validation(vec![FieldError::new(
                "email",
                "Email domain blacklisted (intermittent)"
            )])
        );
    }

    #[test]
    fn test_rate_limit_counts_rejected_attempts() {
        let env = SimEnv::default();
        let config = SignupConfig {
            rate_limit_max: 2,
            ..SignupConfig::deterministic()
        };
        let service = service_with(config, &env);
        let bad = SignupForm {
            captcha: None,
            ..valid_form()
        };

        assert!(matches!(service.submit(&client(), bad.clone()), Err(SignupError::Validation(_))));
        assert!(matches!(service.submit(&client(), bad), Err(SignupError::Validation(_))));
        assert_eq!(service.submit(&client(), valid_form()), Err(SignupError::RateLimited));

        env.advance(Duration::from_secs(10));
        assert!(service.submit(&client(), valid_form()).is_ok());
    }

    #[test]
    fn test_empty_display_name_not_reserved() {
        let service = service();
        let before = service.registry().len();
        let form = SignupForm {
            display_name: Some(String::new()),
            ..valid_form()
        };
        let created = service.submit(&client(), form).unwrap();
        assert_eq!(created.display_name, None);
        assert_eq!(service.registry().len(), before);
    }

    #[tokio::test]
    async fn test_check_display_name_reports_taken() {
        let service = service();
        for name in ["alice", "Bob", "CHARLIE"] {
            assert_eq!(service.check_display_name(name).await, Ok(true));
        }
        assert_eq!(service.check_display_name("dora").await, Ok(false));
    }

    #[tokio::test]
    async fn test_check_display_name_timeout_branch() {
        let config = SignupConfig {
            display_name_timeout_prob: 1.0,
            ..SignupConfig::deterministic()
        };
        let service = service_with(config, &SimEnv::default());
        assert_eq!(
            service.check_display_name("alice").await,
            Err(SignupError::BackendTimeout)
        );
    }
}
