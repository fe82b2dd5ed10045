//! HTTP client for the signup service.
//!
//! The service fails on purpose; this client is the reference for absorbing
//! that: availability checks are retried through timeouts and 5xx, while a
//! submission is only repeated when the server refused it with 429.

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::SignupConfig;
use crate::error::FieldError;
use crate::http::response::AvailabilityBody;
use crate::resilience::retries::{is_retryable_error, is_retryable_status};
use crate::resilience::RetryPolicy;
use crate::signup::SignupForm;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("gave up after {attempts} attempts, last failure: {last}")]
    Exhausted { attempts: u32, last: String },
}

/// What the server said about a submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub status: StatusCode,
    pub body: Value,
}

impl SubmitOutcome {
    pub fn account_id(&self) -> Option<&str> {
        self.body.get("account_id").and_then(Value::as_str)
    }

    /// Field errors of a 400 response.
    pub fn errors(&self) -> Vec<FieldError> {
        self.body
            .get("errors")
            .cloned()
            .and_then(|errors| serde_json::from_value(errors).ok())
            .unwrap_or_default()
    }

    /// The `error` tag of 403/409/429 responses.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

pub struct SignupClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    jitter: Mutex<StdRng>,
}

impl SignupClient {
    /// `request_timeout` bounds each attempt, not the whole retry loop.
    pub fn new(base_url: &str, request_timeout: Duration, retry: RetryPolicy) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            jitter: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Draw backoff jitter from a fixed seed instead of OS entropy.
    pub fn with_jitter_seed(self, seed: u64) -> Self {
        Self {
            jitter: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    fn next_backoff(&self, attempt: u32) -> Duration {
        self.retry.backoff(attempt, &mut *self.jitter.lock())
    }

    pub async fn static_config(&self) -> Result<SignupConfig, ClientError> {
        let res = self
            .http
            .get(format!("{}/static-config", self.base_url))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(res.json().await?)
    }

    /// Ask whether `name` is taken, retrying simulated timeouts.
    pub async fn check_display_name(&self, name: &str) -> Result<bool, ClientError> {
        let url = format!("{}/check_display_name", self.base_url);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = self
                .http
                .get(&url)
                .query(&[("display_name", name)])
                .send()
                .await;

            let last = match result {
                Ok(res) if res.status().is_success() => {
                    let body: AvailabilityBody = res.json().await?;
                    return Ok(body.taken);
                }
                Ok(res) if is_retryable_status(res.status()) => format!("status {}", res.status()),
                Ok(res) => {
                    let status = res.status();
                    let body = res.text().await.unwrap_or_default();
                    return Err(ClientError::Status { status, body });
                }
                Err(e) if is_retryable_error(&e) => e.to_string(),
                Err(e) => return Err(e.into()),
            };

            if !self.retry.has_attempts_left(attempts) {
                tracing::warn!(attempts, last = %last, "Display name check failed");
                return Err(ClientError::Exhausted { attempts, last });
            }
            let delay = self.next_backoff(attempts);
            tracing::info!(attempt = attempts, delay = ?delay, reason = %last, "Retrying display name check");
            tokio::time::sleep(delay).await;
        }
    }

    /// Post a submission. Only 429 answers are retried.
    pub async fn submit(&self, form: &SignupForm) -> Result<SubmitOutcome, ClientError> {
        let url = format!("{}/submit", self.base_url);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let res = self.http.post(&url).json(form).send().await?;
            let status = res.status();
            let text = res.text().await?;
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

            if status == StatusCode::TOO_MANY_REQUESTS && self.retry.has_attempts_left(attempts) {
                let delay = self.next_backoff(attempts);
                tracing::info!(attempt = attempts, delay = ?delay, "Rate limited, retrying submission");
                tokio::time::sleep(delay).await;
                continue;
            }

            return Ok(SubmitOutcome { status, body });
        }
    }
}
