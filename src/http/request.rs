//! Request payload extraction.
//!
//! `/submit` takes JSON when the content type says so and an urlencoded form
//! otherwise. Parse failures become a 400 with a single `body` field error so
//! clients see the same shape as any other validation failure.

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};

use crate::error::{FieldError, SignupError};
use crate::signup::SignupForm;

pub const FIELD_BODY: &str = "body";

/// A signup form read from either body encoding.
#[derive(Debug)]
pub struct SignupPayload(pub SignupForm);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            let mime = mime.trim();
            mime == "application/json" || mime.ends_with("+json")
        })
}

impl<S> FromRequest<S> for SignupPayload
where
    S: Send + Sync,
{
    type Rejection = SignupError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = if is_json(&req) {
            Json::<SignupForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|rejection| malformed(rejection.body_text()))?
        } else {
            Form::<SignupForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|rejection| malformed(rejection.body_text()))?
        };
        Ok(SignupPayload(form))
    }
}

fn malformed(reason: String) -> SignupError {
    tracing::debug!(reason = %reason, "Unreadable signup body");
    SignupError::Validation(vec![FieldError::new(FIELD_BODY, reason)])
}
