//! Mapping signup outcomes to HTTP responses.
//!
//! | outcome          | status | body                                       |
//! |------------------|--------|--------------------------------------------|
//! | `RateLimited`    | 429    | `{"error":"rate_limited"}`                 |
//! | `BotDetected`    | 403    | `{"error":"honeypot_triggered"}`           |
//! | `Validation`     | 400    | `{"success":false,"errors":[...]}`         |
//! | `StateConflict`  | 409    | `{"error":"state_inconsistent"}`           |
//! | `BackendTimeout` | 500    | `{"error":"timeout"}`                      |
//! | account created  | 200    | `{"success":true,"account_id":"acct_..."}` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, SignupError};
use crate::signup::AccountCreated;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationBody {
    pub success: bool,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
    pub account_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityBody {
    pub taken: bool,
}

impl SignupError {
    pub fn status(&self) -> StatusCode {
        match self {
            SignupError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SignupError::BotDetected => StatusCode::FORBIDDEN,
            SignupError::Validation(_) => StatusCode::BAD_REQUEST,
            SignupError::StateConflict => StatusCode::CONFLICT,
            SignupError::BackendTimeout => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SignupError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            SignupError::Validation(errors) => (
                status,
                Json(ValidationBody {
                    success: false,
                    errors,
                }),
            )
                .into_response(),
            other => (
                status,
                Json(ErrorBody {
                    error: other.reason().to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for AccountCreated {
    fn into_response(self) -> Response {
        Json(SuccessBody {
            success: true,
            account_id: self.account_id,
        })
        .into_response()
    }
}
