//! JSON endpoints of the signup flow.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::config::SignupConfig;
use crate::error::SignupError;
use crate::http::request::SignupPayload;
use crate::http::response::AvailabilityBody;
use crate::http::server::AppState;
use crate::security::ClientId;
use crate::signup::AccountCreated;

#[derive(Debug, Deserialize)]
pub struct DisplayNameQuery {
    #[serde(default)]
    pub display_name: String,
}

/// `GET /check_display_name`
pub async fn check_display_name(
    State(state): State<AppState>,
    Query(query): Query<DisplayNameQuery>,
) -> Result<Json<AvailabilityBody>, SignupError> {
    let taken = state.signup.check_display_name(&query.display_name).await?;
    tracing::debug!(display_name = %query.display_name, taken, "Display name checked");
    Ok(Json(AvailabilityBody { taken }))
}

/// `POST /submit`
///
/// The rate limit is applied before the body is looked at, so unreadable
/// submissions still count against the client.
pub async fn submit(
    State(state): State<AppState>,
    client: ClientId,
    payload: Result<SignupPayload, SignupError>,
) -> Result<AccountCreated, SignupError> {
    state.signup.admit(&client)?;
    let SignupPayload(form) = payload?;
    state.signup.register(&client, form)
}

/// `GET /static-config`
pub async fn static_config(State(state): State<AppState>) -> Json<SignupConfig> {
    Json(state.signup.config().clone())
}
