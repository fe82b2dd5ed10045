//! Idle-timeout middleware, run ahead of every route.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::http::server::AppState;
use crate::session::store::SessionCheck;

pub const SESSION_COOKIE: &str = "signup_session";
pub const EXPIRED_PATH: &str = "/session_expired";

pub async fn session_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let now = state.env.now();
    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    match state.sessions.touch(presented.as_deref(), now) {
        SessionCheck::Active => next.run(request).await,
        SessionCheck::Started(id) => {
            let response = next.run(request).await;
            (jar.add(session_cookie(id)), response).into_response()
        }
        SessionCheck::Expired => {
            tracing::info!(path = %request.uri().path(), "Session expired, redirecting");
            let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
            (jar, (StatusCode::FOUND, [(header::LOCATION, EXPIRED_PATH)])).into_response()
        }
    }
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
