//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared state (signup service, sessions, environment)
//! - Create the Axum router with every route
//! - Wire up middleware (session guard, tracing, metrics, limits, request ID)
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::env::{Environment, SystemEnv};
use crate::http::{handlers, pages};
use crate::observability::metrics;
use crate::session::{session_guard, SessionStore};
use crate::signup::SignupService;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub signup: Arc<SignupService>,
    pub sessions: Arc<SessionStore>,
    pub env: Arc<dyn Environment>,
}

impl AppState {
    /// Fresh state: nothing shared with any other instance.
    pub fn new(config: AppConfig, env: Arc<dyn Environment>) -> Self {
        let signup = SignupService::new(
            config.signup.clone(),
            &config.simulation,
            &config.registry.reserved_display_names,
            env.clone(),
        );
        let sessions = SessionStore::new(Duration::from_secs(config.signup.session_timeout_seconds));

        Self {
            config: Arc::new(config),
            signup: Arc::new(signup),
            sessions: Arc::new(sessions),
            env,
        }
    }
}

/// HTTP server for the signup flow.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server backed by the system clock and RNG.
    pub fn new(config: AppConfig) -> Self {
        let env: Arc<dyn Environment> = Arc::new(SystemEnv::new(config.simulation.rng_seed));
        Self::with_environment(config, env)
    }

    /// Create a server over an explicit environment (tests use `SimEnv`).
    pub fn with_environment(config: AppConfig, env: Arc<dyn Environment>) -> Self {
        let state = AppState::new(config, env);
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Shared state, for inspection.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The fully layered router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let listener = &state.config.listener;
    let timeout = Duration::from_secs(listener.request_timeout_secs);
    let body_limit = listener.max_body_bytes;

    Router::new()
        .route("/", get(pages::index))
        .route("/check_display_name", get(handlers::check_display_name))
        .route("/submit", post(handlers::submit))
        .route("/static-config", get(handlers::static_config))
        .route("/session_expired", get(pages::session_expired))
        .route("/user_info", get(pages::user_info))
        .route("/credentials", get(pages::credentials))
        .route("/review", get(pages::review))
        .route("/success", get(pages::success))
        .route("/failed", get(pages::failed))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard))
        .layer(middleware::from_fn(metrics::track_requests))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
