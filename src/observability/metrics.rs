//! Metrics collection and exposition.
//!
//! # Metrics
//! - `signup_http_requests_total` (counter): requests by method, path, status
//! - `signup_http_request_duration_seconds` (histogram): latency distribution
//! - `signup_rejections_total` (counter): refused submissions by reason
//! - `signup_injected_faults_total` (counter): simulated failures by kind
//! - `signup_accounts_created_total` (counter)
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Middleware recording request count and latency per matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    record_request(&method, &path, response.status().as_u16(), start);
    response
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    metrics::counter!(
        "signup_http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "signup_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rejection(reason: &'static str) {
    metrics::counter!("signup_rejections_total", "reason" => reason).increment(1);
}

pub fn record_fault(kind: &'static str) {
    metrics::counter!("signup_injected_faults_total", "kind" => kind).increment(1);
}

pub fn record_account_created() {
    metrics::counter!("signup_accounts_created_total").increment(1);
}
