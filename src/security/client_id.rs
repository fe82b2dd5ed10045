//! Client identification for per-client limits.
//!
//! The service usually sits behind a proxy, so the first `X-Forwarded-For`
//! entry wins when forwarding headers are trusted. Otherwise the peer address
//! from the connection is used.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::http::server::AppState;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Identifier used to key rate limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolve the client identifier from headers and the peer address.
pub fn resolve_client_id(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> ClientId {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ClientId(ip.to_string());
        }
    }

    match peer {
        Some(addr) => ClientId(addr.ip().to_string()),
        None => ClientId("unknown".to_string()),
    }
}

impl FromRequestParts<AppState> for ClientId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(resolve_client_id(
            &parts.headers,
            peer,
            state.config.listener.trust_forwarded_for,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.7:51000".parse().unwrap())
    }

    #[test]
    fn test_first_forwarded_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"));
        assert_eq!(resolve_client_id(&headers, peer(), true).as_str(), "203.0.113.9");
    }

    #[test]
    fn test_untrusted_header_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.9"));
        assert_eq!(resolve_client_id(&headers, peer(), false).as_str(), "192.0.2.7");
    }

    #[test]
    fn test_fallbacks() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_client_id(&headers, peer(), true).as_str(), "192.0.2.7");
        assert_eq!(resolve_client_id(&headers, None, true).as_str(), "unknown");
    }
}
