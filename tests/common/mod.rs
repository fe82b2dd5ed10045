//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use flaky_signup::config::{AppConfig, SignupConfig};
use flaky_signup::env::{Environment, SimEnv};
use flaky_signup::http::{AppState, HttpServer};
use flaky_signup::lifecycle::Shutdown;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config with every random failure off and no artificial delays.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.signup = SignupConfig::deterministic();
    config.simulation.display_name_timeout_delay_ms = 0;
    config
}

pub async fn start_server(config: AppConfig) -> TestServer {
    start_server_with_env(config, Arc::new(SimEnv::default())).await
}

pub async fn start_server_with_env(config: AppConfig, env: Arc<dyn Environment>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::with_environment(config, env);
    let state = server.state().clone();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        state,
        shutdown,
    }
}

/// The documented happy-path payload.
pub fn valid_payload() -> Value {
    json!({
        "name": "bob1",
        "email": "a@b.com",
        "password": "abc123",
        "confirm_password": "abc123",
        "recovery_phrase": "x",
        "captcha": "passed",
    })
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Environment whose random draws come from a script, then a fallback.
pub struct ScriptedEnv {
    draws: Mutex<VecDeque<f64>>,
    fallback: f64,
}

impl ScriptedEnv {
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            draws: Mutex::new(draws.into_iter().collect()),
            fallback,
        }
    }
}

impl Environment for ScriptedEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_millis(&self) -> u64 {
        1_700_000_000_000
    }

    fn random_unit(&self) -> f64 {
        self.draws.lock().pop_front().unwrap_or(self.fallback)
    }
}
