//! flaky-signup server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ request id → trace → limits → metrics
//!                        │
//!                        ▼
//!                  session guard ──(idle)──▶ 302 /session_expired
//!                        │
//!                        ▼
//!     ┌──────────────────────────────────────────────────┐
//!     │ routes                                           │
//!     │  /check_display_name → registry (maybe stall)    │
//!     │  /submit → rate limit → honeypot → captcha       │
//!     │           → field rules → injected rejection     │
//!     │           → pending check → account id           │
//!     │  /static-config, informational pages             │
//!     └──────────────────────────────────────────────────┘
//!
//!     Cross-cutting: config, env (clock + rng), observability, lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use flaky_signup::config::load_or_default;
use flaky_signup::lifecycle::{signals, Shutdown};
use flaky_signup::observability::{logging, metrics};
use flaky_signup::HttpServer;

#[derive(Parser)]
#[command(name = "flaky-signup")]
#[command(about = "Signup flow with injected failures, for exercising client retry logic", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("flaky-signup v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        session_timeout_seconds = config.signup.session_timeout_seconds,
        rate_limit_max = config.signup.rate_limit_max,
        rate_limit_window_s = config.signup.rate_limit_window_s,
        display_name_timeout_prob = config.signup.display_name_timeout_prob,
        email_reject_rate = config.signup.email_reject_rate,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
