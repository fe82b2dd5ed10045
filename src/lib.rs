//! Signup flow service with injectable flakiness.

pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod session;
pub mod signup;

pub use config::AppConfig;
pub use error::{FieldError, SignupError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
