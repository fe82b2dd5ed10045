//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, limits)
//!     → session guard (idle timeout, may redirect)
//!     → handlers.rs / pages.rs
//!         → request.rs (JSON or form body)
//!         → signup service
//!     → response.rs (status + JSON body per outcome)
//! ```

pub mod handlers;
pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use server::{build_router, AppState, HttpServer};
