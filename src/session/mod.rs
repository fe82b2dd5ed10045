//! Session subsystem.
//!
//! Sessions carry nothing but a last-activity instant. The guard stamps it on
//! every request and bounces idle clients to `/session_expired`. Expiry is
//! evaluated per request; there is no background sweep.

pub mod guard;
pub mod store;

pub use guard::{session_guard, EXPIRED_PATH, SESSION_COOKIE};
pub use store::{SessionCheck, SessionState, SessionStore};
