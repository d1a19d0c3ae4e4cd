//! In-memory session management.
//!
//! Sessions are addressed only by identifier: handlers resolve the `sid` cookie
//! through [`SessionStore`] on every request and never keep a session around
//! between requests.

pub mod cookie;
pub mod store;
pub mod sweeper;
pub mod token;

pub use store::{Session, SessionError, SessionStore, USERNAME};
pub use sweeper::{spawn_sweeper, DEFAULT_SWEEP_INTERVAL_SECS};
