//! kpimon-southbound: E2 termination session
//!
//! Prepares a session against the E2T endpoint and keeps a connection to it
//! alive for the life of the process, reconnecting with exponential backoff.

pub mod session;

pub use session::{E2Session, E2SessionFactory, Endpoint, ExponentialBackoff};
