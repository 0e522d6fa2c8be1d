//! E2T session management

mod e2;
mod endpoint;
mod reconnect;

pub use e2::{E2Session, E2SessionFactory};
pub use endpoint::Endpoint;
pub use reconnect::ExponentialBackoff;
