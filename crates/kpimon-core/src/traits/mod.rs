//! Core trait definitions
//!
//! The manager only ever talks to the southbound session and the
//! northbound server through these seams.

mod server;
mod session;

pub use server::{ReadyCallback, Server, ServerFactory};
pub use session::{Session, SessionFactory};
