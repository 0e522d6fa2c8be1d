//! kpimon-manager: process lifecycle for the KPI monitor
//!
//! The manager brings up the northbound server, waits until it reports
//! ready, and only then launches the southbound E2T session in the
//! background.

pub mod error;
pub mod manager;
pub mod readiness;
pub mod state;

pub use error::ManagerError;
pub use manager::{FatalHandler, Manager, RIC_MODEL_VERSION};
pub use readiness::{ready_signal, ReadySignal, ReadyWaiter};
pub use state::StartupState;
