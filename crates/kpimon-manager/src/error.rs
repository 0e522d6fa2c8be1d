//! Manager error types

use thiserror::Error;

use kpimon_core::{ServerError, SessionError};

/// Errors that keep the manager from reaching a running state
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The E2T session could not be created
    #[error("Failed to create E2T session: {0}")]
    Session(#[from] SessionError),

    /// The northbound server failed before becoming ready
    #[error("Northbound server failed to start: {0}")]
    Northbound(#[from] ServerError),

    /// `start` was called on a manager that already left `NotStarted`
    #[error("Manager already started")]
    AlreadyStarted,
}
