//! Startup state machine

use std::fmt;

/// Where the manager is in its startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    /// `start` has not been called
    NotStarted,
    /// Waiting for the northbound server to report ready
    ServerStarting,
    /// Northbound server is reachable
    ServerReady,
    /// E2T session loop is running in the background
    SessionLaunched,
    /// Northbound startup failed
    Failed,
}

impl StartupState {
    /// Whether no further transition can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, StartupState::SessionLaunched | StartupState::Failed)
    }
}

impl fmt::Display for StartupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StartupState::NotStarted => "not-started",
            StartupState::ServerStarting => "server-starting",
            StartupState::ServerReady => "server-ready",
            StartupState::SessionLaunched => "session-launched",
            StartupState::Failed => "failed",
        };
        f.write_str(name)
    }
}
