//! Single-slot readiness signal
//!
//! Turns the northbound server's asynchronous "became reachable" event into
//! something the startup path can await. The slot is written by at most one
//! of two producers (the ready callback or the serve error path) and read by
//! exactly one consumer.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use kpimon_core::ServerError;

/// Outcome of a startup attempt: the ready address, or the error that prevented it
pub type ReadyOutcome = Result<String, ServerError>;

/// Producer side; cheap to clone, resolves at most once across all clones
#[derive(Clone)]
pub struct ReadySignal {
    slot: Arc<Mutex<Option<oneshot::Sender<ReadyOutcome>>>>,
}

/// Consumer side
pub struct ReadyWaiter {
    rx: oneshot::Receiver<ReadyOutcome>,
}

/// Create a connected signal/waiter pair
pub fn ready_signal() -> (ReadySignal, ReadyWaiter) {
    let (tx, rx) = oneshot::channel();
    (
        ReadySignal {
            slot: Arc::new(Mutex::new(Some(tx))),
        },
        ReadyWaiter { rx },
    )
}

impl ReadySignal {
    /// Deliver `outcome` if nothing has been delivered yet.
    ///
    /// Returns `true` if this call filled the slot.
    pub fn resolve(&self, outcome: ReadyOutcome) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match sender {
            Some(tx) => {
                // The waiter may be gone; the slot is spent either way
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Report that the server is reachable at `address`
    pub fn ready(&self, address: String) -> bool {
        self.resolve(Ok(address))
    }

    /// Report a startup failure
    pub fn fail(&self, error: ServerError) -> bool {
        self.resolve(Err(error))
    }

    /// Whether an outcome has already been delivered
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl ReadyWaiter {
    /// Wait for the outcome. No timeout is applied.
    ///
    /// If every producer is dropped without resolving, the serve path ended
    /// without ever becoming ready.
    pub async fn wait(self) -> ReadyOutcome {
        self.rx
            .await
            .unwrap_or(Err(ServerError::ExitedBeforeReady))
    }
}
