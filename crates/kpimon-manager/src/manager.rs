//! KPI monitor manager
//!
//! Owns the configuration and the E2T session, and drives startup:
//!
//! ```text
//! NotStarted ──▶ ServerStarting ──▶ ServerReady ──▶ SessionLaunched
//!                      │
//!                      └──────────▶ Failed
//! ```
//!
//! The session loop is never launched before the northbound server has
//! reported ready. Neither background task can be cancelled or bounded in
//! time once launched, and keeping the process alive is the caller's job.

use std::sync::{Arc, Mutex};

use tracing::Instrument;

use kpimon_core::config::{ManagerConfig, ServerConfig};
use kpimon_core::traits::{ServerFactory, Session, SessionFactory};
use kpimon_core::{ModelInfo, ModelType, ServiceDescriptor};

use crate::error::ManagerError;
use crate::readiness::ready_signal;
use crate::state::StartupState;

/// Version of the RIC model registered on the northbound server
pub const RIC_MODEL_VERSION: &str = "1.0.0";

/// Called by [`Manager::run`] when startup fails
pub type FatalHandler = Arc<dyn Fn(&ManagerError) + Send + Sync>;

/// Manager for the KPI monitor service
pub struct Manager {
    /// Configuration
    config: ManagerConfig,
    /// E2T session, launched once the northbound server is ready
    session: Arc<dyn Session>,
    /// Builds the northbound server at startup
    servers: Arc<dyn ServerFactory>,
    /// Startup progress
    state: Mutex<StartupState>,
    /// What to do with a startup failure
    on_fatal: FatalHandler,
    /// Logging context for the manager and the tasks it spawns
    span: tracing::Span,
}

impl Manager {
    /// Create a new manager.
    ///
    /// Fails if the E2T session cannot be created; there is no manager without a session.
    pub fn new(
        config: ManagerConfig,
        sessions: &dyn SessionFactory,
        servers: Arc<dyn ServerFactory>,
    ) -> Result<Self, ManagerError> {
        let span = tracing::info_span!("manager");

        let session = span.in_scope(|| {
            tracing::info!(endpoint = %config.e2t_endpoint, "Creating Manager");
            sessions.create_session(&config.e2t_endpoint).map_err(|e| {
                tracing::error!("{}", e);
                ManagerError::Session(e)
            })
        })?;

        Ok(Self {
            config,
            session,
            servers,
            state: Mutex::new(StartupState::NotStarted),
            on_fatal: Arc::new(exit_process),
            span,
        })
    }

    /// Replace the handler invoked when [`Manager::run`] fails to start
    pub fn with_fatal_handler(mut self, handler: FatalHandler) -> Self {
        self.on_fatal = handler;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Get the E2T session
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Current startup state
    pub fn state(&self) -> StartupState {
        *self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start the manager and treat any startup failure as fatal
    pub async fn run(&self) {
        tracing::info!(parent: &self.span, "Running Manager");
        if let Err(e) = self.start().await {
            tracing::error!(parent: &self.span, "Unable to run Manager: {}", e);
            (self.on_fatal)(&e);
        }
    }

    /// Start the northbound server, wait for it to be ready, then launch the E2T session.
    ///
    /// Returns once the session loop has been spawned; it does not wait for
    /// the loop to produce anything.
    pub async fn start(&self) -> Result<(), ManagerError> {
        self.begin()?;

        if let Err(e) = self
            .start_northbound_server()
            .instrument(self.span.clone())
            .await
        {
            self.set_state(StartupState::Failed);
            return Err(e);
        }
        self.set_state(StartupState::ServerReady);

        let session = Arc::clone(&self.session);
        tokio::spawn(async move { session.run().await }.instrument(self.span.clone()));
        self.set_state(StartupState::SessionLaunched);

        tracing::info!(
            parent: &self.span,
            endpoint = self.session.endpoint(),
            "E2T session launched"
        );
        Ok(())
    }

    /// Log that the manager is closing.
    ///
    /// The background tasks are not stopped; they end with the process.
    pub fn close(&self) {
        let state = self.state();
        if state.is_terminal() {
            tracing::info!(parent: &self.span, %state, "Closing Manager");
        } else {
            tracing::warn!(parent: &self.span, %state, "Closing Manager before startup finished");
        }
    }

    /// Bring up the northbound server and block until it is ready or has failed
    async fn start_northbound_server(&self) -> Result<(), ManagerError> {
        let mut server = self
            .servers
            .create_server(ServerConfig::from_manager(&self.config, true));
        server.add_service(ServiceDescriptor::Gnmi(ModelInfo::new(
            ModelType::Ric,
            RIC_MODEL_VERSION,
        )));

        let (signal, waiter) = ready_signal();
        let callback = signal.clone();

        let serving = async move {
            let result = server
                .serve(Box::new(move |address: String| {
                    tracing::info!("Started NBI on {}", address);
                    callback.ready(address);
                }))
                .await;

            match result {
                Err(e) if signal.is_resolved() => {
                    tracing::error!("Northbound server failed after startup: {}", e);
                }
                Err(e) => {
                    signal.fail(e);
                }
                Ok(()) => tracing::info!("Northbound server stopped"),
            }
        };
        tokio::spawn(serving.in_current_span());

        waiter.wait().await?;
        Ok(())
    }

    /// Move from `NotStarted` to `ServerStarting`, or refuse
    fn begin(&self) -> Result<(), ManagerError> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *state != StartupState::NotStarted {
            return Err(ManagerError::AlreadyStarted);
        }
        *state = StartupState::ServerStarting;
        tracing::debug!(
            parent: &self.span,
            state = %StartupState::ServerStarting,
            "Startup state changed"
        );
        Ok(())
    }

    fn set_state(&self, next: StartupState) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = next;
        tracing::debug!(parent: &self.span, state = %next, "Startup state changed");
    }
}

/// Default fatal handler: end the process
fn exit_process(_: &ManagerError) {
    std::process::exit(1);
}
