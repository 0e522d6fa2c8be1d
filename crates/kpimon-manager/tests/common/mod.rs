//! Stub collaborators for manager tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use kpimon_core::config::{ManagerConfig, ServerConfig};
use kpimon_core::traits::{ReadyCallback, Server, ServerFactory, Session, SessionFactory};
use kpimon_core::{ServerError, ServiceDescriptor, SessionError};

/// Something a stub observed, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ServerCreated { port: u16, insecure: bool },
    Serving { services: Vec<ServiceDescriptor> },
    Ready { address: String },
    ServeFailed,
    SessionRun { endpoint: String },
}

/// Shared, timestamped event log
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<(Event, Instant)>>>);

impl EventLog {
    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push((event, Instant::now()));
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn time_of(&self, wanted: fn(&Event) -> bool) -> Option<Instant> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|(e, _)| wanted(e))
            .map(|(_, at)| *at)
    }

    pub fn count(&self, wanted: fn(&Event) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|(e, _)| wanted(e)).count()
    }

    /// Poll until an event shows up or the deadline passes
    pub async fn wait_for(&self, wanted: fn(&Event) -> bool, deadline: Duration) -> bool {
        let give_up = Instant::now() + deadline;
        while Instant::now() < give_up {
            if self.count(wanted) > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.count(wanted) > 0
    }
}

pub fn is_session_run(e: &Event) -> bool {
    matches!(e, Event::SessionRun { .. })
}

pub fn is_ready(e: &Event) -> bool {
    matches!(e, Event::Ready { .. })
}

/// Session that records its launch and then runs forever
pub struct StubSession {
    endpoint: String,
    log: EventLog,
}

#[async_trait]
impl Session for StubSession {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run(&self) {
        self.log.record(Event::SessionRun {
            endpoint: self.endpoint.clone(),
        });
        std::future::pending::<()>().await;
    }
}

/// Session factory that succeeds or always fails
pub struct StubSessionFactory {
    pub log: EventLog,
    pub fail: bool,
}

impl SessionFactory for StubSessionFactory {
    fn create_session(&self, endpoint: &str) -> Result<Arc<dyn Session>, SessionError> {
        if self.fail {
            return Err(SessionError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "stub refuses every endpoint".to_string(),
            });
        }
        Ok(Arc::new(StubSession {
            endpoint: endpoint.to_string(),
            log: self.log.clone(),
        }))
    }
}

/// How a stub server behaves once `serve` is called
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Sleep, then report ready with this address, then serve forever
    ReadyAfter(Duration, String),
    /// Fail immediately with a bind error, never calling back
    FailBind,
    /// Hold the callback forever without using it
    Never,
    /// Report ready, then fail
    ReadyThenFail,
    /// Return cleanly without calling back
    ExitQuietly,
}

pub struct StubServer {
    behavior: Behavior,
    services: Vec<ServiceDescriptor>,
    log: EventLog,
}

#[async_trait]
impl Server for StubServer {
    fn add_service(&mut self, service: ServiceDescriptor) {
        self.services.push(service);
    }

    async fn serve(self: Box<Self>, on_ready: ReadyCallback) -> Result<(), ServerError> {
        let StubServer {
            behavior,
            services,
            log,
        } = *self;
        log.record(Event::Serving { services });

        match behavior {
            Behavior::ReadyAfter(delay, address) => {
                tokio::time::sleep(delay).await;
                log.record(Event::Ready {
                    address: address.clone(),
                });
                on_ready(address);
                std::future::pending::<()>().await;
                Ok(())
            }
            Behavior::FailBind => {
                log.record(Event::ServeFailed);
                Err(bind_error())
            }
            Behavior::Never => {
                let _held = on_ready;
                std::future::pending::<()>().await;
                Ok(())
            }
            Behavior::ReadyThenFail => {
                log.record(Event::Ready {
                    address: "0.0.0.0:5150".to_string(),
                });
                on_ready("0.0.0.0:5150".to_string());
                log.record(Event::ServeFailed);
                Err(ServerError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "listener died",
                )))
            }
            Behavior::ExitQuietly => Ok(()),
        }
    }
}

pub fn bind_error() -> ServerError {
    ServerError::Bind {
        address: "0.0.0.0:5150".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
    }
}

pub struct StubServerFactory {
    pub behavior: Behavior,
    pub log: EventLog,
}

impl ServerFactory for StubServerFactory {
    fn create_server(&self, config: ServerConfig) -> Box<dyn Server> {
        self.log.record(Event::ServerCreated {
            port: config.port,
            insecure: config.insecure,
        });
        Box::new(StubServer {
            behavior: self.behavior.clone(),
            services: Vec::new(),
            log: self.log.clone(),
        })
    }
}

pub fn config(endpoint: &str, port: u16) -> ManagerConfig {
    ManagerConfig {
        e2t_endpoint: endpoint.to_string(),
        grpc_port: port,
        ..ManagerConfig::default()
    }
}

/// Build a manager over stubs sharing one event log
pub fn stub_manager(behavior: Behavior, log: &EventLog) -> kpimon_manager::Manager {
    let sessions = StubSessionFactory {
        log: log.clone(),
        fail: false,
    };
    let servers = Arc::new(StubServerFactory {
        behavior,
        log: log.clone(),
    });
    kpimon_manager::Manager::new(config("remote:5150", 5150), &sessions, servers)
        .expect("stub session factory never fails")
}
