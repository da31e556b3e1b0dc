//! Shared state handed to every request handler.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::idle::IdleSupervisor;
use crate::port::PortRange;
use crate::registry::PortRegistry;
use crate::validation::TimeoutBounds;

/// Handles to the registry, the idle supervisor and the shutdown token.
///
/// Cloning is cheap; clones share the same registry and supervisor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The port registry.
    pub registry: Arc<PortRegistry>,
    /// The idle-timeout supervisor.
    pub supervisor: Arc<IdleSupervisor>,
    /// Cancelled to stop the server and the watchdog.
    pub shutdown: CancellationToken,
    server_name: Arc<str>,
}

impl AppState {
    /// Builds fresh state from validated settings.
    #[must_use]
    pub fn new(settings: &Settings, server_name: &str) -> Self {
        let supervisor = IdleSupervisor::new(settings.timeouts, settings.timeout);
        Self::with_supervisor(settings, Arc::new(supervisor), server_name)
    }

    /// Builds state around an existing supervisor, e.g. one on a manual clock.
    #[must_use]
    pub fn with_supervisor(
        settings: &Settings,
        supervisor: Arc<IdleSupervisor>,
        server_name: &str,
    ) -> Self {
        Self {
            registry: Arc::new(PortRegistry::new(settings.ports, settings.server_port)),
            supervisor,
            shutdown: CancellationToken::new(),
            server_name: Arc::from(server_name),
        }
    }

    /// Range ports are allocated from.
    #[must_use]
    pub fn ports(&self) -> PortRange {
        self.registry.range()
    }

    /// Accepted idle timeout range.
    #[must_use]
    pub fn timeouts(&self) -> TimeoutBounds {
        self.supervisor.bounds()
    }

    /// Value of the `Server` response header.
    #[must_use]
    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}
