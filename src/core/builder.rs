//! # SupervisorBuilder: assembles the runtime.
//!
//! Wires the bus, the subscriber set, the registry and the launcher together
//! and captures the Tokio runtime handle that every process is spawned on.
//!
//! ```text
//! Config ──► Bus::new(bus_capacity) ──► SubscriberSet::new([LogWriter?, user subs...])
//!        └─► Registry::new()        ──► Launcher { registry, bus, Handle::current() }
//!                                          └─► Supervisor + subscriber_listener()
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::core::{Config, actor::Launcher, registry::Registry, supervisor::Supervisor};
use crate::events::Bus;
use crate::subscribers::{LogWriter, Subscribe, SubscriberSet};

/// Builder for constructing a [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    runtime: Option<Handle>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            runtime: None,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (registration, failures, hand-offs, etc.)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Spawns processes on `runtime` instead of the current one.
    ///
    /// Lets [`build`](Self::build) be called outside of a runtime context.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds and returns the Supervisor instance.
    ///
    /// # Panics
    /// Panics when no runtime was given and it is called outside of a Tokio
    /// runtime (same contract as [`Handle::current`]).
    pub fn build(self) -> Arc<Supervisor> {
        let runtime = self.runtime.unwrap_or_else(Handle::current);
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let mut subscribers = self.subscribers;
        if self.cfg.stderr_diagnostics {
            subscribers.insert(0, Arc::new(LogWriter::diagnostics()));
        }
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone(), &runtime));

        let registry = Arc::new(Registry::new());
        let launcher = Launcher {
            registry: Arc::clone(&registry),
            bus: bus.clone(),
            runtime,
        };

        let sup = Arc::new(Supervisor::new_internal(
            self.cfg, bus, subs, registry, launcher,
        ));
        sup.subscriber_listener();
        sup
    }
}
