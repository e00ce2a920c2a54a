//! # Supervisor: process runtime façade.
//!
//! The [`Supervisor`] owns the event bus, the [`SubscriberSet`], the process
//! registry and the runtime handle processes are spawned on. Everything a
//! caller does with processes goes through it.
//!
//! ## Key responsibilities
//! - start processes ([`Supervisor::run`]) and their successors
//! - deliver messages: [`send`](Supervisor::send), [`stop`](Supervisor::stop),
//!   [`tick`](Supervisor::tick) and their broadcast forms
//! - act as the drain barrier ([`drain`](Supervisor::drain),
//!   [`drain_within`](Supervisor::drain_within))
//! - graceful shutdown with a configurable [`Config::grace`]
//! - **fan-out** bus events to subscribers
//!
//! ## High-level architecture
//! ```text
//! run(spec) ──► Launcher::launch ──► init ─► Registry::insert ─► spawn ProcessActor
//!
//! send/stop/tick(p) ──► Registry::mailbox(p) ──► MailboxSender::send (rendezvous)
//! broadcast*(..)    ──► Registry::snapshot()  ──► join_all(send) ──► delivered count
//!
//! Event flow:
//!   Launcher / ProcessActor / Stage ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                                    └─► SubscriberSet::emit
//!
//! Shutdown path:
//!   shutdown_on_signal() ─► wait_for_shutdown_signal() ─► ShutdownRequested
//!   shutdown()           ─► stop_all() ─► drain_within(cfg.grace):
//!                              ├─ Ok      → AllStoppedWithin
//!                              └─ Timeout → GraceExceeded + RuntimeError::GraceExceeded{stuck}
//!                          ─► stop listener ─► forward pending bus events ─► SubscriberSet::shutdown
//! ```
//!
//! ## Rules
//! - Delivery to a process that is not registered (or leaves mid-send) is a
//!   silent no-op; the `bool`/count results only report what happened.
//! - Broadcasts address a snapshot taken under the registry lock; a process
//!   registered after the snapshot does not receive that broadcast.
//! - When [`Supervisor::shutdown`] returns, subscribers have handled every
//!   event published before it; events published afterwards reach the bus only.
//!
//! ## Example
//! ```rust
//! use procvisor::{Config, ProcessError, ProcessFn, ProcessRef, Supervisor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default()).build();
//!
//!     let once: ProcessRef = ProcessFn::arc("once", || async { Ok::<_, ProcessError>(false) });
//!     assert!(sup.run(once.clone()));
//!     assert!(sup.tick(&once).await);
//!
//!     sup.drain().await;
//!     assert_eq!(sup.live_count(), 0);
//!     Ok(())
//! }
//! ```

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::actor::Launcher;
use crate::core::builder::SupervisorBuilder;
use crate::core::registry::Registry;
use crate::core::{Config, shutdown};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::process::{Message, Process, ProcessRef, ProcessSpec};
use crate::subscribers::SubscriberSet;

/// Runs processes, routes their messages and drains them on shutdown.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    registry: Arc<Registry>,
    launcher: Launcher,
    listener_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Supervisor {
    /// Creates a builder for constructing a Supervisor.
    ///
    /// ## Example
    /// ```rust
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use procvisor::{Config, Supervisor};
    ///
    /// let sup = Supervisor::builder(Config::default())
    ///     .with_subscribers(vec![])
    ///     .build();
    /// assert_eq!(sup.live_count(), 0);
    /// # }
    /// ```
    pub fn builder(cfg: Config) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        registry: Arc<Registry>,
        launcher: Launcher,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            registry,
            launcher,
            listener_token: CancellationToken::new(),
            listener: Mutex::new(None),
        }
    }

    /// Starts a process (or a spec with a completion callback).
    ///
    /// `init` runs on the calling thread before anything else. Returns `true`
    /// if the process is now registered and running; `false` if `init` failed
    /// or the same process is already running. Failures are reported on the
    /// bus, never to the caller.
    ///
    /// Does not need to be called from inside the runtime.
    pub fn run(&self, spec: impl Into<ProcessSpec>) -> bool {
        self.launcher.launch(spec.into())
    }

    /// Delivers `message` to `process`, waiting until its actor takes it.
    ///
    /// Returns `false` if the process is not registered or stopped first.
    pub async fn notify(&self, process: &ProcessRef, message: Message) -> bool {
        let Some(mailbox) = self.registry.mailbox(process) else {
            return false;
        };
        mailbox.send(message).await.is_ok()
    }

    /// Sends an application payload to `process`.
    pub async fn send<T>(&self, process: &ProcessRef, payload: T) -> bool
    where
        T: Any + Send + Sync,
    {
        self.notify(process, Message::app(payload)).await
    }

    /// Requests `process` to stop. It will not run a successor.
    pub async fn stop(&self, process: &ProcessRef) -> bool {
        self.notify(process, Message::Quit).await
    }

    /// Asks `process` for one step of work.
    pub async fn tick(&self, process: &ProcessRef) -> bool {
        self.notify(process, Message::Tick).await
    }

    /// Sends an application payload to every registered process.
    ///
    /// Returns how many processes received it.
    pub async fn broadcast<T>(&self, payload: T) -> usize
    where
        T: Any + Send + Sync,
    {
        self.broadcast_message(Message::app(payload), |_| true).await
    }

    /// Sends an application payload to every registered process accepted by `filter`.
    pub async fn broadcast_where<T, F>(&self, payload: T, filter: F) -> usize
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Process) -> bool,
    {
        self.broadcast_message(Message::app(payload), filter).await
    }

    /// Delivers `message` to every registered process accepted by `filter`,
    /// all at once.
    pub async fn broadcast_message<F>(&self, message: Message, filter: F) -> usize
    where
        F: Fn(&dyn Process) -> bool,
    {
        let targets: Vec<_> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|(p, _)| filter(&**p))
            .collect();

        let sends = targets
            .iter()
            .map(|(_, mailbox)| mailbox.send(message.clone()));
        join_all(sends).await.into_iter().filter(Result::is_ok).count()
    }

    /// Asks every registered process to stop.
    pub async fn stop_all(&self) -> usize {
        self.broadcast_message(Message::Quit, |_| true).await
    }

    /// Asks every registered process for one step of work.
    pub async fn tick_all(&self) -> usize {
        self.broadcast_message(Message::Tick, |_| true).await
    }

    /// Number of registered processes.
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    /// True if `process` is registered.
    pub fn is_running(&self, process: &ProcessRef) -> bool {
        self.registry.contains(process)
    }

    /// Registered processes in registration order.
    pub fn processes(&self) -> Vec<ProcessRef> {
        self.registry.processes()
    }

    /// Names of registered processes in registration order.
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Event bus shared with every actor.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runtime configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Runtime processes are spawned on.
    pub(crate) fn runtime(&self) -> &tokio::runtime::Handle {
        &self.launcher.runtime
    }

    /// Waits until no process is registered.
    ///
    /// A chain hand-off keeps the registry non-empty, so this only returns
    /// once a whole chain has finished.
    pub async fn drain(&self) {
        self.registry.wait_empty().await;
    }

    /// Like [`drain`](Self::drain), bounded by `grace`.
    ///
    /// On timeout publishes [`EventKind::GraceExceeded`] and returns
    /// [`RuntimeError::GraceExceeded`] with the names still registered.
    pub async fn drain_within(&self, grace: Duration) -> Result<(), RuntimeError> {
        if tokio::time::timeout(grace, self.drain()).await.is_ok() {
            return Ok(());
        }
        let stuck = self.registry.names();
        self.bus.publish(
            Event::new(EventKind::GraceExceeded)
                .with_reason(stuck.join(","))
                .with_live(stuck.len()),
        );
        Err(RuntimeError::GraceExceeded { grace, stuck })
    }

    /// Stops every process and waits up to [`Config::grace`] for them to leave.
    ///
    /// Subscribers are flushed and closed before returning, on success and on
    /// timeout alike.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.stop_all().await;
        let drained = self.drain_within(self.cfg.grace).await;
        if drained.is_ok() {
            self.bus.publish(Event::new(EventKind::AllStoppedWithin));
        }
        self.close_subscribers().await;
        drained
    }

    /// Waits for a termination signal, then [`shutdown`](Self::shutdown).
    pub async fn shutdown_on_signal(&self) -> Result<(), RuntimeError> {
        let reason = match shutdown::wait_for_shutdown_signal().await {
            Ok(name) => name.to_string(),
            Err(e) => format!("signal listener failed: {e}"),
        };
        self.bus
            .publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
        self.shutdown().await
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// Runs until the listener token is cancelled, then forwards whatever the
    /// receiver still buffers.
    pub(crate) fn subscriber_listener(&self) {
        if self.subs.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        let token = self.listener_token.clone();
        let handle = self.launcher.runtime.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => return,
                    },
                    _ = token.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        });
        *self.listener.lock() = Some(handle);
    }

    /// Stops the listener and waits for every subscriber to drain its queue.
    async fn close_subscribers(&self) {
        self.listener_token.cancel();
        let listener = self.listener.lock().take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
        self.subs.shutdown().await;
    }
}
