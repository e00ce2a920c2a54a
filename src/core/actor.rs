//! # ProcessActor: single-process driver.
//!
//! Owns one [`Process`] from registration to deregistration.
//!
//! ## Lifecycle
//! ```text
//! Launcher::launch(spec)
//!   ├─► process.init()            (caller's thread; Err ─► ProcessInitFailed, stop)
//!   ├─► Mailbox::new()
//!   ├─► registry.insert()         (duplicate ─► ProcessRejected, stop)
//!   └─► spawn ProcessActor::run()
//!
//! ProcessActor::run()
//!   loop {
//!     recv() ─► Quit  ─► StopReason::Quit
//!           ─► Tick  ─► tick(): Ok(true) continue │ Ok(false) Completed │ Err TickFailed
//!           ─► App   ─► handle_message(): Ok continue │ Err MessageFailed
//!   }
//!   ├─► cleanup()                 (always, exactly once)
//!   ├─► on_complete()             (if attached)
//!   ├─► successor()               (only on Completed) ─► Launcher::launch(next)
//!   └─► registry.remove() + mailbox close
//! ```
//!
//! ## Rules
//! - Deregistration happens **after** the successor is registered, so the
//!   registry never reads zero in the middle of a chain.
//! - Panics in process code are caught and take the matching error path, so
//!   a crashing process still cleans up and leaves the registry.
//! - Errors are terminal for the process and only reported on the bus.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;

use crate::core::mailbox::Mailbox;
use crate::core::registry::{InsertError, Registry};
use crate::error::ProcessError;
use crate::events::{Bus, Event, EventKind};
use crate::process::{Message, OnComplete, ProcessRef, ProcessSpec};

/// Why a process loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `Quit` received.
    Quit,
    /// `tick` returned `Ok(false)`.
    Completed,
    /// `tick` failed.
    TickFailed,
    /// `handle_message` failed.
    MessageFailed,
    /// Every sender vanished.
    Closed,
}

impl StopReason {
    /// Only a normal stop lets a successor run.
    #[inline]
    pub fn allows_successor(&self) -> bool {
        matches!(self, StopReason::Completed)
    }

    /// Short stable label (snake_case).
    pub fn as_label(&self) -> &'static str {
        match self {
            StopReason::Quit => "quit",
            StopReason::Completed => "completed",
            StopReason::TickFailed => "tick_failed",
            StopReason::MessageFailed => "message_failed",
            StopReason::Closed => "closed",
        }
    }
}

/// Starts processes: init, register, spawn the actor.
///
/// Shared by [`Supervisor::run`](crate::Supervisor::run) and by actors
/// launching successors.
#[derive(Clone)]
pub(crate) struct Launcher {
    pub registry: Arc<Registry>,
    pub bus: Bus,
    pub runtime: Handle,
}

impl Launcher {
    /// Runs `init` on the calling thread, then registers and spawns the actor.
    ///
    /// Returns `true` if the process is now registered.
    pub fn launch(&self, spec: ProcessSpec) -> bool {
        let (process, on_complete) = spec.into_parts();

        if let Err(e) = process.init() {
            self.bus.publish(
                Event::new(EventKind::ProcessInitFailed)
                    .with_process(process.name())
                    .with_reason(e.to_string()),
            );
            return false;
        }

        let (mailbox, sender) = Mailbox::new();
        match self.registry.insert(&process, sender) {
            Ok(live) => {
                self.bus.publish(
                    Event::new(EventKind::ProcessRegistered)
                        .with_process(process.name())
                        .with_live(live),
                );
            }
            Err(InsertError::AlreadyRegistered) => {
                self.bus.publish(
                    Event::new(EventKind::ProcessRejected)
                        .with_process(process.name())
                        .with_reason("already_running"),
                );
                return false;
            }
        }

        let actor = ProcessActor {
            process,
            launcher: self.clone(),
        };
        self.runtime.spawn(actor.run(mailbox, on_complete));
        true
    }
}

/// Drives one registered process until it stops.
pub(crate) struct ProcessActor {
    process: ProcessRef,
    launcher: Launcher,
}

impl ProcessActor {
    /// Runs the loop, then cleanup, completion callback, successor hand-off
    /// and deregistration, in that order.
    pub async fn run(self, mut mailbox: Mailbox, on_complete: Option<OnComplete>) -> StopReason {
        let reason = self.drive(&mut mailbox).await;

        if let Err(e) = guard(self.process.cleanup()).await {
            self.publish_failure(EventKind::CleanupFailed, &e);
        }
        self.bus().publish(
            Event::new(EventKind::ProcessStopped)
                .with_process(self.process.name())
                .with_reason(reason.as_label()),
        );

        if let Some(on_complete) = on_complete {
            if let Err(e) = guard_sync(on_complete) {
                self.publish_failure(EventKind::CompletionFailed, &e);
            }
        }

        if reason.allows_successor() {
            self.hand_off();
        }

        if let Some(live) = self.launcher.registry.remove(&self.process) {
            self.bus().publish(
                Event::new(EventKind::ProcessDeregistered)
                    .with_process(self.process.name())
                    .with_live(live),
            );
        }
        mailbox.close();
        reason
    }

    /// Receives and dispatches messages until the process stops.
    async fn drive(&self, mailbox: &mut Mailbox) -> StopReason {
        loop {
            let Some(message) = mailbox.recv().await else {
                return StopReason::Closed;
            };
            match message {
                Message::Quit => return StopReason::Quit,
                Message::Tick => match guard(self.process.tick()).await.and_then(|r| r) {
                    Ok(true) => {}
                    Ok(false) => return StopReason::Completed,
                    Err(e) => {
                        self.publish_failure(EventKind::TickFailed, &e);
                        return StopReason::TickFailed;
                    }
                },
                Message::App(payload) => {
                    let handled = guard(self.process.handle_message(payload)).await;
                    if let Err(e) = handled.and_then(|r| r) {
                        self.publish_failure(EventKind::MessageFailed, &e);
                        return StopReason::MessageFailed;
                    }
                }
            }
        }
    }

    /// Asks for a successor once and launches it while this process is still registered.
    fn hand_off(&self) {
        let next = match guard_sync(|| self.process.successor()) {
            Ok(Some(next)) => next,
            Ok(None) => return,
            Err(e) => {
                self.publish_failure(EventKind::SuccessorFailed, &e);
                return;
            }
        };

        let next_name = next.process().name().to_string();
        if self.launcher.launch(next) {
            self.bus().publish(
                Event::new(EventKind::SuccessorLaunched)
                    .with_process(self.process.name())
                    .with_successor(next_name),
            );
        }
    }

    fn publish_failure(&self, kind: EventKind, err: &ProcessError) {
        self.bus().publish(
            Event::new(kind)
                .with_process(self.process.name())
                .with_reason(err.to_string()),
        );
    }

    fn bus(&self) -> &Bus {
        &self.launcher.bus
    }
}

/// Awaits `fut`, turning a panic into [`ProcessError::Panicked`].
async fn guard<F: Future>(fut: F) -> Result<F::Output, ProcessError> {
    std::panic::AssertUnwindSafe(fut)
        .catch_unwind()
        .await
        .map_err(ProcessError::from_panic)
}

/// Calls `f`, turning a panic into [`ProcessError::Panicked`].
fn guard_sync<T>(f: impl FnOnce() -> T) -> Result<T, ProcessError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).map_err(ProcessError::from_panic)
}
