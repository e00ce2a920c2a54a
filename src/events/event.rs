//! # Runtime events emitted by the supervisor, process actors and the stage.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Lifecycle events**: registration, failures, stop, successor hand-off, deregistration
//! - **Stage events**: game-state swaps after a drain
//! - **Shutdown events**: signal observed, drained in time, grace exceeded
//! - **Subscriber events**: overflow and panics inside subscriber workers
//!
//! The [`Event`] struct carries additional metadata such as timestamps, process name,
//! reasons and the live-process count observed right after a registry change.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use procvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TickFailed)
//!     .with_process("walker")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TickFailed);
//! assert_eq!(ev.process.as_deref(), Some("walker"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Process lifecycle ===
    /// Process passed `init` and was inserted into the registry.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `live`: registry size after insertion
    ProcessRegistered,

    /// Process `init` failed; it was never registered.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: init error
    ProcessInitFailed,

    /// Process was already registered; the second run was refused.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: `"already_running"`
    ProcessRejected,

    /// `tick` returned an error (or panicked); the loop stops without successor.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: tick error
    TickFailed,

    /// `handle_message` returned an error (or panicked); the loop stops without successor.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: handler error
    MessageFailed,

    /// `cleanup` panicked.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: panic info
    CleanupFailed,

    /// The completion callback attached to the process panicked.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: panic info
    CompletionFailed,

    /// `successor` panicked; no successor is launched.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: panic info
    SuccessorFailed,

    /// Loop ended and cleanup ran.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `reason`: stop label (`quit`, `completed`, `tick_failed`, ...)
    ProcessStopped,

    /// A successor was launched after a normal stop.
    ///
    /// Sets:
    /// - `process`: predecessor name
    /// - `successor`: successor name
    SuccessorLaunched,

    /// Process was removed from the registry and its mailbox closed.
    ///
    /// Sets:
    /// - `process`: process name
    /// - `live`: registry size after removal
    ProcessDeregistered,

    // === Stage ===
    /// Game state swapped after the registry drained.
    ///
    /// Sets:
    /// - `reason`: `"deferred"` or `"immediate"`
    StateSwapped,

    // === Shutdown ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// All processes stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some processes did not stop in time.
    ///
    /// Sets:
    /// - `live`: number of processes still registered
    GraceExceeded,

    // === Subscribers ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `process`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `process`: subscriber name
    /// - `reason`: panic info
    SubscriberPanicked,
}

impl EventKind {
    /// True for kinds that report an abnormal condition.
    #[inline]
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            EventKind::ProcessInitFailed
                | EventKind::ProcessRejected
                | EventKind::TickFailed
                | EventKind::MessageFailed
                | EventKind::CleanupFailed
                | EventKind::CompletionFailed
                | EventKind::SuccessorFailed
                | EventKind::GraceExceeded
                | EventKind::SubscriberPanicked
        )
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the process (or subscriber), if applicable.
    pub process: Option<Arc<str>>,
    /// Name of the successor process (for `SuccessorLaunched`).
    pub successor: Option<Arc<str>>,
    /// Human-readable reason (errors, stop labels, overflow details).
    pub reason: Option<Arc<str>>,
    /// Registry size observed right after the change that produced this event.
    pub live: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            process: None,
            successor: None,
            reason: None,
            live: None,
        }
    }

    /// Attaches a process name.
    #[inline]
    pub fn with_process(mut self, name: impl Into<Arc<str>>) -> Self {
        self.process = Some(name.into());
        self
    }

    /// Attaches a successor name.
    #[inline]
    pub fn with_successor(mut self, name: impl Into<Arc<str>>) -> Self {
        self.successor = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the live-process count.
    #[inline]
    pub fn with_live(mut self, live: usize) -> Self {
        self.live = Some(live);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_process(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_process(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ProcessRegistered);
        let b = Event::new(EventKind::ProcessDeregistered);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::SuccessorLaunched)
            .with_process("intro")
            .with_successor("menu")
            .with_live(2);
        assert_eq!(ev.process.as_deref(), Some("intro"));
        assert_eq!(ev.successor.as_deref(), Some("menu"));
        assert_eq!(ev.live, Some(2));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_diagnostic_kinds() {
        assert!(EventKind::TickFailed.is_diagnostic());
        assert!(EventKind::ProcessInitFailed.is_diagnostic());
        assert!(!EventKind::ProcessStopped.is_diagnostic());
        assert!(!EventKind::SubscriberOverflow.is_diagnostic());
    }
}
