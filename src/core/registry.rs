//! # Process registry - directory of live processes and their mailboxes.
//!
//! The registry is the only shared mutable state of the runtime. It maps each
//! live process to the sending end of its mailbox and keeps the processes in
//! registration order.
//!
//! ## Architecture
//! ```text
//! Launcher ──insert──►┌──────────────────────────────┐◄──remove── ProcessActor (after cleanup + hand-off)
//!                     │ Mutex<Inner>                 │
//!                     │   index: key → MailboxSender │
//!                     │   order: [ProcessRef]        │
//!                     └──────────────┬───────────────┘
//!                                    │ len after every change
//!                                    ▼
//!                          watch::Sender<usize> ──► wait_empty() (drain barrier)
//! ```
//!
//! ## Rules
//! - A process is in `order` iff it has an entry in `index`.
//! - Insertion and removal are serialized by one lock; the live count is
//!   published under that same lock, so observers see every size in order.
//! - Iteration works on a **snapshot** copied under the lock; delivery to a
//!   snapshot is best-effort (a process may leave before its message arrives).

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::core::mailbox::MailboxSender;
use crate::process::{ProcessRef, identity};

/// Why an insertion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The same process is already registered.
    AlreadyRegistered,
}

#[derive(Default)]
struct Inner {
    index: HashMap<usize, MailboxSender>,
    order: Vec<ProcessRef>,
}

/// Process-wide directory of running processes.
pub struct Registry {
    inner: Mutex<Inner>,
    live: watch::Sender<usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        let (live, _rx) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner::default()),
            live,
        }
    }

    /// Registers `process` with its mailbox; returns the new live count.
    pub fn insert(&self, process: &ProcessRef, mailbox: MailboxSender) -> Result<usize, InsertError> {
        let mut inner = self.inner.lock();
        let key = identity(process);
        if inner.index.contains_key(&key) {
            return Err(InsertError::AlreadyRegistered);
        }
        inner.index.insert(key, mailbox);
        inner.order.push(process.clone());

        let len = inner.order.len();
        self.live.send_replace(len);
        Ok(len)
    }

    /// Removes `process`; returns the new live count, or `None` if it was absent.
    pub fn remove(&self, process: &ProcessRef) -> Option<usize> {
        let mut inner = self.inner.lock();
        let key = identity(process);
        inner.index.remove(&key)?;
        inner.order.retain(|p| identity(p) != key);

        let len = inner.order.len();
        self.live.send_replace(len);
        Some(len)
    }

    /// Mailbox of `process`, if registered.
    pub fn mailbox(&self, process: &ProcessRef) -> Option<MailboxSender> {
        self.inner.lock().index.get(&identity(process)).cloned()
    }

    /// True if `process` is registered.
    pub fn contains(&self, process: &ProcessRef) -> bool {
        self.inner.lock().index.contains_key(&identity(process))
    }

    /// Registered processes with their mailboxes, in registration order.
    pub fn snapshot(&self) -> Vec<(ProcessRef, MailboxSender)> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .filter_map(|p| {
                inner
                    .index
                    .get(&identity(p))
                    .map(|tx| (p.clone(), tx.clone()))
            })
            .collect()
    }

    /// Registered processes, in registration order.
    pub fn processes(&self) -> Vec<ProcessRef> {
        self.inner.lock().order.clone()
    }

    /// Names of registered processes, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .lock()
            .order
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Number of registered processes.
    pub fn len(&self) -> usize {
        *self.live.borrow()
    }

    /// True if no process is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until no process is registered.
    ///
    /// Because a successor registers before its predecessor leaves, a chain
    /// hand-off never lets this return early.
    pub async fn wait_empty(&self) {
        let mut rx = self.live.subscribe();
        // The sender lives as long as `self`, so this only resolves on zero.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
