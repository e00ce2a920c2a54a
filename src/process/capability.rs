//! # Process capability contract.
//!
//! A [`Process`] is an independent unit of long-running logic driven by its own
//! actor task. It is addressed by reference ([`ProcessRef`], an `Arc<dyn Process>`);
//! two refs address the same process iff they share the allocation.
//!
//! ## Lifecycle
//! ```text
//! init() ──► registered ──► { handle_message() | tick() }* ──► cleanup()
//!                                                                │
//!                                  completion callback ◄─────────┘
//!                                          │
//!                        successor() (only after tick returned false)
//! ```
//!
//! Every operation has a default no-op body, so a process only implements
//! what it needs. The defaults mirror an idle process: `tick` returns
//! `Ok(false)` (stop normally on the first tick), `successor` returns `None`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::process::message::Payload;
use crate::process::spec::ProcessSpec;

/// Shared handle to a process.
pub type ProcessRef = Arc<dyn Process>;

/// # Unit of supervised logic.
///
/// Methods take `&self`: the process is shared between its actor and whoever
/// addresses it, so mutable state lives behind interior mutability.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use async_trait::async_trait;
/// use procvisor::{Process, ProcessError};
///
/// struct Countdown { left: AtomicU32 }
///
/// #[async_trait]
/// impl Process for Countdown {
///     fn name(&self) -> &str { "countdown" }
///
///     async fn tick(&self) -> Result<bool, ProcessError> {
///         let before = self.left.fetch_sub(1, Ordering::SeqCst);
///         Ok(before > 1)
///     }
/// }
/// ```
#[async_trait]
pub trait Process: Send + Sync + 'static {
    /// Human-readable name used in events and diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs synchronously on the caller of `run`, before registration.
    ///
    /// Must not block. An error aborts the run: the process is never
    /// registered, never ticked, and `cleanup` is never called.
    fn init(&self) -> Result<(), ProcessError> {
        Ok(())
    }

    /// Handles one application message. An error stops the process abnormally.
    async fn handle_message(&self, payload: Payload) -> Result<(), ProcessError> {
        let _ = payload;
        Ok(())
    }

    /// Steps the process one frame.
    ///
    /// `Ok(true)` keeps it alive, `Ok(false)` is a normal stop (successor
    /// eligible), an error stops it abnormally.
    async fn tick(&self) -> Result<bool, ProcessError> {
        Ok(false)
    }

    /// Runs exactly once after the loop stops, before any successor starts.
    async fn cleanup(&self) {}

    /// Names the process to run after a normal stop.
    ///
    /// Queried at most once, and only when `tick` returned `Ok(false)`.
    fn successor(&self) -> Option<ProcessSpec> {
        None
    }
}

/// Identity key of a process: the address of its shared allocation.
#[inline]
pub(crate) fn identity(process: &ProcessRef) -> usize {
    Arc::as_ptr(process).cast::<()>() as usize
}
