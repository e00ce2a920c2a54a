//! # Process specification for supervised execution.
//!
//! Defines [`ProcessSpec`] a bundle that describes what to run: the process
//! itself plus an optional completion callback invoked once after cleanup,
//! regardless of how the process stopped.
//!
//! A spec can be created:
//! - **From a ref** with [`ProcessSpec::new`] or `From<ProcessRef>`
//! - **With a callback** via [`ProcessSpec::with_on_complete`]
//!
//! ## Rules
//! - The callback runs after `cleanup` and strictly before any successor is launched.
//! - The callback runs at most once (it is `FnOnce`).

use std::fmt;

use crate::process::capability::ProcessRef;

/// Callback invoked once after a process has cleaned up.
pub type OnComplete = Box<dyn FnOnce() + Send + 'static>;

/// Specification for running a process under supervision.
///
/// ## Example
/// ```rust
/// use procvisor::{ProcessError, ProcessFn, ProcessRef, ProcessSpec};
///
/// let intro: ProcessRef = ProcessFn::arc("intro", || async { Ok::<_, ProcessError>(false) });
/// let spec = ProcessSpec::new(intro).with_on_complete(|| println!("intro done"));
/// assert!(spec.has_on_complete());
/// assert_eq!(spec.process().name(), "intro");
/// ```
pub struct ProcessSpec {
    process: ProcessRef,
    on_complete: Option<OnComplete>,
}

impl ProcessSpec {
    /// Creates a spec without completion callback.
    pub fn new(process: ProcessRef) -> Self {
        Self {
            process,
            on_complete: None,
        }
    }

    /// Attaches a completion callback.
    pub fn with_on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Returns reference to the process.
    pub fn process(&self) -> &ProcessRef {
        &self.process
    }

    /// True if a completion callback is attached.
    pub fn has_on_complete(&self) -> bool {
        self.on_complete.is_some()
    }

    pub(crate) fn into_parts(self) -> (ProcessRef, Option<OnComplete>) {
        (self.process, self.on_complete)
    }
}

impl From<ProcessRef> for ProcessSpec {
    fn from(process: ProcessRef) -> Self {
        Self::new(process)
    }
}

impl fmt::Debug for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSpec")
            .field("process", &self.process.name())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}
