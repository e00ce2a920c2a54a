//! Error types used by the procvisor runtime and by processes.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`]: errors raised by the runtime itself (drain/shutdown).
//! - [`ProcessError`]: errors raised by process code (`init`, `handle_message`, `tick`).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs.
//! Neither ever crosses back to the caller of [`Supervisor::run`](crate::Supervisor::run):
//! process errors are terminal for the process that raised them and are
//! reported on the event bus only.

use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the procvisor runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The registry did not drain within the grace period.
    #[error("drain timeout {grace:?} exceeded; still running: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the processes still registered when the grace ran out.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use procvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; still running={stuck:?}")
            }
        }
    }
}

/// # Errors produced by process code.
///
/// Any error stops the process that returned it: no successor runs after an
/// error, regardless of what else the process would have asked for.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Process logic failed.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Process logic panicked; the runtime caught the panic.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ProcessError {
    /// Shorthand for [`ProcessError::Fail`].
    ///
    /// # Example
    /// ```
    /// use procvisor::ProcessError;
    ///
    /// let err = ProcessError::fail("out of ammo");
    /// assert_eq!(err.to_string(), "out of ammo");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ProcessError::Fail {
            error: error.into(),
        }
    }

    /// Builds a [`ProcessError::Panicked`] from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        ProcessError::Panicked { info }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessError::Fail { .. } => "process_failed",
            ProcessError::Panicked { .. } => "process_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProcessError::Fail { error } => format!("error: {error}"),
            ProcessError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_is_rendered() {
        let err = ProcessError::from_panic(Box::new("boom"));
        assert_eq!(
            err,
            ProcessError::Panicked {
                info: "boom".to_string()
            }
        );

        let err = ProcessError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err.as_message(), "panic: owned boom");

        let err = ProcessError::from_panic(Box::new(42_u8));
        assert_eq!(err.as_label(), "process_panicked");
        assert_eq!(err.to_string(), "panicked: unknown panic");
    }

    #[test]
    fn test_grace_exceeded_message_lists_stuck() {
        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_millis(10),
            stuck: vec!["walker".into()],
        };
        assert!(err.as_message().contains("walker"));
        assert!(err.to_string().contains("walker"));
    }
}
