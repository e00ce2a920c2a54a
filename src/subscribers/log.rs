//! # LogWriter: event printer for the error stream
//!
//! A subscriber that writes incoming [`Event`]s to standard error, one line each.
//! [`LogWriter::diagnostics`] prints only abnormal events and is installed by
//! default (see [`Config::stderr_diagnostics`](crate::Config::stderr_diagnostics));
//! [`LogWriter::verbose`] prints everything and is meant for demos and debugging.
//!
//! ## Example output
//! ```text
//! [procvisor] [registered] process="walker" live=1
//! [procvisor] [tick-failed] process="walker" err="fell off the map"
//! [procvisor] [stopped] process="walker" reason=tick_failed
//! [procvisor] [deregistered] process="walker" live=0
//! [procvisor] [state-swapped] mode=immediate
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Which events a [`LogWriter`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only events for which [`EventKind::is_diagnostic`] holds.
    Diagnostics,
    /// Every event.
    All,
}

/// Event writer subscriber.
#[derive(Debug, Clone, Copy)]
pub struct LogWriter {
    verbosity: Verbosity,
}

impl LogWriter {
    /// Writer that prints abnormal events only.
    #[must_use]
    pub fn diagnostics() -> Self {
        Self {
            verbosity: Verbosity::Diagnostics,
        }
    }

    /// Writer that prints every event.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            verbosity: Verbosity::All,
        }
    }

    /// Renders an event as a single log line, or `None` if filtered out.
    pub fn render(&self, e: &Event) -> Option<String> {
        if self.verbosity == Verbosity::Diagnostics && !e.kind.is_diagnostic() {
            return None;
        }
        let process = e.process.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("unknown");
        let live = e.live.map_or_else(|| "?".to_string(), |n| n.to_string());
        let line = match e.kind {
            EventKind::ProcessRegistered => {
                format!("[registered] process={process:?} live={live}")
            }
            EventKind::ProcessInitFailed => {
                format!("[init-failed] process={process:?} err={reason:?}")
            }
            EventKind::ProcessRejected => {
                format!("[rejected] process={process:?} reason={reason}")
            }
            EventKind::TickFailed => format!("[tick-failed] process={process:?} err={reason:?}"),
            EventKind::MessageFailed => {
                format!("[message-failed] process={process:?} err={reason:?}")
            }
            EventKind::CleanupFailed => {
                format!("[cleanup-failed] process={process:?} err={reason:?}")
            }
            EventKind::CompletionFailed => {
                format!("[completion-failed] process={process:?} err={reason:?}")
            }
            EventKind::SuccessorFailed => {
                format!("[successor-failed] process={process:?} err={reason:?}")
            }
            EventKind::ProcessStopped => format!("[stopped] process={process:?} reason={reason}"),
            EventKind::SuccessorLaunched => format!(
                "[successor] process={process:?} next={:?}",
                e.successor.as_deref().unwrap_or("unknown")
            ),
            EventKind::ProcessDeregistered => {
                format!("[deregistered] process={process:?} live={live}")
            }
            EventKind::StateSwapped => format!("[state-swapped] mode={reason}"),
            EventKind::ShutdownRequested => "[shutdown-requested]".to_string(),
            EventKind::AllStoppedWithin => "[all-stopped-within-grace]".to_string(),
            EventKind::GraceExceeded => format!("[grace-exceeded] live={live} stuck={reason}"),
            EventKind::SubscriberOverflow => {
                format!("[subscriber-overflow] subscriber={process} reason={reason}")
            }
            EventKind::SubscriberPanicked => {
                format!("[subscriber-panicked] subscriber={process} info={reason}")
            }
        };
        Some(format!("[procvisor] {line}"))
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::diagnostics()
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        if let Some(line) = self.render(e) {
            eprintln!("{line}");
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_filters_routine_events() {
        let writer = LogWriter::diagnostics();
        let routine = Event::new(EventKind::ProcessRegistered)
            .with_process("walker")
            .with_live(1);
        assert!(writer.render(&routine).is_none());

        let failure = Event::new(EventKind::TickFailed)
            .with_process("walker")
            .with_reason("fell off the map");
        assert_eq!(
            writer.render(&failure).as_deref(),
            Some("[procvisor] [tick-failed] process=\"walker\" err=\"fell off the map\"")
        );
    }

    #[test]
    fn test_successor_panic_is_a_diagnostic() {
        let ev = Event::new(EventKind::SuccessorFailed)
            .with_process("intro")
            .with_reason("panicked: no level");
        assert_eq!(
            LogWriter::diagnostics().render(&ev).as_deref(),
            Some("[procvisor] [successor-failed] process=\"intro\" err=\"panicked: no level\"")
        );
    }

    #[test]
    fn test_live_count_is_rendered_plainly() {
        let ev = Event::new(EventKind::ProcessDeregistered)
            .with_process("walker")
            .with_live(0);
        assert_eq!(
            LogWriter::verbose().render(&ev).as_deref(),
            Some("[procvisor] [deregistered] process=\"walker\" live=0")
        );
    }

    #[test]
    fn test_verbose_prints_everything() {
        let writer = LogWriter::verbose();
        let ev = Event::new(EventKind::StateSwapped).with_reason("deferred");
        assert_eq!(
            writer.render(&ev).as_deref(),
            Some("[procvisor] [state-swapped] mode=deferred")
        );
    }
}
