//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the supervisor runtime.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `frame_interval < 1ms` → clamped to 1ms

use std::time::Duration;

/// Global configuration for the supervisor runtime.
///
/// ## Field semantics
/// - `grace`: Maximum wait for the registry to drain on [`Supervisor::shutdown`](crate::Supervisor::shutdown)
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `frame_interval`: Period of the [`FrameLoop`](crate::FrameLoop)
/// - `stderr_diagnostics`: Install a diagnostics-only [`LogWriter`](crate::LogWriter)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over raw fields to avoid
/// sprinkling clamping across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for processes to stop on shutdown.
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages skip older items.
    pub bus_capacity: usize,

    /// Time between two frames of the frame loop.
    pub frame_interval: Duration,

    /// Write abnormal process terminations to standard error.
    ///
    /// When `true`, the builder adds a [`LogWriter::diagnostics`](crate::LogWriter::diagnostics)
    /// subscriber in front of the user subscribers.
    pub stderr_diagnostics: bool,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the frame interval clamped to a minimum of 1ms.
    #[inline]
    pub fn frame_interval_clamped(&self) -> Duration {
        self.frame_interval.max(Duration::from_millis(1))
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 5s`
    /// - `bus_capacity = 1024`
    /// - `frame_interval = 1/60s`
    /// - `stderr_diagnostics = true`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(5),
            bus_capacity: 1024,
            frame_interval: Duration::from_micros(16_667),
            stderr_diagnostics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_accessors() {
        let cfg = Config {
            bus_capacity: 0,
            frame_interval: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.frame_interval_clamped(), Duration::from_millis(1));
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.grace, Duration::from_secs(5));
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
        assert!(cfg.stderr_diagnostics);
    }
}
