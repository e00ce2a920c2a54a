//! # Event subscribers for the procvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! ProcessActor ── publish(Event) ──► Bus ──► Supervisor listener ──► SubscriberSet::emit
//!                                                                        │
//!                                                        ┌───────────────┼──────────┐
//!                                                        ▼               ▼          ▼
//!                                                    LogWriter        Metrics     Custom
//! ```

mod log;
mod set;
mod subscribe;

pub use log::{LogWriter, Verbosity};
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
