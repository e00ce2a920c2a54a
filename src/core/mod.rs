//! Runtime core: registry, mailboxes and process lifecycle.
//!
//! The public API from this module is [`Supervisor`] (with its builder),
//! [`Config`], [`StopReason`] and [`MailboxError`].
//!
//! Internal modules:
//! - [`actor`]: launches one process and drives it until it leaves the registry;
//! - [`mailbox`]: rendezvous channel owned by each running process;
//! - [`registry`]: directory of live processes, the drain barrier's source of truth;
//! - [`supervisor`]: message routing, drain and shutdown;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod actor;
mod builder;
mod config;
mod mailbox;
mod registry;
mod shutdown;
mod supervisor;

pub use actor::StopReason;
pub use builder::SupervisorBuilder;
pub use config::Config;
pub use mailbox::MailboxError;
pub use supervisor::Supervisor;
