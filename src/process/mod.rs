//! # Process abstractions and specifications.
//!
//! This module provides the core process-related types:
//! - [`Process`] - capability trait (init / handle / tick / cleanup / successor)
//! - [`ProcessRef`] - shared reference to a process (`Arc<dyn Process>`)
//! - [`ProcessSpec`] - process plus optional completion callback
//! - [`ProcessFn`] - closure-backed process
//! - [`Message`], [`Payload`] - what travels through mailboxes

mod capability;
mod message;
mod process_fn;
mod spec;

pub use capability::{Process, ProcessRef};
pub(crate) use capability::identity;
pub use message::{Message, Payload};
pub use process_fn::ProcessFn;
pub use spec::{OnComplete, ProcessSpec};
