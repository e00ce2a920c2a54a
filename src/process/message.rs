//! # Messages delivered through process mailboxes.
//!
//! Three kinds: [`Message::Quit`] forces termination without successor,
//! [`Message::Tick`] requests one step of work, and [`Message::App`] carries
//! an opaque payload to [`Process::handle_message`](crate::Process::handle_message).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque application payload. Handlers downcast with `downcast_ref`.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A message consumed exactly once by the receiving actor.
#[derive(Clone)]
pub enum Message {
    /// Stop now; no successor runs.
    Quit,
    /// Step one frame.
    Tick,
    /// Application payload forwarded to the handler.
    App(Payload),
}

impl Message {
    /// Wraps a value as an application message.
    ///
    /// # Example
    /// ```
    /// use procvisor::Message;
    ///
    /// let msg = Message::app("jump");
    /// assert_eq!(msg.label(), "app");
    /// ```
    pub fn app<T: Any + Send + Sync>(value: T) -> Self {
        Message::App(Arc::new(value))
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Message::Quit => "quit",
            Message::Tick => "tick",
            Message::App(_) => "app",
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
