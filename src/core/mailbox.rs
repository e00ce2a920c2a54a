//! # Process mailbox: a rendezvous channel.
//!
//! Each running process owns exactly one [`Mailbox`]. Senders hold a
//! [`MailboxSender`] (the registry keeps one per process) and `send` does not
//! return until the owning actor has taken the message out of the mailbox.
//!
//! ```text
//! sender ──► [slot] ──► Mailbox::recv() ──► ack ──► sender resumes
//! ```
//!
//! ## Rules
//! - One message in flight at a time: the slot holds a single envelope.
//! - A slow or stuck receiver stalls its senders.
//! - Once the mailbox is closed or dropped, pending and future sends fail with
//!   [`MailboxError::Closed`].

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::process::Message;

/// Error when sending a message to a mailbox.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxError {
    /// The mailbox has been closed or its process is gone.
    #[error("mailbox is closed")]
    Closed,
}

/// Message plus the acknowledgement fired on receipt.
struct Envelope {
    message: Message,
    ack: oneshot::Sender<()>,
}

/// Receiving end, owned by the process actor.
pub struct Mailbox {
    rx: mpsc::Receiver<Envelope>,
}

impl Mailbox {
    /// Creates a new mailbox, returning the mailbox and its sender.
    pub fn new() -> (Self, MailboxSender) {
        let (tx, rx) = mpsc::channel(1);
        (Self { rx }, MailboxSender { tx })
    }

    /// Receives the next message and releases its sender.
    ///
    /// Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Message> {
        let envelope = self.rx.recv().await?;
        let _ = envelope.ack.send(());
        Some(envelope.message)
    }

    /// Closes the mailbox; queued envelopes are dropped and their senders see `Closed`.
    pub fn close(&mut self) {
        self.rx.close();
        while let Ok(envelope) = self.rx.try_recv() {
            drop(envelope);
        }
    }
}

/// Sending end of a mailbox.
#[derive(Clone)]
pub struct MailboxSender {
    tx: mpsc::Sender<Envelope>,
}

impl MailboxSender {
    /// Sends a message and waits until the receiver has taken it.
    pub async fn send(&self, message: Message) -> Result<(), MailboxError> {
        let (ack, acked) = oneshot::channel();
        self.tx
            .send(Envelope { message, ack })
            .await
            .map_err(|_| MailboxError::Closed)?;
        acked.await.map_err(|_| MailboxError::Closed)
    }
}
