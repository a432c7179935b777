//! Producer/consumer queue decoupling producers from delivery.

use async_trait::async_trait;
use courier_types::OutboundMessage;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Enqueue attempted after shutdown. The producer must stop producing.
    #[error("outbound queue is closed")]
    Closed,
}

/// Ordered hand-off of outbound messages between producers and dispatch
/// workers.
///
/// A message enqueued before shutdown is dequeued exactly once: ownership
/// transfers atomically at dequeue, so no two workers ever see the same
/// message. No priority, no deduplication.
#[async_trait]
pub trait OutboundMessageQueue: Send + Sync {
    /// Hand a message to the queue.
    ///
    /// Never blocks on network activity; returns once the queue holds the
    /// message. Fails only with [`QueueError::Closed`] after shutdown.
    async fn enqueue(&self, message: OutboundMessage) -> Result<(), QueueError>;

    /// Take the next message, suspending until one is available.
    ///
    /// After shutdown the remaining messages are still handed out; once
    /// drained, `None` is the terminal closed signal.
    async fn dequeue(&self) -> Option<OutboundMessage>;

    /// Close the queue. Idempotent.
    ///
    /// Afterwards `enqueue` fails fast while `dequeue` keeps draining
    /// pending messages before yielding the closed signal.
    async fn shutdown(&self);
}

/// Channel-backed queue shared by arbitrarily many producers and workers.
///
/// The sender side sits behind a mutex so shutdown can drop it, which lets
/// the receiver drain and then close; the receiver side sits behind its own
/// mutex so concurrent workers get exactly-once hand-off.
pub struct BasicOutboundQueue {
    tx: Mutex<Option<mpsc::UnboundedSender<OutboundMessage>>>,
    rx: Mutex<mpsc::UnboundedReceiver<OutboundMessage>>,
}

impl BasicOutboundQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(rx),
        }
    }
}

impl Default for BasicOutboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboundMessageQueue for BasicOutboundQueue {
    async fn enqueue(&self, message: OutboundMessage) -> Result<(), QueueError> {
        match self.tx.lock().await.as_ref() {
            Some(tx) => tx.send(message).map_err(|_| QueueError::Closed),
            None => Err(QueueError::Closed),
        }
    }

    async fn dequeue(&self) -> Option<OutboundMessage> {
        self.rx.lock().await.recv().await
    }

    async fn shutdown(&self) {
        // Dropping the sender closes the channel once drained.
        self.tx.lock().await.take();
    }
}
