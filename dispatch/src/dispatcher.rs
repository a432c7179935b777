//! The control loop draining the queue and driving delivery.

use std::sync::Arc;

use courier_transport::{OutboundTransport, TransportRegistry};
use courier_types::OutboundMessage;
use tokio::task::JoinHandle;

use crate::queue::OutboundMessageQueue;
use crate::retry::RetryPolicy;

/// Drains the outbound queue with one or more concurrent workers.
///
/// Each worker loops independently: dequeue, resolve the transport for the
/// message's destination scheme, deliver with bounded retry. Per-message
/// failures are contained and logged at message granularity; no error ever
/// escapes a worker loop.
pub struct Dispatcher {
    queue: Arc<dyn OutboundMessageQueue>,
    registry: Arc<TransportRegistry>,
    policy: RetryPolicy,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        queue: Arc<dyn OutboundMessageQueue>,
        registry: Arc<TransportRegistry>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            registry,
            policy,
            workers: Vec::new(),
        }
    }

    /// Start `count` worker tasks draining the queue.
    pub fn spawn_workers(&mut self, count: usize) {
        for id in 0..count {
            let queue = self.queue.clone();
            let registry = self.registry.clone();
            let policy = self.policy.clone();
            self.workers
                .push(tokio::spawn(worker_loop(id, queue, registry, policy)));
        }
    }

    /// Stop accepting messages, drain the queue, then release transports.
    ///
    /// In-flight deliveries complete and every message enqueued before this
    /// call is still attempted; once the workers observe the closed signal
    /// and exit, all registered transports are deactivated.
    pub async fn shutdown(mut self) {
        self.queue.shutdown().await;
        for worker in self.workers.drain(..) {
            if worker.await.is_err() {
                // A worker that dies is itself a bug; make it loud.
                tracing::error!("dispatch worker panicked");
            }
        }
        self.registry.deactivate_all().await;
    }
}

async fn worker_loop(
    id: usize,
    queue: Arc<dyn OutboundMessageQueue>,
    registry: Arc<TransportRegistry>,
    policy: RetryPolicy,
) {
    tracing::debug!(worker = id, "dispatch worker started");
    while let Some(message) = queue.dequeue().await {
        let transport = match registry.resolve(message.scheme()) {
            Ok(transport) => transport,
            Err(err) => {
                // Terminal for this message: waiting will not add a
                // transport.
                tracing::error!(
                    destination = %message.destination(),
                    error = %err,
                    "dropping message with no matching transport"
                );
                continue;
            }
        };
        deliver_with_retry(transport.as_ref(), &message, &policy).await;
    }
    tracing::debug!(worker = id, "dispatch worker stopped");
}

/// Drive one message to a terminal outcome: delivered, or dropped after the
/// attempt cap.
async fn deliver_with_retry(
    transport: &dyn OutboundTransport,
    message: &OutboundMessage,
    policy: &RetryPolicy,
) {
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match transport.handle_message(message).await {
            Ok(()) => return,
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = policy.delay_before(attempt - 1);
                tracing::warn!(
                    destination = %message.destination(),
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "delivery attempt failed; backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                tracing::error!(
                    destination = %message.destination(),
                    attempts = attempt,
                    error = %err,
                    "dropping undeliverable message"
                );
                return;
            }
        }
    }
}
