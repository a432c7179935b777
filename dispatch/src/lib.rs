//! Outbound dispatch for Courier.
//!
//! Producers enqueue an [`OutboundMessage`](courier_types::OutboundMessage)
//! and move on; delivery is fire-and-forget from their perspective, with
//! outcomes observable through logs. One or more dispatch workers drain the
//! shared queue, resolve each message's transport by destination scheme, and
//! drive delivery with a bounded retry policy.
//!
//! # Pieces
//!
//! - [`OutboundMessageQueue`] / [`BasicOutboundQueue`] - the producer/consumer
//!   contract and its channel-backed implementation
//! - [`RetryPolicy`] - bounded attempts with exponential backoff
//! - [`Dispatcher`] - worker lifecycle: spawn, drain, shutdown
//!
//! # Ordering
//!
//! Insertion order is the delivery-attempt order, not a delivery guarantee.
//! Across destinations there is no ordering at all; for a single destination
//! FIFO is best-effort only, since concurrent workers and retry backoff can
//! reorder deliveries relative to freshly enqueued messages.

mod dispatcher;
mod queue;
mod retry;

pub use dispatcher::Dispatcher;
pub use queue::{BasicOutboundQueue, OutboundMessageQueue, QueueError};
pub use retry::RetryPolicy;
