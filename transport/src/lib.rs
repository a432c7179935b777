//! Outbound transports for Courier.
//!
//! A transport knows how to deliver an [`OutboundMessage`] over one family
//! of URI schemes. The crate is organized around three pieces:
//!
//! - [`OutboundTransport`] - the per-scheme-family delivery contract
//! - [`HttpTransport`] - the `http`/`https` instantiation over a pooled
//!   [`reqwest::Client`]
//! - [`TransportRegistry`] - the scheme -> transport mapping, built once at
//!   startup and read-only afterwards
//!
//! # Lifecycle
//!
//! A transport moves `Inactive -> Active -> Inactive`. `activate` acquires
//! the long-lived network resource exactly once before any message is
//! handled; `deactivate` releases it and is guaranteed to run on all
//! shutdown paths, including after an activation failure. Transports keep no
//! per-message state: the pooled resource is safe for concurrent use by
//! multiple dispatch workers.
//!
//! # Failure containment
//!
//! `handle_message` reports a failed attempt as a
//! [`TransportError::Delivery`] value rather than panicking across the
//! boundary. A transport performs exactly one attempt per call; retry and
//! backoff belong to the dispatcher, which has the cross-attempt context.

mod error;
mod http;
mod registry;

pub use error::{RegistryError, TransportError};
pub use http::HttpTransport;
pub use registry::TransportRegistry;

use async_trait::async_trait;
use courier_types::OutboundMessage;

/// Delivery contract implemented once per wire scheme family.
#[async_trait]
pub trait OutboundTransport: Send + Sync {
    /// The immutable set of URI schemes this instance serves.
    fn schemes(&self) -> &[&str];

    /// Acquire the underlying network resource.
    ///
    /// Must be called exactly once before [`handle_message`]. Failure is
    /// fatal to this transport and must be surfaced to registry
    /// construction, never swallowed.
    ///
    /// [`handle_message`]: OutboundTransport::handle_message
    async fn activate(&self) -> Result<(), TransportError>;

    /// Attempt one delivery of a single message.
    ///
    /// Content negotiation follows the payload kind: raw bytes are marked
    /// with the binary wire content type, structured values with the JSON
    /// one. Ordinary failures (network errors, non-success responses) come
    /// back as [`TransportError::Delivery`].
    async fn handle_message(&self, message: &OutboundMessage) -> Result<(), TransportError>;

    /// Release the network resource.
    ///
    /// Idempotent, and a no-op if the transport was never activated.
    async fn deactivate(&self);
}

impl core::fmt::Debug for dyn OutboundTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutboundTransport")
            .field("schemes", &self.schemes())
            .finish()
    }
}
