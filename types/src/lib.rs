//! Core domain types for Courier.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the dispatch
//! stack: producers construct an [`OutboundMessage`], the queue and the
//! dispatcher move it, and a transport consumes it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Content type marking a raw, pre-packed wire envelope.
///
/// Raw payloads may be pre-encrypted agent-wire envelopes and must be posted
/// byte-for-byte, never re-encoded.
pub const WIRE_CONTENT_TYPE: &str = "application/ssi-agent-wire";

/// Content type marking a structured (JSON) payload.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body of an outbound message.
///
/// The raw/structured distinction drives content-type negotiation on the
/// wire: a transport marks raw bytes with [`WIRE_CONTENT_TYPE`] and
/// structured values with [`JSON_CONTENT_TYPE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Opaque bytes, delivered verbatim.
    Raw(Vec<u8>),
    /// A structured value, serialized to JSON at delivery time.
    Structured(serde_json::Value),
}

#[derive(Debug, Error)]
#[error("failed to serialize structured payload: {0}")]
pub struct PayloadEncodeError(#[from] serde_json::Error);

impl Payload {
    /// The `Content-Type` this payload carries on the wire.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Raw(_) => WIRE_CONTENT_TYPE,
            Self::Structured(_) => JSON_CONTENT_TYPE,
        }
    }

    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Encode the payload into its wire body.
    ///
    /// Raw bytes are returned as-is; structured values are serialized to
    /// JSON.
    pub fn to_body(&self) -> Result<Vec<u8>, PayloadEncodeError> {
        match self {
            Self::Raw(bytes) => Ok(bytes.clone()),
            Self::Structured(value) => Ok(serde_json::to_vec(value)?),
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// A unit of payload data plus destination, awaiting delivery.
///
/// Immutable once created. A message is owned exclusively by the queue until
/// dequeued, then by the dispatcher/transport during delivery, and is
/// discarded after a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    destination: Url,
    payload: Payload,
}

impl OutboundMessage {
    #[must_use]
    pub fn new(destination: Url, payload: impl Into<Payload>) -> Self {
        Self {
            destination,
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// The destination's URI scheme, used to select a transport.
    ///
    /// `Url` normalizes schemes to lowercase at parse time.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.destination.scheme()
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_payload_uses_wire_content_type() {
        let payload = Payload::Raw(vec![0x01, 0x02]);
        assert_eq!(payload.content_type(), WIRE_CONTENT_TYPE);
        assert!(payload.is_raw());
    }

    #[test]
    fn structured_payload_uses_json_content_type() {
        let payload = Payload::Structured(json!({"type": "ping"}));
        assert_eq!(payload.content_type(), JSON_CONTENT_TYPE);
        assert!(!payload.is_raw());
    }

    #[test]
    fn raw_body_is_verbatim() {
        let payload = Payload::Raw(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(payload.to_body().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn structured_body_is_json() {
        let payload = Payload::Structured(json!({"type": "ping"}));
        let body = payload.to_body().unwrap();
        let round: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(round, json!({"type": "ping"}));
    }

    #[test]
    fn message_exposes_scheme() {
        let url = Url::parse("HTTP://example.test/msg").unwrap();
        let message = OutboundMessage::new(url, vec![1, 2, 3]);
        // Url lowercases the scheme for us.
        assert_eq!(message.scheme(), "http");
        assert_eq!(message.destination().path(), "/msg");
    }
}
