//! Error types for the transport crate.

use thiserror::Error;

/// Failures at the boundary of a single transport.
///
/// Ordinary delivery failures are returned as values, never panicked across
/// the transport boundary; the dispatcher decides whether to retry.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport's network resource could not be acquired. Fatal to the
    /// transport (it cannot serve messages); not necessarily fatal to the
    /// process.
    #[error("transport activation failed: {0}")]
    Activation(String),

    /// A single delivery attempt failed (network error or non-success
    /// response). Recoverable via the dispatcher's retry policy.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// `handle_message` was called before `activate`, or after `deactivate`.
    #[error("transport has not been activated")]
    Inactive,
}

impl TransportError {
    /// Whether another attempt at the same message could succeed.
    ///
    /// Only single-attempt delivery failures are retryable; an inactive or
    /// unactivatable transport will not recover by waiting.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}

/// Failures resolving or building the scheme registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A scheme is already claimed by a previously registered transport.
    /// Registration is fail-fast: a misconfigured boot should not silently
    /// shadow a transport.
    #[error("scheme {0:?} is already registered to another transport")]
    SchemeConflict(String),

    /// No transport claims this scheme. A configuration error, surfaced
    /// immediately: no amount of retrying will add a transport.
    #[error("no transport registered for scheme {0:?}")]
    UnsupportedScheme(String),
}
