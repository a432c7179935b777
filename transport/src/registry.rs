//! Scheme -> transport mapping.
//!
//! Built once at startup from the set of activated transports, read-only in
//! steady state, so `resolve` needs no locking.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RegistryError, TransportError};
use crate::OutboundTransport;

/// Maps a URI scheme (case-insensitive) to the transport serving it.
///
/// Each scheme maps to at most one transport; a conflicting registration is
/// rejected rather than shadowing the earlier one.
#[derive(Debug, Default)]
pub struct TransportRegistry {
    by_scheme: HashMap<String, Arc<dyn OutboundTransport>>,
    // Distinct instances, in registration order, for lifecycle fan-out.
    transports: Vec<Arc<dyn OutboundTransport>>,
}

impl TransportRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate each transport and register the ones that came up.
    ///
    /// An activation failure excludes that transport from the registry and
    /// is reported in the returned list; it is not fatal to the registry as
    /// long as other transports still function. A scheme conflict is fatal:
    /// already-activated transports are deactivated and the error returned.
    pub async fn activate(
        transports: impl IntoIterator<Item = Arc<dyn OutboundTransport>>,
    ) -> Result<(Self, Vec<TransportError>), RegistryError> {
        let mut registry = Self::new();
        let mut failures = Vec::new();

        for transport in transports {
            match transport.activate().await {
                Ok(()) => {
                    if let Err(conflict) = registry.register(transport.clone()) {
                        transport.deactivate().await;
                        registry.deactivate_all().await;
                        return Err(conflict);
                    }
                }
                Err(err) => {
                    tracing::error!(
                        schemes = ?transport.schemes(),
                        error = %err,
                        "transport activation failed; excluding from registry"
                    );
                    failures.push(err);
                }
            }
        }

        Ok((registry, failures))
    }

    /// Claim every scheme the transport serves.
    ///
    /// Fail-fast: if any scheme is already claimed, nothing is registered
    /// and [`RegistryError::SchemeConflict`] is returned.
    pub fn register(
        &mut self,
        transport: Arc<dyn OutboundTransport>,
    ) -> Result<(), RegistryError> {
        for scheme in transport.schemes() {
            let key = scheme.to_ascii_lowercase();
            if self.by_scheme.contains_key(&key) {
                return Err(RegistryError::SchemeConflict(key));
            }
        }
        for scheme in transport.schemes() {
            self.by_scheme
                .insert(scheme.to_ascii_lowercase(), transport.clone());
        }
        self.transports.push(transport);
        Ok(())
    }

    /// Look up the transport responsible for a scheme.
    pub fn resolve(&self, scheme: &str) -> Result<Arc<dyn OutboundTransport>, RegistryError> {
        self.by_scheme
            .get(&scheme.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| RegistryError::UnsupportedScheme(scheme.to_string()))
    }

    /// All registered schemes, for display by startup reporting.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.by_scheme.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Release every registered transport's network resource.
    ///
    /// Called after the last dispatch worker has finished; each distinct
    /// transport is deactivated once, regardless of how many schemes it
    /// serves.
    pub async fn deactivate_all(&self) {
        for transport in &self.transports {
            transport.deactivate().await;
        }
    }
}
