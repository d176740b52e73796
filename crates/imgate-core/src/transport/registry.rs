//! Process-wide transport registry.
//!
//! The registry is built once on first access and never written afterwards.
//! Service discovery and configuration validation resolve transport names
//! through it.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

use super::model::TransportType;
use crate::error::{ImgateError, Result};

/// Immutable description of one supported legacy network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransportDescriptor {
    /// The transport this descriptor belongs to
    pub transport: TransportType,
    /// Symbolic name (lookup key)
    pub name: &'static str,
    /// Disco identity type advertised for the transport
    pub disco_identity: &'static str,
    /// Human readable network name
    pub display_name: &'static str,
}

impl From<TransportType> for TransportDescriptor {
    fn from(transport: TransportType) -> Self {
        Self {
            transport,
            name: transport.symbolic_name(),
            disco_identity: transport.disco_identity(),
            display_name: transport.display_name(),
        }
    }
}

/// Lookup table from symbolic transport name to its descriptor.
#[derive(Debug)]
pub struct TransportRegistry {
    by_name: HashMap<&'static str, TransportDescriptor>,
    ordered: Vec<TransportDescriptor>,
}

/// Static storage for the registry (initialized once).
static REGISTRY: OnceLock<TransportRegistry> = OnceLock::new();

impl TransportRegistry {
    fn build() -> Self {
        let ordered: Vec<TransportDescriptor> =
            TransportType::iter().map(TransportDescriptor::from).collect();
        let by_name = ordered.iter().map(|d| (d.name, *d)).collect();
        Self { by_name, ordered }
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static TransportRegistry {
        REGISTRY.get_or_init(Self::build)
    }

    /// Looks up a transport by its symbolic name.
    ///
    /// Names are matched exactly. There is no fallback: a caller that wants the
    /// catch-all entry has to ask for `"other"`.
    ///
    /// # Errors
    ///
    /// Returns [`ImgateError::UnknownTransport`] for names outside the set.
    pub fn lookup(&self, name: &str) -> Result<&TransportDescriptor> {
        self.by_name
            .get(name)
            .ok_or_else(|| ImgateError::unknown_transport(name))
    }

    /// Disco identity for a symbolic transport name.
    pub fn disco_identity(&self, name: &str) -> Result<&'static str> {
        self.lookup(name).map(|d| d.disco_identity)
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &[TransportDescriptor] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
