//! Service discovery identities for the served transports.

use imgate_core::config::GatewayConfig;
use imgate_core::error::Result;
use imgate_core::transport::{TransportDescriptor, TransportRegistry};
use serde::Serialize;

/// Disco identity category shared by every transport the gateway serves.
pub const GATEWAY_CATEGORY: &str = "gateway";

/// One `<identity/>` entry advertised for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoIdentity {
    pub category: &'static str,
    #[serde(rename = "type")]
    pub identity_type: &'static str,
    pub name: &'static str,
}

impl From<&TransportDescriptor> for DiscoIdentity {
    fn from(descriptor: &TransportDescriptor) -> Self {
        Self {
            category: GATEWAY_CATEGORY,
            identity_type: descriptor.disco_identity,
            name: descriptor.display_name,
        }
    }
}

/// Answers disco#info identity queries for the enabled transports.
#[derive(Debug, Clone, Default)]
pub struct DiscoService {
    enabled: Vec<&'static TransportDescriptor>,
}

impl DiscoService {
    /// Builds the service from the configured transport names.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTransport` if a configured name is not in the registry.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let registry = TransportRegistry::global();
        let enabled = config
            .gateway
            .enabled_transports
            .iter()
            .map(|name| registry.lookup(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { enabled })
    }

    /// Identity for any registered transport name, enabled or not.
    pub fn identity_for(name: &str) -> Result<DiscoIdentity> {
        TransportRegistry::global()
            .lookup(name)
            .map(DiscoIdentity::from)
    }

    /// Identities of the enabled transports, in configuration order.
    pub fn identities(&self) -> Vec<DiscoIdentity> {
        self.enabled.iter().map(|d| DiscoIdentity::from(*d)).collect()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.iter().any(|d| d.name == name)
    }
}
