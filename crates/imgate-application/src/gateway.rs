//! Gateway composition root.

use imgate_core::config::GatewayConfig;
use imgate_core::error::{ImgateError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::disco::DiscoService;
use crate::host::{ChannelHost, HostEvent};
use crate::session::{SessionFactory, SessionManager};

/// Wires configuration, backends, the host channel and the session manager
/// together.
pub struct Gateway {
    config: Arc<GatewayConfig>,
    disco: DiscoService,
    sessions: SessionManager,
}

impl Gateway {
    /// Builds a gateway serving the configured transports.
    ///
    /// Returns the receiving end of the host event channel alongside it.
    ///
    /// # Errors
    ///
    /// - `Config` / `UnknownTransport` if the configuration is invalid
    /// - `UnsupportedTransport` if an enabled transport has no backend
    pub fn new(
        config: GatewayConfig,
        factory: SessionFactory,
    ) -> Result<(Self, mpsc::UnboundedReceiver<HostEvent>)> {
        config.validate()?;
        for transport in config.enabled_transports()? {
            if !factory.supports(transport) {
                return Err(ImgateError::UnsupportedTransport(transport.to_string()));
            }
        }
        let disco = DiscoService::from_config(&config)?;

        let config = Arc::new(config);
        let (host, events) = ChannelHost::new(config.gateway.domain.clone());
        let sessions = SessionManager::new(factory, Arc::new(host), config.clone());

        tracing::info!(
            "Gateway for {} serving {:?}",
            config.gateway.domain,
            config.gateway.enabled_transports
        );
        Ok((
            Self {
                config,
                disco,
                sessions,
            },
            events,
        ))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn disco(&self) -> &DiscoService {
        &self.disco
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Closes every session.
    pub async fn shutdown(&self) {
        self.sessions.shutdown_all().await;
    }
}
