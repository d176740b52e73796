use imgate_core::error::{ImgateError, Result};
use imgate_core::session::{SessionBackend, SessionHost, SessionInfo, TransportSession};
use imgate_core::settings::SettingsService;
use imgate_core::TransportType;
use std::collections::HashMap;
use std::sync::Arc;

/// Selects the session variant for a registration by its transport type.
///
/// One backend is registered per served transport; a registration for any
/// other transport is rejected rather than handed to a generic session.
#[derive(Default)]
pub struct SessionFactory {
    backends: HashMap<TransportType, Arc<dyn SessionBackend>>,
}

impl SessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend, replacing any previous one for its transport.
    pub fn register(&mut self, backend: Arc<dyn SessionBackend>) {
        let transport = backend.transport();
        if self.backends.insert(transport, backend).is_some() {
            tracing::warn!("Replaced session backend for {}", transport);
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn SessionBackend>) -> Self {
        self.register(backend);
        self
    }

    pub fn supports(&self, transport: TransportType) -> bool {
        self.backends.contains_key(&transport)
    }

    /// Transports with a registered backend.
    pub fn transports(&self) -> Vec<TransportType> {
        let mut transports: Vec<_> = self.backends.keys().copied().collect();
        transports.sort_by_key(|t| t.symbolic_name());
        transports
    }

    /// Creates a session for `info.registration.transport`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedTransport` if no backend serves the transport.
    pub fn create_session(
        &self,
        info: SessionInfo,
        host: Arc<dyn SessionHost>,
        settings: Arc<dyn SettingsService>,
    ) -> Result<Arc<dyn TransportSession>> {
        let transport = info.transport();
        let backend = self
            .backends
            .get(&transport)
            .ok_or_else(|| ImgateError::UnsupportedTransport(transport.to_string()))?;
        Ok(backend.create_session(info, host, settings))
    }
}
