use imgate_core::TransportType;
use imgate_core::session::{SessionBackend, SessionHost, SessionInfo, TransportSession};
use imgate_core::settings::SettingsService;
use std::sync::Arc;

use crate::adapter::FacebookAdapterFactory;
use crate::session::FacebookSession;

/// Builds [`FacebookSession`]s around adapters from one factory.
pub struct FacebookBackend {
    factory: Arc<dyn FacebookAdapterFactory>,
}

impl FacebookBackend {
    pub fn new(factory: Arc<dyn FacebookAdapterFactory>) -> Self {
        Self { factory }
    }
}

impl SessionBackend for FacebookBackend {
    fn transport(&self) -> TransportType {
        TransportType::Facebook
    }

    fn create_session(
        &self,
        info: SessionInfo,
        host: Arc<dyn SessionHost>,
        settings: Arc<dyn SettingsService>,
    ) -> Arc<dyn TransportSession> {
        Arc::new(FacebookSession::new(
            info,
            host,
            settings,
            Arc::clone(&self.factory),
        ))
    }
}
