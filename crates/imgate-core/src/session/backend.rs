use std::sync::Arc;

use super::contract::TransportSession;
use super::host::SessionHost;
use super::model::SessionInfo;
use crate::settings::SettingsService;
use crate::transport::TransportType;

/// Creates sessions for one legacy network.
///
/// The gateway keeps one backend per served transport and picks it by the
/// registration's transport type when a user logs in.
pub trait SessionBackend: Send + Sync {
    fn transport(&self) -> TransportType;

    fn create_session(
        &self,
        info: SessionInfo,
        host: Arc<dyn SessionHost>,
        settings: Arc<dyn SettingsService>,
    ) -> Arc<dyn TransportSession>;
}
