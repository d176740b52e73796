use futures::future::join_all;
use imgate_core::error::{ImgateError, Result};
use imgate_core::session::{Registration, SessionHost, SessionInfo};
use imgate_core::settings::SettingsService;
use imgate_core::{Jid, TransportType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::factory::SessionFactory;
use super::worker::{SessionHandle, SessionWorker};

/// Identifies one user's session on one transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// Bare address of the owning user
    pub user: Jid,
    pub transport: TransportType,
}

impl SessionKey {
    pub fn new(user: &Jid, transport: TransportType) -> Self {
        Self {
            user: user.to_bare(),
            transport,
        }
    }
}

struct Entry {
    handle: SessionHandle,
    worker: Mutex<Option<SessionWorker>>,
}

/// Manages the live transport sessions of the gateway.
///
/// `SessionManager` is responsible for:
/// - Creating sessions through the [`SessionFactory`]
/// - Giving every session its own dispatch worker
/// - Tearing sessions down on close and at shutdown
pub struct SessionManager {
    factory: SessionFactory,
    host: Arc<dyn SessionHost>,
    settings: Arc<dyn SettingsService>,
    /// Live sessions keyed by bare user address and transport
    sessions: RwLock<HashMap<SessionKey, Arc<Entry>>>,
}

impl SessionManager {
    pub fn new(
        factory: SessionFactory,
        host: Arc<dyn SessionHost>,
        settings: Arc<dyn SettingsService>,
    ) -> Self {
        Self {
            factory,
            host,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn factory(&self) -> &SessionFactory {
        &self.factory
    }

    /// Returns the session for `jid` on the registration's transport,
    /// creating it and its worker if needed.
    ///
    /// The session is not logged in; call [`SessionHandle::login`].
    ///
    /// # Errors
    ///
    /// - `InvalidAddress` if `jid` does not belong to the registered user
    /// - `UnsupportedTransport` if no backend serves the transport
    pub async fn open(
        &self,
        registration: Registration,
        jid: Jid,
        priority: i32,
    ) -> Result<SessionHandle> {
        if jid.to_bare() != registration.jid.to_bare() {
            return Err(ImgateError::invalid_address(
                jid.to_string(),
                format!("not registered as {}", registration.jid),
            ));
        }
        let key = SessionKey::new(&jid, registration.transport);

        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get(&key) {
            if !entry.handle.is_closed() {
                return Ok(entry.handle.clone());
            }
        }

        let info = SessionInfo::new(registration, jid, priority);
        let session = self.factory.create_session(
            info,
            Arc::clone(&self.host),
            Arc::clone(&self.settings),
        )?;
        // lanes of a replaced entry have stopped but still need joining
        let stale = sessions.remove(&key);
        let (handle, worker) = SessionWorker::spawn(session);
        tracing::info!(
            "Opened {} session {} for {}",
            key.transport,
            handle.id(),
            key.user
        );

        sessions.insert(
            key,
            Arc::new(Entry {
                handle: handle.clone(),
                worker: Mutex::new(Some(worker)),
            }),
        );
        drop(sessions);

        if let Some(stale) = stale {
            tracing::debug!("Reaping stopped session {}", stale.handle.id());
            Self::reap(&stale).await;
        }
        Ok(handle)
    }

    pub async fn get(&self, user: &Jid, transport: TransportType) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&SessionKey::new(user, transport))
            .map(|entry| entry.handle.clone())
    }

    /// Sessions currently open for `user`, across transports.
    pub async fn sessions_for(&self, user: &Jid) -> Vec<SessionHandle> {
        let bare = user.to_bare();
        let sessions = self.sessions.read().await;
        sessions
            .iter()
            .filter(|(key, _)| key.user == bare)
            .map(|(_, entry)| entry.handle.clone())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Logs the session out, stops its worker and forgets it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such session is open.
    pub async fn close(&self, user: &Jid, transport: TransportType) -> Result<()> {
        let key = SessionKey::new(user, transport);
        let entry = self
            .sessions
            .write()
            .await
            .remove(&key)
            .ok_or_else(|| ImgateError::not_found("session", format!("{}/{}", key.user, transport)))?;
        Self::stop(&entry).await;
        tracing::info!("Closed {} session for {}", transport, key.user);
        Ok(())
    }

    /// Closes every open session concurrently.
    pub async fn shutdown_all(&self) {
        let entries: Vec<Arc<Entry>> = self.sessions.write().await.drain().map(|(_, e)| e).collect();
        if entries.is_empty() {
            return;
        }
        tracing::info!("Shutting down {} sessions", entries.len());
        join_all(entries.iter().map(|entry| Self::stop(entry))).await;
    }

    async fn stop(entry: &Entry) {
        if let Err(e) = entry.handle.logout().await {
            tracing::warn!("Logout of {} failed: {}", entry.handle.user(), e);
        }
        Self::reap(entry).await;
    }

    /// Cancels the lanes and waits for them to exit.
    async fn reap(entry: &Entry) {
        entry.handle.shutdown();
        if let Some(worker) = entry.worker.lock().await.take() {
            worker.join().await;
        }
    }
}
