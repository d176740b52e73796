//! Facebook implementation of the transport session contract.

use async_trait::async_trait;
use imgate_core::Jid;
use imgate_core::ImgateError;
use imgate_core::session::{
    ChatState, Contact, LoginStatus, PendingStatus, PresenceType, SendOutcome, SessionHost,
    SessionInfo, SkipReason, SupportedFeature, TransportSession,
};
use imgate_core::settings::SettingsService;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::adapter::{
    FacebookAdapter, FacebookAdapterFactory, FacebookEvent, FacebookEventListener,
    TypingNotification,
};
use crate::listener::SessionListener;

/// Operator property that allows publishing status text to Facebook.
///
/// Facebook status updates are public posts, so this is off unless the
/// operator turns it on.
pub const UPDATE_STATUS_PROPERTY: &str = "gateway.facebook.update_status";

const FEATURES: &[SupportedFeature] = &[SupportedFeature::Attention];

/// The adapter handle and its listener; present together or not at all.
struct Connection {
    adapter: Arc<dyn FacebookAdapter>,
    listener: Arc<dyn FacebookEventListener>,
    generation: u64,
}

#[derive(Default)]
struct SessionState {
    status: LoginStatus,
    pending: Option<PendingStatus>,
    connection: Option<Connection>,
}

pub(crate) struct SessionInner {
    info: SessionInfo,
    host: Arc<dyn SessionHost>,
    settings: Arc<dyn SettingsService>,
    factory: Arc<dyn FacebookAdapterFactory>,
    /// Shared by lifecycle calls and listener callbacks
    state: Mutex<SessionState>,
    generations: AtomicU64,
}

/// One user's Facebook chat session.
///
/// Lifecycle calls and inbound events serialize on the session state lock,
/// but no adapter call is awaited while it is held. Teardown first detaches
/// the connection from the state, then shuts the client down. Outbound
/// actions clone the adapter handle, so a logout is never stuck behind a slow
/// send; a send that loses that race fails against the shut-down client and
/// is logged.
pub struct FacebookSession {
    inner: Arc<SessionInner>,
}

impl FacebookSession {
    pub fn new(
        info: SessionInfo,
        host: Arc<dyn SessionHost>,
        settings: Arc<dyn SettingsService>,
        factory: Arc<dyn FacebookAdapterFactory>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                info,
                host,
                settings,
                factory,
                state: Mutex::new(SessionState::default()),
                generations: AtomicU64::new(0),
            }),
        }
    }

    fn user(&self) -> &Jid {
        &self.inner.info.jid
    }

    async fn connected_adapter(&self) -> Option<Arc<dyn FacebookAdapter>> {
        let state = self.inner.state.lock().await;
        state.connection.as_ref().map(|c| Arc::clone(&c.adapter))
    }
}

impl Connection {
    /// Shuts the adapter down, then detaches the listener.
    ///
    /// Must not be awaited with the session state locked: the adapter may
    /// wait in `shutdown` for an in-flight callback, and callbacks take that
    /// lock.
    async fn release(self) {
        if let Err(err) = self.adapter.shutdown().await {
            tracing::warn!(target: "facebook", "Adapter shutdown failed: {}", err);
        }
        self.adapter.remove_listener(&self.listener);
    }
}

impl SessionInner {
    pub(crate) async fn handle_event(&self, generation: u64, event: FacebookEvent) {
        let user = &self.info.jid;

        let lost = {
            let mut state = self.state.lock().await;
            let attached = state
                .connection
                .as_ref()
                .is_some_and(|c| c.generation == generation);
            if !attached {
                tracing::debug!(
                    target: "facebook",
                    user = %user,
                    "Dropping event from detached listener: {:?}",
                    event
                );
                return;
            }

            match &event {
                FacebookEvent::ConnectionLost { reason } => {
                    tracing::warn!(target: "facebook", user = %user, "Connection lost: {}", reason);
                    state.status = LoginStatus::LoggedOut;
                    state
                        .connection
                        .take()
                        .map(|connection| (connection, reason.clone()))
                }
                _ => None,
            }
        };

        if let Some((connection, reason)) = lost {
            // Running on the adapter's own notification task; its shutdown
            // may wait for this callback to return.
            tokio::spawn(connection.release());
            self.host
                .session_disconnected_no_reconnect(user, Some(reason))
                .await;
            return;
        }

        let host = &self.host;
        match event {
            FacebookEvent::MessageReceived { from, body } => {
                host.deliver_message(user, &host.convert_id_to_jid(&from), &body)
                    .await;
            }
            FacebookEvent::TypingChanged { from, typing } => {
                let state = if typing {
                    ChatState::Composing
                } else {
                    ChatState::Paused
                };
                host.deliver_chat_state(user, &host.convert_id_to_jid(&from), state)
                    .await;
            }
            FacebookEvent::PokeReceived { from } => {
                host.deliver_buzz(user, &host.convert_id_to_jid(&from)).await;
            }
            FacebookEvent::BuddyPresence {
                id,
                name,
                online,
                idle,
            } => {
                let presence = match (online, idle) {
                    (false, _) => PresenceType::Unavailable,
                    (true, true) => PresenceType::Away,
                    (true, false) => PresenceType::Available,
                };
                host.update_contact_presence(
                    user,
                    &host.convert_id_to_jid(&id),
                    presence,
                    name.as_deref(),
                )
                .await;
            }
            // handled under the state lock above
            FacebookEvent::ConnectionLost { .. } => {}
        }
    }
}

#[async_trait]
impl TransportSession for FacebookSession {
    fn info(&self) -> &SessionInfo {
        &self.inner.info
    }

    fn supported_features(&self) -> &[SupportedFeature] {
        FEATURES
    }

    async fn login_status(&self) -> LoginStatus {
        self.inner.state.lock().await.status
    }

    async fn pending_status(&self) -> Option<PendingStatus> {
        self.inner.state.lock().await.pending.clone()
    }

    async fn is_connected(&self) -> bool {
        self.inner.state.lock().await.connection.is_some()
    }

    async fn login(&self, presence: PresenceType, status: Option<&str>) {
        let (adapter, generation) = {
            let mut state = self.inner.state.lock().await;
            state.pending = Some(PendingStatus {
                presence,
                status: status.map(str::to_string),
            });
            if matches!(state.status, LoginStatus::LoggedIn | LoginStatus::LoggingIn) {
                tracing::debug!(
                    target: "facebook",
                    user = %self.user(),
                    "Already logged in, recorded pending presence {:?}",
                    presence
                );
                return;
            }

            let adapter = self.inner.factory.create_adapter();
            let generation = self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1;
            let listener: Arc<dyn FacebookEventListener> = Arc::new(SessionListener::new(
                Arc::downgrade(&self.inner),
                generation,
            ));
            adapter.add_listener(Arc::clone(&listener));
            state.connection = Some(Connection {
                adapter: Arc::clone(&adapter),
                listener,
                generation,
            });
            state.status = LoginStatus::LoggingIn;
            (adapter, generation)
        };
        self.inner
            .host
            .set_login_status(self.user(), LoginStatus::LoggingIn)
            .await;

        let registration = &self.inner.info.registration;
        let result = adapter
            .initialize(&registration.username, &registration.password)
            .await;

        let mut state = self.inner.state.lock().await;
        let current = state.connection.as_ref().map(|c| c.generation);
        if current != Some(generation) {
            tracing::debug!(
                target: "facebook",
                user = %self.user(),
                "Login superseded while authenticating"
            );
            return;
        }

        match result {
            Err(err) => {
                tracing::error!(target: "facebook", user = %self.user(), "Login failed: {}", err);
                state.status = LoginStatus::LoggedOut;
                let connection = state.connection.take();
                drop(state);
                if let Some(connection) = connection {
                    connection.release().await;
                }

                let reason = ImgateError::from(err).to_string();
                self.inner
                    .host
                    .set_login_status(self.user(), LoginStatus::LoggedOut)
                    .await;
                self.inner
                    .host
                    .session_disconnected_no_reconnect(self.user(), Some(reason))
                    .await;
            }
            Ok(()) => {
                state.status = LoginStatus::LoggedIn;
                let pending = state.pending.clone();
                drop(state);

                if let Err(err) = adapter.set_visibility(true).await {
                    tracing::warn!(target: "facebook", "Unable to go online: {}", err);
                }

                tracing::info!(target: "facebook", user = %self.user(), "Logged in");
                self.inner
                    .host
                    .set_login_status(self.user(), LoginStatus::LoggedIn)
                    .await;
                if let Some(pending) = pending {
                    let outcome = self
                        .update_status(pending.presence, pending.status.as_deref())
                        .await;
                    tracing::debug!(target: "facebook", "Applied pending presence: {:?}", outcome);
                }
            }
        }
    }

    async fn logout(&self) {
        let connection = {
            let mut state = self.inner.state.lock().await;
            let connection = state.connection.take();
            state.status = if connection.is_some() {
                LoginStatus::Disconnecting
            } else {
                LoginStatus::LoggedOut
            };
            connection
        };

        // Detached from the state above, so late events are dropped by the
        // generation check while the client winds down.
        if let Some(connection) = connection {
            if let Err(err) = connection.adapter.set_visibility(false).await {
                tracing::warn!(target: "facebook", "Unable to go offline: {}", err);
            }
            if let Err(err) = connection.adapter.pause().await {
                tracing::warn!(target: "facebook", "Unable to pause client: {}", err);
            }
            connection.release().await;

            let mut state = self.inner.state.lock().await;
            // a login may have started meanwhile
            if state.status == LoginStatus::Disconnecting {
                state.status = LoginStatus::LoggedOut;
            }
        }

        tracing::info!(target: "facebook", user = %self.user(), "Logged out");
        self.inner
            .host
            .session_disconnected_no_reconnect(self.user(), None)
            .await;
    }

    async fn clean_up(&self) {
        let connection = {
            let mut state = self.inner.state.lock().await;
            state.status = LoginStatus::LoggedOut;
            state.connection.take()
        };
        if let Some(connection) = connection {
            connection.release().await;
            tracing::debug!(target: "facebook", user = %self.user(), "Released client");
        }
    }

    // Facebook has no roster-editing API; the buddy list is mirrored read-only.

    async fn add_contact(&self, jid: &Jid, _nickname: Option<&str>, _groups: &[String]) {
        tracing::debug!(target: "facebook", "Roster is read-only, ignoring add of {}", jid);
    }

    async fn remove_contact(&self, contact: &Contact) {
        tracing::debug!(target: "facebook", "Roster is read-only, ignoring removal of {}", contact.jid);
    }

    async fn update_contact(&self, contact: &Contact) {
        tracing::debug!(target: "facebook", "Roster is read-only, ignoring update of {}", contact.jid);
    }

    async fn accept_add_contact(&self, jid: &Jid) {
        let user_id = self.inner.host.convert_jid_to_id(jid);
        tracing::debug!(
            target: "facebook",
            "Accept-adding is not supported. Cannot accept-add: {}",
            user_id
        );
    }

    async fn send_message(&self, jid: &Jid, message: &str) -> SendOutcome {
        let Some(adapter) = self.connected_adapter().await else {
            tracing::debug!(target: "facebook", "Not connected, dropping message to {}", jid);
            return SendOutcome::Skipped(SkipReason::NotConnected);
        };
        let recipient = self.inner.host.convert_jid_to_id(jid);
        match adapter.post_chat_message(message, &recipient).await {
            Ok(()) => SendOutcome::Delivered,
            Err(err) => {
                tracing::error!(target: "facebook", recipient = %recipient, "Unable to send message: {}", err);
                SendOutcome::Failed(err.to_string())
            }
        }
    }

    async fn send_chat_state(&self, jid: &Jid, state: ChatState) -> SendOutcome {
        let Some(adapter) = self.connected_adapter().await else {
            return SendOutcome::Skipped(SkipReason::NotConnected);
        };
        let recipient = self.inner.host.convert_jid_to_id(jid);
        let typing = TypingNotification::from(state);
        match adapter.post_typing_notification(&recipient, typing).await {
            Ok(()) => SendOutcome::Delivered,
            Err(err) => {
                tracing::error!(
                    target: "facebook",
                    recipient = %recipient,
                    "Unable to send typing notification: {}",
                    err
                );
                SendOutcome::Failed(err.to_string())
            }
        }
    }

    async fn send_buzz_notification(&self, jid: &Jid, _message: Option<&str>) -> SendOutcome {
        let Some(adapter) = self.connected_adapter().await else {
            return SendOutcome::Skipped(SkipReason::NotConnected);
        };
        let recipient = self.inner.host.convert_jid_to_id(jid);
        match adapter.post_buddy_poke(&recipient).await {
            Ok(()) => SendOutcome::Delivered,
            Err(err) => {
                tracing::error!(target: "facebook", recipient = %recipient, "Unable to send poke: {}", err);
                SendOutcome::Failed(err.to_string())
            }
        }
    }

    async fn update_legacy_avatar(&self, mime_type: &str, data: &[u8]) {
        // Facebook offers no avatar upload through the chat client.
        tracing::debug!(
            target: "facebook",
            "Avatar upload unsupported, ignoring {} bytes of {}",
            data.len(),
            mime_type
        );
    }

    async fn update_status(&self, presence: PresenceType, status: Option<&str>) -> SendOutcome {
        let Some(adapter) = self.connected_adapter().await else {
            return SendOutcome::Skipped(SkipReason::NotConnected);
        };
        if let Err(err) = adapter.set_visibility(true).await {
            tracing::warn!(target: "facebook", "Unable to set visibility for {:?}: {}", presence, err);
        }

        if !self.inner.settings.bool_property(UPDATE_STATUS_PROPERTY, false) {
            return SendOutcome::Skipped(SkipReason::Disabled);
        }
        let Some(text) = status.filter(|s| !s.is_empty()) else {
            return SendOutcome::Skipped(SkipReason::EmptyStatus);
        };

        tracing::debug!(target: "facebook", "Setting Facebook status to {}", text);
        match adapter.set_status_message(text).await {
            Ok(()) => SendOutcome::Delivered,
            Err(err) => {
                tracing::error!(target: "facebook", user = %self.user(), "Unable to update status: {}", err);
                SendOutcome::Failed(err.to_string())
            }
        }
    }

    async fn fetch_remote_resource(&self, url: &str) -> Option<Vec<u8>> {
        let adapter = self.connected_adapter().await?;
        match adapter.fetch_bytes(url).await {
            Ok(Some(bytes)) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                tracing::debug!(target: "facebook", "Nothing returned for {}", url);
                None
            }
            Err(err) => {
                tracing::warn!(target: "facebook", "Unable to fetch {}: {}", url, err);
                None
            }
        }
    }
}
