#![allow(dead_code)]

use async_trait::async_trait;
use imgate_core::session::{
    ChatState, Contact, LoginStatus, PendingStatus, PresenceType, Registration, SendOutcome,
    SessionBackend, SessionHost, SessionInfo, SupportedFeature, TransportSession,
};
use imgate_core::settings::SettingsService;
use imgate_core::{Jid, TransportType};
use imgate_facebook::{FacebookAdapter, FacebookError, FacebookEvent, FacebookEventListener, TypingNotification};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GATEWAY_DOMAIN: &str = "gw.example.org";

/// Calls observed by a [`ScriptedSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Login(PresenceType, Option<String>),
    Logout,
    CleanUp,
    UpdateStatus(PresenceType, Option<String>),
    AddContact(String),
    RemoveContact(String),
    UpdateContact(String),
    AcceptAddContact(String),
    Avatar(String, usize),
    Message(String, String),
    ChatState(String, ChatState),
    Buzz(String),
    Fetch(String),
}

/// Session that records every call and can slow its outbound lane down.
pub struct ScriptedSession {
    info: SessionInfo,
    send_delay: Option<Duration>,
    calls: Mutex<Vec<SessionCall>>,
    status: Mutex<LoginStatus>,
}

impl ScriptedSession {
    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SessionCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn delay(&self) {
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TransportSession for ScriptedSession {
    fn info(&self) -> &SessionInfo {
        &self.info
    }

    fn supported_features(&self) -> &[SupportedFeature] {
        &[]
    }

    async fn login_status(&self) -> LoginStatus {
        *self.status.lock().unwrap()
    }

    async fn pending_status(&self) -> Option<PendingStatus> {
        None
    }

    async fn is_connected(&self) -> bool {
        self.status.lock().unwrap().is_logged_in()
    }

    async fn login(&self, presence: PresenceType, status: Option<&str>) {
        self.record(SessionCall::Login(presence, status.map(str::to_string)));
        *self.status.lock().unwrap() = LoginStatus::LoggedIn;
    }

    async fn logout(&self) {
        self.record(SessionCall::Logout);
        *self.status.lock().unwrap() = LoginStatus::LoggedOut;
    }

    async fn clean_up(&self) {
        self.record(SessionCall::CleanUp);
        *self.status.lock().unwrap() = LoginStatus::LoggedOut;
    }

    async fn add_contact(&self, jid: &Jid, _nickname: Option<&str>, _groups: &[String]) {
        self.record(SessionCall::AddContact(jid.to_string()));
    }

    async fn remove_contact(&self, contact: &Contact) {
        self.record(SessionCall::RemoveContact(contact.legacy_id.clone()));
    }

    async fn update_contact(&self, contact: &Contact) {
        self.record(SessionCall::UpdateContact(contact.legacy_id.clone()));
    }

    async fn accept_add_contact(&self, jid: &Jid) {
        self.record(SessionCall::AcceptAddContact(jid.to_string()));
    }

    async fn send_message(&self, jid: &Jid, message: &str) -> SendOutcome {
        self.delay().await;
        self.record(SessionCall::Message(jid.to_string(), message.to_string()));
        SendOutcome::Delivered
    }

    async fn send_chat_state(&self, jid: &Jid, state: ChatState) -> SendOutcome {
        self.record(SessionCall::ChatState(jid.to_string(), state));
        SendOutcome::Delivered
    }

    async fn send_buzz_notification(&self, jid: &Jid, _message: Option<&str>) -> SendOutcome {
        self.record(SessionCall::Buzz(jid.to_string()));
        SendOutcome::Delivered
    }

    async fn update_legacy_avatar(&self, mime_type: &str, data: &[u8]) {
        self.record(SessionCall::Avatar(mime_type.to_string(), data.len()));
    }

    async fn update_status(&self, presence: PresenceType, status: Option<&str>) -> SendOutcome {
        self.record(SessionCall::UpdateStatus(presence, status.map(str::to_string)));
        SendOutcome::Delivered
    }

    async fn fetch_remote_resource(&self, url: &str) -> Option<Vec<u8>> {
        self.record(SessionCall::Fetch(url.to_string()));
        url.strip_prefix("data:").map(|rest| rest.as_bytes().to_vec())
    }
}

/// Backend handing out [`ScriptedSession`]s and keeping them for inspection.
pub struct ScriptedBackend {
    transport: TransportType,
    send_delay: Option<Duration>,
    sessions: Mutex<Vec<Arc<ScriptedSession>>>,
}

impl ScriptedBackend {
    pub fn new(transport: TransportType) -> Self {
        Self {
            transport,
            send_delay: None,
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = Some(delay);
        self
    }

    pub fn created(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn last(&self) -> Arc<ScriptedSession> {
        self.sessions.lock().unwrap().last().cloned().unwrap()
    }
}

impl SessionBackend for ScriptedBackend {
    fn transport(&self) -> TransportType {
        self.transport
    }

    fn create_session(
        &self,
        info: SessionInfo,
        _host: Arc<dyn SessionHost>,
        _settings: Arc<dyn SettingsService>,
    ) -> Arc<dyn TransportSession> {
        let session = Arc::new(ScriptedSession {
            info,
            send_delay: self.send_delay,
            calls: Mutex::new(Vec::new()),
            status: Mutex::new(LoginStatus::LoggedOut),
        });
        self.sessions.lock().unwrap().push(Arc::clone(&session));
        session
    }
}

/// Facebook client stand-in that accepts everything and keeps its listeners.
#[derive(Default)]
pub struct LoopbackAdapter {
    listeners: Mutex<Vec<Arc<dyn FacebookEventListener>>>,
    sent: Mutex<Vec<(String, String)>>,
}

impl LoopbackAdapter {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub async fn emit(&self, event: FacebookEvent) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener.on_event(event.clone()).await;
        }
    }
}

#[async_trait]
impl FacebookAdapter for LoopbackAdapter {
    async fn initialize(&self, _username: &str, _password: &str) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn set_visibility(&self, _visible: bool) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn set_status_message(&self, _status: &str) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn post_chat_message(&self, message: &str, recipient: &str) -> Result<(), FacebookError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.to_string()));
        Ok(())
    }

    async fn post_typing_notification(
        &self,
        _recipient: &str,
        _typing: TypingNotification,
    ) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn post_buddy_poke(&self, _recipient: &str) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), FacebookError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), FacebookError> {
        Ok(())
    }

    fn add_listener(&self, listener: Arc<dyn FacebookEventListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_listener(&self, listener: &Arc<dyn FacebookEventListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    async fn fetch_bytes(&self, _url: &str) -> Result<Option<Vec<u8>>, FacebookError> {
        Ok(None)
    }
}

pub fn registration(transport: TransportType) -> Registration {
    Registration {
        jid: "alice@example.org".parse().unwrap(),
        transport,
        username: "alice@mail.com".to_string(),
        password: "secret".to_string(),
        nickname: None,
    }
}

pub fn user() -> Jid {
    "alice@example.org/laptop".parse().unwrap()
}

pub fn contact(id: &str) -> Jid {
    Jid::from_legacy_id(id, GATEWAY_DOMAIN)
}
