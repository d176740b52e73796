#![allow(dead_code)]

use async_trait::async_trait;
use imgate_core::session::{
    ChatState, LoginStatus, PresenceType, Registration, SessionHost, SessionInfo,
};
use imgate_core::settings::SettingsService;
use imgate_core::{Jid, TransportType};
use imgate_facebook::{
    FacebookAdapter, FacebookAdapterFactory, FacebookError, FacebookEvent, FacebookEventListener,
    FacebookSession, TypingNotification, UPDATE_STATUS_PROPERTY,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const GATEWAY_DOMAIN: &str = "facebook.example.org";
pub const USERNAME: &str = "alice@mail.com";

/// Calls observed by a [`RecordingAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    AddListener,
    Initialize(String),
    SetVisibility(bool),
    SetStatus(String),
    Message { to: String, body: String },
    Typing { to: String, typing: TypingNotification },
    Poke(String),
    Pause,
    Shutdown,
    RemoveListener,
    Fetch(String),
}

#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    pub fail_login: bool,
    pub fail_sends: bool,
    pub send_delay: Option<Duration>,
    pub shutdown_delay: Option<Duration>,
    pub fetch_response: Option<Vec<u8>>,
    pub fetch_error: bool,
    /// `shutdown` waits for in-flight callbacks to return, like a client
    /// that joins its notification task
    pub drain_on_shutdown: bool,
    /// Delivered from a notification task started by `pause`
    pub event_on_pause: Option<FacebookEvent>,
}

async fn deliver(
    listeners: Vec<Arc<dyn FacebookEventListener>>,
    event: FacebookEvent,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
) {
    in_flight.fetch_add(1, Ordering::SeqCst);
    for listener in listeners {
        listener.on_event(event.clone()).await;
    }
    in_flight.fetch_sub(1, Ordering::SeqCst);
    idle.notify_waiters();
}

pub struct RecordingAdapter {
    options: AdapterOptions,
    calls: Mutex<Vec<AdapterCall>>,
    listeners: Mutex<Vec<Arc<dyn FacebookEventListener>>>,
    shut_down: AtomicBool,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl RecordingAdapter {
    pub fn new(options: AdapterOptions) -> Self {
        Self {
            options,
            calls: Mutex::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
            in_flight: Arc::new(AtomicUsize::new(0)),
            idle: Arc::new(Notify::new()),
        }
    }

    fn record(&self, call: AdapterCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &AdapterCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn listeners(&self) -> Vec<Arc<dyn FacebookEventListener>> {
        self.listeners.lock().unwrap().clone()
    }

    /// Delivers `event` to every attached listener, the way the client's
    /// notification task would.
    pub async fn emit(&self, event: FacebookEvent) {
        deliver(
            self.listeners(),
            event,
            Arc::clone(&self.in_flight),
            Arc::clone(&self.idle),
        )
        .await;
    }

    async fn wait_for_callbacks(&self) {
        loop {
            let idle = self.idle.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            idle.await;
        }
    }

    async fn outbound(&self, call: AdapterCall) -> Result<(), FacebookError> {
        self.record(call);
        if let Some(delay) = self.options.send_delay {
            tokio::time::sleep(delay).await;
        }
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(FacebookError::NotInitialized);
        }
        if self.options.fail_sends {
            return Err(FacebookError::Encoding("bad payload".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl FacebookAdapter for RecordingAdapter {
    async fn initialize(&self, username: &str, _password: &str) -> Result<(), FacebookError> {
        self.record(AdapterCall::Initialize(username.to_string()));
        if self.options.fail_login {
            return Err(FacebookError::Authentication("bad password".into()));
        }
        Ok(())
    }

    async fn set_visibility(&self, visible: bool) -> Result<(), FacebookError> {
        self.record(AdapterCall::SetVisibility(visible));
        Ok(())
    }

    async fn set_status_message(&self, status: &str) -> Result<(), FacebookError> {
        self.outbound(AdapterCall::SetStatus(status.to_string())).await
    }

    async fn post_chat_message(&self, message: &str, recipient: &str) -> Result<(), FacebookError> {
        self.outbound(AdapterCall::Message {
            to: recipient.to_string(),
            body: message.to_string(),
        })
        .await
    }

    async fn post_typing_notification(
        &self,
        recipient: &str,
        typing: TypingNotification,
    ) -> Result<(), FacebookError> {
        self.outbound(AdapterCall::Typing {
            to: recipient.to_string(),
            typing,
        })
        .await
    }

    async fn post_buddy_poke(&self, recipient: &str) -> Result<(), FacebookError> {
        self.outbound(AdapterCall::Poke(recipient.to_string())).await
    }

    async fn pause(&self) -> Result<(), FacebookError> {
        self.record(AdapterCall::Pause);
        if let Some(event) = self.options.event_on_pause.clone() {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let listeners = self.listeners();
            let in_flight = Arc::clone(&self.in_flight);
            let idle = Arc::clone(&self.idle);
            tokio::spawn(async move {
                deliver(listeners, event, Arc::clone(&in_flight), Arc::clone(&idle)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                idle.notify_waiters();
            });
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), FacebookError> {
        if let Some(delay) = self.options.shutdown_delay {
            tokio::time::sleep(delay).await;
        }
        if self.options.drain_on_shutdown {
            self.wait_for_callbacks().await;
        }
        self.shut_down.store(true, Ordering::SeqCst);
        self.record(AdapterCall::Shutdown);
        Ok(())
    }

    fn add_listener(&self, listener: Arc<dyn FacebookEventListener>) {
        self.record(AdapterCall::AddListener);
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_listener(&self, listener: &Arc<dyn FacebookEventListener>) {
        self.record(AdapterCall::RemoveListener);
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| Arc::as_ptr(l) as *const () != target);
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, FacebookError> {
        self.record(AdapterCall::Fetch(url.to_string()));
        if self.options.fetch_error {
            return Err(FacebookError::Transport("HTTP 500".into()));
        }
        Ok(self.options.fetch_response.clone())
    }
}

/// Hands out recording adapters and keeps them for inspection.
#[derive(Default)]
pub struct RecordingFactory {
    options: AdapterOptions,
    created: Mutex<Vec<Arc<RecordingAdapter>>>,
}

impl RecordingFactory {
    pub fn new(options: AdapterOptions) -> Self {
        Self {
            options,
            created: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn last(&self) -> Arc<RecordingAdapter> {
        self.created
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no adapter created yet")
    }

    pub fn all(&self) -> Vec<Arc<RecordingAdapter>> {
        self.created.lock().unwrap().clone()
    }
}

impl FacebookAdapterFactory for RecordingFactory {
    fn create_adapter(&self) -> Arc<dyn FacebookAdapter> {
        let adapter = Arc::new(RecordingAdapter::new(self.options.clone()));
        self.created.lock().unwrap().push(Arc::clone(&adapter));
        adapter
    }
}

/// Calls observed by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    LoginStatus(LoginStatus),
    Disconnected(Option<String>),
    Message { from: String, body: String },
    ChatState { from: String, state: ChatState },
    Buzz(String),
    Presence { contact: String, presence: PresenceType, nickname: Option<String> },
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SessionHost for RecordingHost {
    fn convert_id_to_jid(&self, id: &str) -> Jid {
        Jid::from_legacy_id(id, GATEWAY_DOMAIN)
    }

    async fn set_login_status(&self, _user: &Jid, status: LoginStatus) {
        self.record(HostCall::LoginStatus(status));
    }

    async fn session_disconnected_no_reconnect(&self, _user: &Jid, reason: Option<String>) {
        self.record(HostCall::Disconnected(reason));
    }

    async fn deliver_message(&self, _user: &Jid, from: &Jid, body: &str) {
        self.record(HostCall::Message {
            from: from.to_string(),
            body: body.to_string(),
        });
    }

    async fn deliver_chat_state(&self, _user: &Jid, from: &Jid, state: ChatState) {
        self.record(HostCall::ChatState {
            from: from.to_string(),
            state,
        });
    }

    async fn deliver_buzz(&self, _user: &Jid, from: &Jid) {
        self.record(HostCall::Buzz(from.to_string()));
    }

    async fn update_contact_presence(
        &self,
        _user: &Jid,
        contact: &Jid,
        presence: PresenceType,
        nickname: Option<&str>,
    ) {
        self.record(HostCall::Presence {
            contact: contact.to_string(),
            presence,
            nickname: nickname.map(str::to_string),
        });
    }
}

/// Settings with only the status-publishing flag configured.
pub struct StatusFlag(pub bool);

impl SettingsService for StatusFlag {
    fn bool_property(&self, key: &str, default: bool) -> bool {
        if key == UPDATE_STATUS_PROPERTY {
            self.0
        } else {
            default
        }
    }
}

pub fn session_info() -> SessionInfo {
    let jid: Jid = "alice@example.org/laptop".parse().unwrap();
    let registration = Registration {
        jid: jid.to_bare(),
        transport: TransportType::Facebook,
        username: USERNAME.to_string(),
        password: "secret".to_string(),
        nickname: None,
    };
    SessionInfo::new(registration, jid, 5)
}

pub struct Fixture {
    pub session: Arc<FacebookSession>,
    pub factory: Arc<RecordingFactory>,
    pub host: Arc<RecordingHost>,
}

pub fn fixture(options: AdapterOptions, publish_status: bool) -> Fixture {
    let factory = Arc::new(RecordingFactory::new(options));
    let host = Arc::new(RecordingHost::default());
    let session = Arc::new(FacebookSession::new(
        session_info(),
        host.clone(),
        Arc::new(StatusFlag(publish_status)),
        factory.clone(),
    ));
    Fixture {
        session,
        factory,
        host,
    }
}

pub fn contact(id: &str) -> Jid {
    Jid::from_legacy_id(id, GATEWAY_DOMAIN)
}

/// Polls `condition` until it holds, failing the test after a second.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
