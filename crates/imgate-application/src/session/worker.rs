//! Per-session dispatch.
//!
//! Every session gets two lanes, each a tokio task draining a bounded queue:
//!
//! - control: login, logout, status and roster calls, run strictly in order
//! - outbound: messages, chat states, buzzes and fetches, which may block on
//!   legacy-network I/O
//!
//! Keeping outbound traffic off the control lane lets a logout go through
//! while a slow send is still outstanding. No lane is ever shared between
//! sessions.

use imgate_core::error::{ImgateError, Result};
use imgate_core::session::{ChatState, Contact, PresenceType, TransportSession};
use imgate_core::Jid;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const LANE_CAPACITY: usize = 64;

enum ControlCommand {
    Login {
        presence: PresenceType,
        status: Option<String>,
    },
    Logout {
        ack: oneshot::Sender<()>,
    },
    UpdateStatus {
        presence: PresenceType,
        status: Option<String>,
    },
    AddContact {
        jid: Jid,
        nickname: Option<String>,
        groups: Vec<String>,
    },
    RemoveContact(Contact),
    UpdateContact(Contact),
    AcceptAddContact(Jid),
    UpdateAvatar {
        mime_type: String,
        data: Vec<u8>,
    },
}

enum OutboundCommand {
    Message {
        to: Jid,
        body: String,
    },
    ChatState {
        to: Jid,
        state: ChatState,
    },
    Buzz {
        to: Jid,
        message: Option<String>,
    },
    Fetch {
        url: String,
        reply: oneshot::Sender<Option<Vec<u8>>>,
    },
}

/// Cloneable handle that queues calls onto a session's lanes.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    session: Arc<dyn TransportSession>,
    control: mpsc::Sender<ControlCommand>,
    outbound: mpsc::Sender<OutboundCommand>,
    token: CancellationToken,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Join handles for both lanes of one session.
pub(crate) struct SessionWorker {
    control: JoinHandle<()>,
    outbound: JoinHandle<()>,
}

impl SessionWorker {
    /// Spawns both lanes for `session`. Must be called inside a tokio runtime.
    pub(crate) fn spawn(session: Arc<dyn TransportSession>) -> (SessionHandle, SessionWorker) {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        let (control_tx, control_rx) = mpsc::channel(LANE_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::channel(LANE_CAPACITY);

        let control = tokio::spawn(run_control_lane(
            Arc::clone(&session),
            control_rx,
            token.clone(),
        ));
        let outbound = tokio::spawn(run_outbound_lane(
            Arc::clone(&session),
            outbound_rx,
            token.clone(),
        ));

        let handle = SessionHandle {
            id,
            session,
            control: control_tx,
            outbound: outbound_tx,
            token,
        };
        (handle, SessionWorker { control, outbound })
    }

    /// Waits for both lanes to exit.
    pub(crate) async fn join(self) {
        if let Err(e) = self.control.await {
            tracing::error!("Control lane panicked: {}", e);
        }
        if let Err(e) = self.outbound.await {
            tracing::error!("Outbound lane panicked: {}", e);
        }
    }
}

async fn run_control_lane(
    session: Arc<dyn TransportSession>,
    mut rx: mpsc::Receiver<ControlCommand>,
    token: CancellationToken,
) {
    let user = session.info().jid.clone();
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            command = rx.recv() => match command {
                Some(command) => dispatch_control(session.as_ref(), command).await,
                None => break,
            },
        }
    }
    // Whatever happened to the queue, the legacy client must not outlive the worker.
    session.clean_up().await;
    tracing::debug!("Control lane for {} stopped", user);
}

async fn dispatch_control(session: &dyn TransportSession, command: ControlCommand) {
    match command {
        ControlCommand::Login { presence, status } => {
            session.login(presence, status.as_deref()).await;
        }
        ControlCommand::Logout { ack } => {
            session.logout().await;
            let _ = ack.send(());
        }
        ControlCommand::UpdateStatus { presence, status } => {
            let outcome = session.update_status(presence, status.as_deref()).await;
            tracing::debug!("update_status: {:?}", outcome);
        }
        ControlCommand::AddContact {
            jid,
            nickname,
            groups,
        } => session.add_contact(&jid, nickname.as_deref(), &groups).await,
        ControlCommand::RemoveContact(contact) => session.remove_contact(&contact).await,
        ControlCommand::UpdateContact(contact) => session.update_contact(&contact).await,
        ControlCommand::AcceptAddContact(jid) => session.accept_add_contact(&jid).await,
        ControlCommand::UpdateAvatar { mime_type, data } => {
            session.update_legacy_avatar(&mime_type, &data).await;
        }
    }
}

async fn run_outbound_lane(
    session: Arc<dyn TransportSession>,
    mut rx: mpsc::Receiver<OutboundCommand>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            command = rx.recv() => match command {
                Some(command) => dispatch_outbound(session.as_ref(), command).await,
                None => break,
            },
        }
    }
}

async fn dispatch_outbound(session: &dyn TransportSession, command: OutboundCommand) {
    match command {
        OutboundCommand::Message { to, body } => {
            let outcome = session.send_message(&to, &body).await;
            tracing::debug!(recipient = %to, "send_message: {:?}", outcome);
        }
        OutboundCommand::ChatState { to, state } => {
            let outcome = session.send_chat_state(&to, state).await;
            tracing::trace!(recipient = %to, "send_chat_state: {:?}", outcome);
        }
        OutboundCommand::Buzz { to, message } => {
            let outcome = session
                .send_buzz_notification(&to, message.as_deref())
                .await;
            tracing::debug!(recipient = %to, "send_buzz_notification: {:?}", outcome);
        }
        OutboundCommand::Fetch { url, reply } => {
            let bytes = session.fetch_remote_resource(&url).await;
            // caller may have given up waiting
            let _ = reply.send(bytes);
        }
    }
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> &Arc<dyn TransportSession> {
        &self.session
    }

    /// The connected user address of this session.
    pub fn user(&self) -> &Jid {
        &self.session.info().jid
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.control.is_closed()
    }

    fn closed(&self) -> ImgateError {
        ImgateError::SessionClosed(self.user().to_string())
    }

    async fn control(&self, command: ControlCommand) -> Result<()> {
        self.control.send(command).await.map_err(|_| self.closed())
    }

    async fn outbound(&self, command: OutboundCommand) -> Result<()> {
        self.outbound.send(command).await.map_err(|_| self.closed())
    }

    pub async fn login(&self, presence: PresenceType, status: Option<String>) -> Result<()> {
        self.control(ControlCommand::Login { presence, status }).await
    }

    /// Queues a logout and waits until the session has processed it.
    pub async fn logout(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.control(ControlCommand::Logout { ack }).await?;
        done.await.map_err(|_| self.closed())
    }

    pub async fn update_status(&self, presence: PresenceType, status: Option<String>) -> Result<()> {
        self.control(ControlCommand::UpdateStatus { presence, status })
            .await
    }

    pub async fn add_contact(
        &self,
        jid: Jid,
        nickname: Option<String>,
        groups: Vec<String>,
    ) -> Result<()> {
        self.control(ControlCommand::AddContact {
            jid,
            nickname,
            groups,
        })
        .await
    }

    pub async fn remove_contact(&self, contact: Contact) -> Result<()> {
        self.control(ControlCommand::RemoveContact(contact)).await
    }

    pub async fn update_contact(&self, contact: Contact) -> Result<()> {
        self.control(ControlCommand::UpdateContact(contact)).await
    }

    pub async fn accept_add_contact(&self, jid: Jid) -> Result<()> {
        self.control(ControlCommand::AcceptAddContact(jid)).await
    }

    pub async fn update_legacy_avatar(&self, mime_type: String, data: Vec<u8>) -> Result<()> {
        self.control(ControlCommand::UpdateAvatar { mime_type, data })
            .await
    }

    pub async fn send_message(&self, to: Jid, body: String) -> Result<()> {
        self.outbound(OutboundCommand::Message { to, body }).await
    }

    pub async fn send_chat_state(&self, to: Jid, state: ChatState) -> Result<()> {
        self.outbound(OutboundCommand::ChatState { to, state }).await
    }

    pub async fn send_buzz_notification(&self, to: Jid, message: Option<String>) -> Result<()> {
        self.outbound(OutboundCommand::Buzz { to, message }).await
    }

    /// Fetches a remote resource on the outbound lane and waits for it.
    pub async fn fetch_remote_resource(&self, url: String) -> Result<Option<Vec<u8>>> {
        let (reply, response) = oneshot::channel();
        self.outbound(OutboundCommand::Fetch { url, reply }).await?;
        response.await.map_err(|_| self.closed())
    }

    /// Stops both lanes. Queued commands are dropped; the control lane
    /// releases the legacy client on its way out.
    pub fn shutdown(&self) {
        self.token.cancel();
    }
}
