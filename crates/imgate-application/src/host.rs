//! Channel-backed session host.
//!
//! Sessions call into the host from their own tasks; `ChannelHost` turns
//! every callback into a [`HostEvent`] on an unbounded channel so the gateway
//! front end can consume them in one place.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use imgate_core::Jid;
use imgate_core::session::{ChatState, LoginStatus, PresenceType, SessionHost};
use serde::Serialize;
use tokio::sync::mpsc;

/// Event emitted by a session towards the host side
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    LoginStatus {
        user: Jid,
        status: LoginStatus,
    },
    Disconnected {
        user: Jid,
        reason: Option<String>,
    },
    Message {
        user: Jid,
        from: Jid,
        body: String,
        received_at: DateTime<Utc>,
    },
    ChatState {
        user: Jid,
        from: Jid,
        state: ChatState,
    },
    Buzz {
        user: Jid,
        from: Jid,
    },
    ContactPresence {
        user: Jid,
        contact: Jid,
        presence: PresenceType,
        nickname: Option<String>,
    },
}

impl HostEvent {
    /// The user whose session produced the event.
    pub fn user(&self) -> &Jid {
        match self {
            HostEvent::LoginStatus { user, .. }
            | HostEvent::Disconnected { user, .. }
            | HostEvent::Message { user, .. }
            | HostEvent::ChatState { user, .. }
            | HostEvent::Buzz { user, .. }
            | HostEvent::ContactPresence { user, .. } => user,
        }
    }
}

/// A [`SessionHost`] that forwards every callback to a channel.
pub struct ChannelHost {
    domain: String,
    sender: mpsc::UnboundedSender<HostEvent>,
}

impl ChannelHost {
    /// Creates a host for contacts on `domain`, with the receiving end.
    pub fn new(domain: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let host = Self {
            domain: domain.into(),
            sender,
        };
        (host, receiver)
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn emit(&self, event: HostEvent) {
        // Ignore send errors (receiver may have been dropped)
        if self.sender.send(event).is_err() {
            tracing::trace!("Host event dropped, receiver closed");
        }
    }
}

#[async_trait]
impl SessionHost for ChannelHost {
    fn convert_id_to_jid(&self, id: &str) -> Jid {
        Jid::from_legacy_id(id, &self.domain)
    }

    async fn set_login_status(&self, user: &Jid, status: LoginStatus) {
        self.emit(HostEvent::LoginStatus {
            user: user.clone(),
            status,
        });
    }

    async fn session_disconnected_no_reconnect(&self, user: &Jid, reason: Option<String>) {
        self.emit(HostEvent::Disconnected {
            user: user.clone(),
            reason,
        });
    }

    async fn deliver_message(&self, user: &Jid, from: &Jid, body: &str) {
        self.emit(HostEvent::Message {
            user: user.clone(),
            from: from.clone(),
            body: body.to_string(),
            received_at: Utc::now(),
        });
    }

    async fn deliver_chat_state(&self, user: &Jid, from: &Jid, state: ChatState) {
        self.emit(HostEvent::ChatState {
            user: user.clone(),
            from: from.clone(),
            state,
        });
    }

    async fn deliver_buzz(&self, user: &Jid, from: &Jid) {
        self.emit(HostEvent::Buzz {
            user: user.clone(),
            from: from.clone(),
        });
    }

    async fn update_contact_presence(
        &self,
        user: &Jid,
        contact: &Jid,
        presence: PresenceType,
        nickname: Option<&str>,
    ) {
        self.emit(HostEvent::ContactPresence {
            user: user.clone(),
            contact: contact.clone(),
            presence,
            nickname: nickname.map(str::to_string),
        });
    }
}
