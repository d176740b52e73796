//! Session domain model.

use serde::{Deserialize, Serialize};

use crate::address::Jid;
use crate::transport::TransportType;

/// Login state of one transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    #[default]
    LoggedOut,
    LoggingIn,
    LoggedIn,
    Disconnecting,
}

impl LoginStatus {
    pub fn is_logged_in(self) -> bool {
        self == Self::LoggedIn
    }
}

/// Presence as the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceType {
    #[default]
    Available,
    Chat,
    Away,
    /// Extended away
    Xa,
    /// Do not disturb
    Dnd,
    Unavailable,
    Unknown,
}

/// Chat state notifications (XEP-0085).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    Active,
    Composing,
    Paused,
    Inactive,
    Gone,
}

/// Optional capabilities a session variant may advertise to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedFeature {
    /// Buzz / poke / nudge
    Attention,
    ChatState,
    Avatars,
}

/// Presence and status text to apply once the session is connected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingStatus {
    pub presence: PresenceType,
    pub status: Option<String>,
}

/// Stored credentials for one user on one transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Host-side address of the owning user
    pub jid: Jid,
    pub transport: TransportType,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

// Keeps the password out of logs.
impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("jid", &self.jid)
            .field("transport", &self.transport)
            .field("username", &self.username)
            .field("nickname", &self.nickname)
            .finish_non_exhaustive()
    }
}

/// Session construction parameters supplied by the host.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub registration: Registration,
    /// The user's connected address (may carry a resource)
    pub jid: Jid,
    pub priority: i32,
}

impl SessionInfo {
    pub fn new(registration: Registration, jid: Jid, priority: i32) -> Self {
        Self {
            registration,
            jid,
            priority,
        }
    }

    pub fn transport(&self) -> TransportType {
        self.registration.transport
    }
}

/// A roster entry mirrored from the legacy network.
///
/// Sessions reference contacts; they never own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub jid: Jid,
    pub legacy_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}
