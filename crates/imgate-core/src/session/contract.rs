//! The contract every legacy-network session implements.

use async_trait::async_trait;

use super::model::{
    ChatState, Contact, LoginStatus, PendingStatus, PresenceType, SessionInfo, SupportedFeature,
};
use super::outcome::SendOutcome;
use crate::address::Jid;

/// One logged-in user's bridge to one legacy network.
///
/// The host dispatches lifecycle calls (`login`, `logout`, `clean_up`)
/// serially per session. Outbound actions may block on legacy-network I/O and
/// must not be driven from a task shared with other sessions.
///
/// Best-effort actions report a [`SendOutcome`]; failures are logged by the
/// implementation and never tear the session down.
#[async_trait]
pub trait TransportSession: Send + Sync {
    /// Construction parameters for this session.
    fn info(&self) -> &SessionInfo;

    /// Optional capabilities advertised to the host.
    fn supported_features(&self) -> &[SupportedFeature];

    async fn login_status(&self) -> LoginStatus;

    /// Presence recorded by the last `login`.
    async fn pending_status(&self) -> Option<PendingStatus>;

    /// Whether a legacy client is currently attached.
    async fn is_connected(&self) -> bool;

    /// Records the desired presence and connects if not already logged in.
    async fn login(&self, presence: PresenceType, status: Option<&str>);

    /// Goes offline, releases the legacy client and tells the host the
    /// session ended without reconnect. Safe when never logged in.
    async fn logout(&self);

    /// Releases the legacy client and its listener. Idempotent.
    async fn clean_up(&self);

    async fn add_contact(&self, jid: &Jid, nickname: Option<&str>, groups: &[String]);

    async fn remove_contact(&self, contact: &Contact);

    async fn update_contact(&self, contact: &Contact);

    /// Approves a subscription request from `jid`.
    async fn accept_add_contact(&self, jid: &Jid);

    async fn send_message(&self, jid: &Jid, message: &str) -> SendOutcome;

    async fn send_chat_state(&self, jid: &Jid, state: ChatState) -> SendOutcome;

    async fn send_buzz_notification(&self, jid: &Jid, message: Option<&str>) -> SendOutcome;

    async fn update_legacy_avatar(&self, mime_type: &str, data: &[u8]);

    async fn update_status(&self, presence: PresenceType, status: Option<&str>) -> SendOutcome;

    /// Fetches bytes (avatars, media) from a legacy-authenticated URL.
    ///
    /// `None` when the fetch yields nothing.
    async fn fetch_remote_resource(&self, url: &str) -> Option<Vec<u8>>;
}
