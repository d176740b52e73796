//! Callbacks a session makes into the host gateway.

use async_trait::async_trait;

use super::model::{ChatState, LoginStatus, PresenceType};
use crate::address::Jid;

/// The host framework as seen from a session.
///
/// `user` is always the owning user's address, so one host can serve every
/// session in the process.
#[async_trait]
pub trait SessionHost: Send + Sync {
    /// Resolves a host-side address to a legacy-network user id.
    fn convert_jid_to_id(&self, jid: &Jid) -> String {
        jid.legacy_id()
    }

    /// Maps a legacy-network user id to its host-side address.
    fn convert_id_to_jid(&self, id: &str) -> Jid;

    async fn set_login_status(&self, user: &Jid, status: LoginStatus);

    /// The session is gone and must not be reconnected automatically.
    async fn session_disconnected_no_reconnect(&self, user: &Jid, reason: Option<String>);

    async fn deliver_message(&self, user: &Jid, from: &Jid, body: &str);

    async fn deliver_chat_state(&self, user: &Jid, from: &Jid, state: ChatState);

    async fn deliver_buzz(&self, user: &Jid, from: &Jid);

    async fn update_contact_presence(
        &self,
        user: &Jid,
        contact: &Jid,
        presence: PresenceType,
        nickname: Option<&str>,
    );
}
