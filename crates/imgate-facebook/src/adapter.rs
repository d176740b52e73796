//! Contract of the Facebook chat client library.
//!
//! The session owns one adapter per login. The library delivers inbound
//! traffic on its own tasks through registered [`FacebookEventListener`]s.

use async_trait::async_trait;
use imgate_core::session::ChatState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::FacebookError;

/// Typing indicator sent to a buddy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingNotification {
    Started,
    Stopped,
}

impl From<ChatState> for TypingNotification {
    fn from(state: ChatState) -> Self {
        match state {
            ChatState::Composing => Self::Started,
            _ => Self::Stopped,
        }
    }
}

/// Inbound traffic from Facebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacebookEvent {
    MessageReceived {
        from: String,
        body: String,
    },
    TypingChanged {
        from: String,
        typing: bool,
    },
    PokeReceived {
        from: String,
    },
    BuddyPresence {
        id: String,
        #[serde(default)]
        name: Option<String>,
        online: bool,
        #[serde(default)]
        idle: bool,
    },
    /// The client lost its connection and will not recover on its own
    ConnectionLost {
        reason: String,
    },
}

/// Receives inbound events from one adapter.
#[async_trait]
pub trait FacebookEventListener: Send + Sync {
    async fn on_event(&self, event: FacebookEvent);
}

/// Handle to one Facebook chat client.
#[async_trait]
pub trait FacebookAdapter: Send + Sync {
    /// Authenticates and starts the client.
    async fn initialize(&self, username: &str, password: &str) -> Result<(), FacebookError>;

    async fn set_visibility(&self, visible: bool) -> Result<(), FacebookError>;

    /// Publishes a status update on the user's wall.
    async fn set_status_message(&self, status: &str) -> Result<(), FacebookError>;

    async fn post_chat_message(&self, message: &str, recipient: &str) -> Result<(), FacebookError>;

    async fn post_typing_notification(
        &self,
        recipient: &str,
        typing: TypingNotification,
    ) -> Result<(), FacebookError>;

    async fn post_buddy_poke(&self, recipient: &str) -> Result<(), FacebookError>;

    /// Suspends polling without dropping the login.
    async fn pause(&self) -> Result<(), FacebookError>;

    async fn shutdown(&self) -> Result<(), FacebookError>;

    fn add_listener(&self, listener: Arc<dyn FacebookEventListener>);

    fn remove_listener(&self, listener: &Arc<dyn FacebookEventListener>);

    /// Fetches `url` with the client's authenticated HTTP session.
    async fn fetch_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, FacebookError>;
}

/// Creates a fresh adapter for every login.
pub trait FacebookAdapterFactory: Send + Sync {
    fn create_adapter(&self) -> Arc<dyn FacebookAdapter>;
}

impl<F> FacebookAdapterFactory for F
where
    F: Fn() -> Arc<dyn FacebookAdapter> + Send + Sync,
{
    fn create_adapter(&self) -> Arc<dyn FacebookAdapter> {
        self()
    }
}
