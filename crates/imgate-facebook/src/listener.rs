//! Listener bridging adapter callbacks back into the owning session.

use async_trait::async_trait;
use std::sync::Weak;

use crate::adapter::{FacebookEvent, FacebookEventListener};
use crate::session::SessionInner;

/// Registered on exactly one adapter for exactly one login.
///
/// `generation` identifies the login; once the session detaches this listener
/// or logs in again, events carrying an old generation are dropped.
pub(crate) struct SessionListener {
    session: Weak<SessionInner>,
    generation: u64,
}

impl SessionListener {
    pub(crate) fn new(session: Weak<SessionInner>, generation: u64) -> Self {
        Self {
            session,
            generation,
        }
    }
}

#[async_trait]
impl FacebookEventListener for SessionListener {
    async fn on_event(&self, event: FacebookEvent) {
        match self.session.upgrade() {
            Some(session) => session.handle_event(self.generation, event).await,
            None => tracing::debug!(target: "facebook", "Session gone, dropping {:?}", event),
        }
    }
}
