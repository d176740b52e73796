//! Facebook chat session for the imgate gateway.
//!
//! The chat client itself lives behind [`FacebookAdapter`]; this crate maps
//! the gateway's session contract onto it and feeds inbound events back to
//! the host.

pub mod adapter;
pub mod backend;
pub mod error;
mod listener;
pub mod session;

pub use adapter::{
    FacebookAdapter, FacebookAdapterFactory, FacebookEvent, FacebookEventListener,
    TypingNotification,
};
pub use backend::FacebookBackend;
pub use error::FacebookError;
pub use session::{FacebookSession, UPDATE_STATUS_PROPERTY};
