//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: login status, presence, chat state, credentials, contacts
//! - `outcome`: `SendOutcome` for best-effort outbound actions
//! - `contract`: the `TransportSession` trait every network variant implements
//! - `host`: the `SessionHost` callbacks a session makes into the gateway
//! - `backend`: `SessionBackend`, the per-network session constructor

mod backend;
mod contract;
mod host;
mod model;
mod outcome;

pub use backend::SessionBackend;
pub use contract::TransportSession;
pub use host::SessionHost;
pub use model::{
    ChatState, Contact, LoginStatus, PendingStatus, PresenceType, Registration, SessionInfo,
    SupportedFeature,
};
pub use outcome::{SendOutcome, SkipReason};
