//! Application layer for imgate.
//!
//! Coordinates transport sessions on behalf of the gateway: picks the
//! session variant per registration, runs each session on its own worker
//! and relays session callbacks to the host side.

pub mod disco;
pub mod gateway;
pub mod host;
pub mod logging;
pub mod session;

pub use disco::{DiscoIdentity, DiscoService};
pub use gateway::Gateway;
pub use host::{ChannelHost, HostEvent};
pub use session::{SessionFactory, SessionHandle, SessionKey, SessionManager};
