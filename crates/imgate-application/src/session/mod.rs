//! Session orchestration for the gateway.
//!
//! - `factory`: picks the backend for a registration's transport
//! - `worker`: per-session control and outbound lanes
//! - `manager`: owns live sessions keyed by user and transport

mod factory;
mod manager;
mod worker;

pub use factory::SessionFactory;
pub use manager::{SessionKey, SessionManager};
pub use worker::SessionHandle;
