pub mod address;
pub mod config;
pub mod error;
pub mod session;
pub mod settings;
pub mod transport;

// Re-export common types
pub use address::Jid;
pub use error::{ImgateError, Result};
pub use transport::{TransportDescriptor, TransportRegistry, TransportType};
