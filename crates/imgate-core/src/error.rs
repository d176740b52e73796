//! Error types for the imgate gateway.

use thiserror::Error;

/// A shared error type for the gateway session layer.
///
/// Best-effort session actions never surface these; they report a
/// [`SendOutcome`](crate::session::SendOutcome) instead. `ImgateError` is for
/// failures the caller has to act on, such as an unknown transport name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImgateError {
    /// Transport name outside the fixed registry
    #[error("Unknown transport: '{name}'")]
    UnknownTransport { name: String },

    /// Transport is registered but no session backend serves it
    #[error("No session backend for transport '{0}'")]
    UnsupportedTransport(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Malformed host-side address
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Failure reported by a legacy-network client library
    #[error("{network}: {message}")]
    Legacy { network: String, message: String },

    /// The session's dispatch worker is gone
    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl ImgateError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UnknownTransport error
    pub fn unknown_transport(name: impl Into<String>) -> Self {
        Self::UnknownTransport { name: name.into() }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an InvalidAddress error
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Legacy error tagged with the network it came from
    pub fn legacy(network: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Legacy {
            network: network.into(),
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an UnknownTransport error
    pub fn is_unknown_transport(&self) -> bool {
        matches!(self, Self::UnknownTransport { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ImgateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ImgateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ImgateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ImgateError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ImgateError>`.
pub type Result<T> = std::result::Result<T, ImgateError>;
