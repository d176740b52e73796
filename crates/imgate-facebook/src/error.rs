//! Errors reported by the Facebook client library.

use imgate_core::ImgateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacebookError {
    /// Payload could not be encoded for the chat endpoint
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Network or HTTP failure talking to Facebook
    #[error("transport failure: {0}")]
    Transport(String),

    /// The client was used before `initialize` succeeded
    #[error("client not initialized")]
    NotInitialized,

    /// Credentials were rejected
    #[error("authentication failed: {0}")]
    Authentication(String),
}

impl From<FacebookError> for ImgateError {
    fn from(err: FacebookError) -> Self {
        ImgateError::legacy("Facebook", err.to_string())
    }
}
