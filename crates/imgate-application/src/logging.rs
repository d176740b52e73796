//! Process-wide tracing setup.

use imgate_core::error::{ImgateError, Result};
use tracing_subscriber::EnvFilter;

/// Builds the log filter: `RUST_LOG` when set and valid, else `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| ImgateError::config(format!("invalid log level '{}': {}", level, e)))
}

/// Installs a formatting subscriber for the process.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = env_filter(level)?;
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        assert!(init_tracing("info").is_ok());
        assert!(init_tracing("debug,facebook=trace").is_ok());
    }
}
