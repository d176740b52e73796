use anyhow::{Context, Result};
use imgate_core::config::GatewayConfig;
use std::path::PathBuf;

/// Resolves an explicit `--path`/`--config` argument or the default location.
pub fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => GatewayConfig::default_path()
            .context("No config directory on this platform; pass --path"),
    }
}

/// Loads the config and installs logging at its configured level.
pub fn load_config(path: Option<PathBuf>) -> Result<(PathBuf, GatewayConfig)> {
    let path = resolve_config_path(path)?;
    let config = GatewayConfig::load_from_path(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    imgate_application::logging::init_tracing(&config.logging.level)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok((path, config))
}
