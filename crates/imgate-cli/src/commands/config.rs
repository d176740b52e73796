use anyhow::{Context, Result, bail};
use colored::Colorize;
use imgate_core::config::GatewayConfig;
use std::path::{Path, PathBuf};

use super::utils::{load_config, resolve_config_path};

pub fn check(path: Option<PathBuf>) -> Result<()> {
    let (path, config) = load_config(path)?;
    config
        .validate()
        .with_context(|| format!("{} is invalid", path.display()))?;

    println!("{} {}", "✔".green(), path.display());
    println!("  domain:     {}", config.gateway.domain);
    println!(
        "  transports: {}",
        if config.gateway.enabled_transports.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            config.gateway.enabled_transports.join(", ")
        }
    );
    println!("  log level:  {}", config.logging.level);
    Ok(())
}

pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = resolve_config_path(path)?;
    write_default(&path, force)?;
    println!("{} Wrote {}", "✔".green(), path.display());
    Ok(())
}

fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    GatewayConfig::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
