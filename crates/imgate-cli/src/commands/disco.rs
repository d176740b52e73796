use anyhow::Result;
use colored::Colorize;
use imgate_application::DiscoService;
use std::path::PathBuf;

use super::utils::load_config;

pub fn run(config: Option<PathBuf>, json: bool) -> Result<()> {
    let (path, config) = load_config(config)?;
    let disco = DiscoService::from_config(&config)?;
    let identities = disco.identities();

    if json {
        println!("{}", serde_json::to_string_pretty(&identities)?);
        return Ok(());
    }

    if identities.is_empty() {
        println!(
            "{}",
            format!("No transports enabled in {}", path.display()).yellow()
        );
        return Ok(());
    }
    println!("{}", format!("Identities for {}", config.gateway.domain).bold());
    for identity in identities {
        println!(
            "  {}/{}  {}",
            identity.category,
            identity.identity_type.green(),
            identity.name
        );
    }
    Ok(())
}
