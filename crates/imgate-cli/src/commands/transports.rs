use anyhow::Result;
use colored::Colorize;
use imgate_core::TransportRegistry;

pub fn list(json: bool) -> Result<()> {
    let registry = TransportRegistry::global();

    if json {
        println!("{}", serde_json::to_string_pretty(registry.descriptors())?);
        return Ok(());
    }

    println!("{}", format!("{} transports", registry.len()).bold());
    for descriptor in registry.descriptors() {
        println!(
            "  {:<10} {:<10} {}",
            descriptor.name.green(),
            descriptor.disco_identity,
            descriptor.display_name.dimmed()
        );
    }
    Ok(())
}

pub fn show(name: &str) -> Result<()> {
    let descriptor = TransportRegistry::global().lookup(name)?;

    println!("{}", descriptor.display_name.bold());
    println!("  name:           {}", descriptor.name.green());
    println!("  disco identity: gateway/{}", descriptor.disco_identity);
    Ok(())
}
