use anyhow::Result;
use std::path::Path;
use songguard_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load(config_path)?;

    // Secrets are never echoed
    if !config.sentiment.shared_key.is_empty() {
        config.sentiment.shared_key = "********".to_string();
    }
    config.backend.credentials = config
        .backend
        .credentials
        .iter()
        .map(|_| "********".to_string())
        .collect();

    println!("songguard configuration\n");
    println!("{}", config.to_toml()?);

    // Show config file locations
    println!("Config file locations (in priority order):");
    println!("  1. Environment variables (SONGGUARD_*, nested keys with __)");
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    if let Some(default_path) = Config::default_config_path() {
        let state = if default_path.exists() { "" } else { " (not present)" };
        println!("  3. {}{}", default_path.display(), state);
    }

    Ok(())
}
