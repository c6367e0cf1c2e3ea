//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up wtree CLI defaults.

use crate::config::Config;
use anyhow::Result;

/// Handle the configure command
///
/// # Arguments
/// * `source_url` - Optional catalog URL to set as default
/// * `fallback_urls` - Mirror URLs to append to the fallback list
/// * `show` - If true, show current configuration
pub fn handle(source_url: Option<String>, fallback_urls: Vec<String>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config)?;
        return Ok(());
    }

    if source_url.is_none() && fallback_urls.is_empty() {
        show_usage();
        return Ok(());
    }

    if let Some(url) = source_url {
        config.source_url = Some(url);
    }
    for url in fallback_urls {
        if !config.fallback_urls.contains(&url) {
            config.fallback_urls.push(url);
        }
    }
    config.save()?;

    show_config(&config)?;
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    match config.get_source_url() {
        Some(url) => println!("Source URL: {}", url),
        None => println!("No source URL configured"),
    }
    for url in &config.fallback_urls {
        println!("Fallback:   {}", url);
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: wtree configure --source-url URL");
    println!("   or: wtree configure --fallback-url URL");
    println!("   or: wtree configure --show");
    println!();
    println!("Note: the catalog document moves between mirrors from time to time.");
    println!("      Fallback URLs are tried in order when the primary fails.");
}
