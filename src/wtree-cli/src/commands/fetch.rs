//! Catalog download command handler

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::source;

/// Handle the fetch command
pub fn handle(url: Option<String>, output: &Path) -> Result<()> {
    let config = Config::load()?;
    let Some(url) = url.or_else(|| config.get_source_url().map(str::to_string)) else {
        bail!("No source URL given. Pass --url or run `wtree configure --source-url <URL>`.");
    };

    let text = source::fetch_text(&url, &config.fallback_urls)?;
    std::fs::write(output, &text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved catalog to {} ({} bytes)", output.display(), text.len());
    Ok(())
}
