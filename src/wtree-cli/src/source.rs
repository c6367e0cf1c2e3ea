//! Catalog acquisition from local files or remote mirrors.

use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::path::Path;
use wtree::Catalog;

use crate::config::Config;

/// Fetch the raw catalog text from a URL, trying fallbacks in order
pub fn fetch_text(primary: &str, fallbacks: &[String]) -> Result<String> {
    let mut last_err = None;

    for url in std::iter::once(primary).chain(fallbacks.iter().map(String::as_str)) {
        info!("Fetching catalog from {}", url);
        match ureq::get(url).call() {
            Ok(resp) => {
                return resp
                    .into_string()
                    .with_context(|| format!("Failed to read response body from {}", url));
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) => Err(e).context("All catalog mirrors failed"),
        None => bail!("No catalog URL to fetch"),
    }
}

/// Load a catalog from a local path, or from the configured source when absent
pub fn load_catalog(input: Option<&Path>) -> Result<Catalog> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?,
        None => {
            let config = Config::load()?;
            let Some(url) = config.get_source_url().map(str::to_string) else {
                bail!(
                    "No input file given and no source URL configured. \
                     Run `wtree configure --source-url <URL>` first."
                );
            };
            fetch_text(&url, &config.fallback_urls)?
        }
    };

    Catalog::from_json(&text).context("Failed to parse catalog document")
}
