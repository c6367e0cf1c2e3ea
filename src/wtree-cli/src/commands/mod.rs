//! Command handlers for the wtree CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod db;
pub mod fetch;
pub mod inspect;
pub mod parse;

use wtree::DecomposeConfig;

/// Apply CLI overrides on top of the default engine config
pub(crate) fn engine_config(threshold: Option<f64>, keep_slaves: bool) -> DecomposeConfig {
    let mut config = DecomposeConfig::default();
    if let Some(threshold) = threshold {
        config.premium_threshold = threshold;
    }
    if keep_slaves {
        config.process_slave_units = true;
    }
    config
}
