//! Node store command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum DbCommand {
    /// Initialize the node store
    Init,

    /// Decompose a catalog and replace the store contents
    Load {
        /// Path to catalog JSON (fetches from the configured URL if omitted)
        input: Option<PathBuf>,

        /// Load rows from a previously exported node table instead
        #[arg(long, conflicts_with = "input")]
        from_csv: Option<PathBuf>,

        /// Premium share threshold for column reflow
        #[arg(long)]
        threshold: Option<f64>,

        /// Emit slave-unit entries instead of suppressing them
        #[arg(long)]
        keep_slaves: bool,
    },

    /// Show store statistics
    Stats,

    /// Delete every stored node
    Clear,
}
