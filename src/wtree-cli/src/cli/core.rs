//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::db::DbCommand;

#[derive(Parser)]
#[command(name = "wtree")]
#[command(about = "War Thunder research tree decomposer", long_about = None)]
pub struct Cli {
    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the catalog document to a local file
    #[command(visible_alias = "f")]
    Fetch {
        /// Source URL (uses configured default if not provided)
        #[arg(long)]
        url: Option<String>,

        /// Output path
        #[arg(short, long, default_value = "shop.blkx")]
        output: PathBuf,
    },

    /// Decompose a catalog into flat nodes and write the CSV outputs
    #[command(visible_alias = "p")]
    Parse {
        /// Path to catalog JSON (fetches from the configured URL if omitted)
        input: Option<PathBuf>,

        /// Premium share threshold for column reflow
        #[arg(long)]
        threshold: Option<f64>,

        /// Emit slave-unit entries instead of suppressing them
        #[arg(long)]
        keep_slaves: bool,

        /// Node table output path
        #[arg(long, default_value = "nodes.csv")]
        nodes: PathBuf,

        /// Image field table output path
        #[arg(long, default_value = "image_fields.csv")]
        images: PathBuf,
    },

    /// Ingest a catalog and report its shape without decomposing
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to catalog JSON (fetches from the configured URL if omitted)
        input: Option<PathBuf>,
    },

    /// Manage the node store
    Db {
        /// Path to database file (can also set WTREE_DB env var)
        #[arg(short, long, env = "WTREE_DB", default_value = wtree_db::DEFAULT_DB_PATH)]
        db: PathBuf,

        #[command(subcommand)]
        command: DbCommand,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the catalog source URL
        #[arg(long)]
        source_url: Option<String>,

        /// Add a fallback URL (repeatable)
        #[arg(long)]
        fallback_url: Vec<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
