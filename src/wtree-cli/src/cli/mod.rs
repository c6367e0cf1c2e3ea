//! CLI argument definitions for wtree
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod db;

pub use core::{Cli, Commands};
pub use db::DbCommand;
