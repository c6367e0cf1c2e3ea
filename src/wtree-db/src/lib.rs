//! Research Tree Storage Library for War Thunder
//!
//! This library provides a trait-based abstraction for persisting decomposed
//! research tree nodes, with a synchronous SQLite implementation backing the
//! CLI tool.
//!
//! # Example
//!
//! ```no_run
//! use wtree_db::{NodeFilter, NodesRepository, SqliteStore};
//!
//! let store = SqliteStore::open("wtree.db").unwrap();
//! store.init().unwrap();
//!
//! // List all stored nodes
//! let nodes = store.list_nodes(&NodeFilter::default()).unwrap();
//! ```

pub mod repository;
pub mod sqlite;
pub mod types;

// Re-export types
pub use types::*;

// Re-export repository trait
pub use repository::{NodesRepository, StoreError, StoreResult};

// Re-export implementation
pub use sqlite::{SqliteStore, DEFAULT_DB_PATH};
