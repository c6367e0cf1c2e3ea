//! Repository trait for research tree storage.
//!
//! This trait defines the interface for all storage backends.

use crate::types::{DependencyRow, NodeFilter, NodeRow, StoreStats};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] wtree::ParseError),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for research tree storage operations
pub trait NodesRepository {
    /// Initialize the database schema
    fn init(&self) -> StoreResult<()>;

    /// Replace all stored nodes with a fresh decomposition.
    ///
    /// Dependency edges are derived from the rows' predecessors in the same
    /// transaction. Returns the number of nodes stored.
    fn replace_nodes(&self, rows: &[NodeRow]) -> StoreResult<usize>;

    /// Get one node by id
    fn get_node(&self, id: &str) -> StoreResult<Option<NodeRow>>;

    /// List nodes matching a filter, in insertion order
    fn list_nodes(&self, filter: &NodeFilter) -> StoreResult<Vec<NodeRow>>;

    /// All research dependency edges
    fn list_dependencies(&self) -> StoreResult<Vec<DependencyRow>>;

    /// Storage counts for status output
    fn stats(&self) -> StoreResult<StoreStats>;

    /// Delete every stored row. Returns the number of nodes removed.
    fn clear(&self) -> StoreResult<usize>;
}
