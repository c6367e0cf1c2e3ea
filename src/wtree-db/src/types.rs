//! Shared types for research tree storage.
//!
//! Rows are kept stringly-typed at the storage boundary; the typed enums
//! from `wtree` parse back out on read where callers need them.

use wtree::Node;

/// Flat storage row for one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeRow {
    pub id: String,
    pub rank: i64,
    pub country: String,
    pub vehicle_category: String,
    pub kind: String,
    pub status: String,
    pub column_index: i64,
    pub row_index: i64,
    pub predecessor: Option<String>,
    pub parent_id: Option<String>,
    pub order_in_folder: Option<i64>,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        NodeRow {
            id: node.id.clone(),
            rank: i64::from(node.rank),
            country: node.country.to_string(),
            vehicle_category: node.vehicle_category.to_string(),
            kind: node.kind.to_string(),
            status: node.status.to_string(),
            column_index: node.column_index,
            row_index: node.row_index,
            predecessor: node.predecessor.clone(),
            parent_id: node.parent_id.clone(),
            order_in_folder: node.order_in_folder.map(i64::from),
        }
    }
}

/// One research dependency edge, derived from predecessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRow {
    pub node_id: String,
    pub prerequisite_id: String,
}

/// Filter for listing nodes; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub country: Option<String>,
    pub vehicle_category: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// Storage counts for status output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub nodes: usize,
    pub vehicles: usize,
    pub folders: usize,
    pub premium: usize,
    pub dependencies: usize,
}
