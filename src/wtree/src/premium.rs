//! Premium column reflow.
//!
//! A column dominated by purchasable vehicles is presented outside the
//! research grid: no prerequisite chain, rows packed densely per rank, and
//! a column slot counted separately from standard columns. Rewriting runs
//! on nodes the column walk just produced, before they are published to the
//! run's output, so nothing downstream ever observes the intermediate
//! coordinates.

use std::collections::BTreeMap;

use crate::types::{Node, NodeStatus};

/// Accumulates one premium column's nodes until layout can be finalized.
#[derive(Debug, Default)]
pub struct PremiumColumn {
    nodes: Vec<Node>,
}

impl PremiumColumn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Final layout pass.
    ///
    /// Marks every node premium, strips research edges, and assigns
    /// `row_index` densely per rank in emission order. `premium_slot` is the
    /// column's position among the branch's premium columns.
    pub fn finalize(self, premium_slot: i64) -> Vec<Node> {
        let mut next_row: BTreeMap<u32, i64> = BTreeMap::new();
        let mut nodes = self.nodes;
        for node in &mut nodes {
            let row = next_row.entry(node.rank).or_insert(0);
            node.status = NodeStatus::Premium;
            node.predecessor = None;
            node.column_index = premium_slot;
            node.row_index = *row;
            *row += 1;
        }
        nodes
    }
}

impl From<Vec<Node>> for PremiumColumn {
    fn from(nodes: Vec<Node>) -> Self {
        PremiumColumn { nodes }
    }
}
