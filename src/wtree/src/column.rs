//! Column processing: the research chain state machine.
//!
//! A column's entry order is the only dependency signal in the catalog, so
//! processing is strictly sequential over entries in source order. Two
//! pieces of state thread through the walk:
//!
//! - `last_emitted`: the most recent top-level node (a folder counts as
//!   itself, never as its children),
//! - `pending_group`: set after a folder so the next top-level entry chains
//!   off the folder rather than off the folder's last child.
//!
//! Entries declaring the empty prerequisite marker are chain roots and
//! consume neither. Everything here is local state; nothing is shared
//! across columns, which is what allows branch-level parallelism.

use crate::alias::SlaveMap;
use crate::classify;
use crate::config::DecomposeConfig;
use crate::document::{Column, Entry, PrereqSignal};
use crate::types::{Country, Node, NodeKind, NodeStatus, VehicleCategory};

/// Immutable inputs shared by every entry of one column walk
#[derive(Clone, Copy)]
pub struct ColumnContext<'a> {
    pub country: Country,
    pub category: VehicleCategory,
    /// Position of this column in the branch's column list
    pub column_index: i64,
    pub slaves: &'a SlaveMap,
    pub config: &'a DecomposeConfig,
}

#[derive(Debug, Default)]
struct ChainState {
    last_emitted: Option<String>,
    pending_group: Option<String>,
}

impl ChainState {
    /// Default chain predecessor for a top-level entry.
    fn predecessor(&mut self, signal: PrereqSignal) -> Option<String> {
        match signal {
            PrereqSignal::NoPrerequisite => None,
            PrereqSignal::Inherit | PrereqSignal::Reserved => self
                .pending_group
                .take()
                .or_else(|| self.last_emitted.clone()),
        }
    }
}

/// Walk one column in source order and emit its nodes.
pub fn process_column(column: &Column, ctx: &ColumnContext) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut state = ChainState::default();
    for entry in &column.entries {
        if ctx.config.suppress_slaves() && ctx.slaves.is_slave(&entry.id) {
            log::debug!(
                "{}/{}: suppressing slave unit {}",
                ctx.country,
                ctx.category,
                entry.id
            );
            continue;
        }
        if classify::is_group(entry) {
            process_group(entry, ctx, &mut state, &mut nodes);
        } else {
            process_vehicle(entry, ctx, &mut state, &mut nodes);
        }
    }
    nodes
}

fn process_vehicle(entry: &Entry, ctx: &ColumnContext, state: &mut ChainState, nodes: &mut Vec<Node>) {
    let rank = entry.rank().unwrap_or(1);
    let predecessor = state.predecessor(entry.prereq);
    let (column_index, row_index) = placement_or_default(entry, ctx.column_index, rank);
    let id = entry.id.to_lowercase();
    state.last_emitted = Some(id.clone());
    nodes.push(Node {
        id,
        rank,
        country: ctx.country,
        vehicle_category: ctx.category,
        kind: NodeKind::Vehicle,
        status: NodeStatus::Standard,
        column_index,
        row_index,
        predecessor,
        parent_id: None,
        order_in_folder: None,
    });
}

fn process_group(entry: &Entry, ctx: &ColumnContext, state: &mut ChainState, nodes: &mut Vec<Node>) {
    // a folder's rank is its first child's rank, then its own, then 1
    let declared_rank = entry.rank().unwrap_or(1);
    let rank = entry
        .children()
        .first()
        .and_then(Entry::rank)
        .unwrap_or(declared_rank);

    let folder_id = entry.id.to_lowercase();
    let alias_target = ctx.slaves.alias_target(&folder_id).map(str::to_string);
    // children link to the hidden slave when the folder is an alias
    let link_id = alias_target.clone().unwrap_or_else(|| folder_id.clone());

    if alias_target.is_none() {
        let predecessor = state.predecessor(entry.prereq);
        let (column_index, row_index) = placement_or_default(entry, ctx.column_index, rank);
        nodes.push(Node {
            id: folder_id.clone(),
            rank,
            country: ctx.country,
            vehicle_category: ctx.category,
            kind: NodeKind::Folder,
            status: NodeStatus::Standard,
            column_index,
            row_index,
            predecessor,
            parent_id: None,
            order_in_folder: None,
        });
    } else {
        log::debug!(
            "{}/{}: folder {} aliases {link_id}, folder node suppressed",
            ctx.country,
            ctx.category,
            entry.id
        );
    }

    let mut order: u32 = 0;
    let mut prev_child: Option<String> = None;
    for child in entry.children() {
        if ctx.config.suppress_slaves() && ctx.slaves.is_slave(&child.id) {
            log::debug!(
                "{}/{}: suppressing slave unit {} in folder {}",
                ctx.country,
                ctx.category,
                child.id,
                entry.id
            );
            continue;
        }
        let child_rank = child.rank().unwrap_or(rank);
        let predecessor = match child.prereq {
            PrereqSignal::NoPrerequisite => None,
            PrereqSignal::Inherit | PrereqSignal::Reserved => {
                if order == 0 {
                    Some(link_id.clone())
                } else {
                    prev_child.clone()
                }
            }
        };
        let (column_index, row_index) =
            child_placement(child, entry, ctx.column_index, child_rank);
        let child_id = child.id.to_lowercase();
        nodes.push(Node {
            id: child_id.clone(),
            rank: child_rank,
            country: ctx.country,
            vehicle_category: ctx.category,
            kind: NodeKind::Vehicle,
            status: NodeStatus::Standard,
            column_index,
            row_index,
            predecessor,
            parent_id: Some(link_id.clone()),
            order_in_folder: Some(order),
        });
        prev_child = Some(child_id);
        order += 1;
    }

    // the next top-level entry chains off the folder, not its last child
    state.pending_group = if alias_target.is_none() {
        state.last_emitted = Some(folder_id.clone());
        Some(folder_id)
    } else {
        None
    };
}

fn placement_or_default(entry: &Entry, column_index: i64, rank: u32) -> (i64, i64) {
    entry
        .placement()
        .unwrap_or((column_index, i64::from(rank) - 1))
}

/// A child inherits its folder's explicit placement when it has none.
fn child_placement(child: &Entry, folder: &Entry, column_index: i64, rank: u32) -> (i64, i64) {
    child
        .placement()
        .or_else(|| folder.placement())
        .unwrap_or((column_index, i64::from(rank) - 1))
}
