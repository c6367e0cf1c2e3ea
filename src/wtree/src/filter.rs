//! Anomaly filtering.
//!
//! Event vehicles (races, football cups, one-off tournament rewards) ship in
//! the catalog with recognizable id patterns but never appear in the research
//! UI. They are dropped before classification. A folder containing an
//! anomalous child is dropped whole: a partially emptied folder would corrupt
//! sibling ordering downstream.

use crate::config::DecomposeConfig;
use crate::document::{Catalog, Entry};
use crate::types::{Country, VehicleCategory};

pub const DEFAULT_ANOMALOUS_SUFFIXES: &[&str] =
    &["_race", "_football", "_yt_cup_2019", "_event", "_naval"];
pub const DEFAULT_ANOMALOUS_PREFIXES: &[&str] = &["ucav_"];

/// Why a top-level entry was removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalReason {
    /// The entry's own id matched the blacklist
    AnomalousId,
    /// A nested child matched, so the whole folder goes
    AnomalousChild { child_id: String },
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnomalousId => write!(f, "anomalous id"),
            Self::AnomalousChild { child_id } => write!(f, "anomalous child {child_id}"),
        }
    }
}

/// Audit record for one removed entry
#[derive(Debug, Clone)]
pub struct RemovedEntry {
    pub id: String,
    pub country: Country,
    pub category: VehicleCategory,
    pub reason: RemovalReason,
}

/// Drop blacklisted entries from every column, preserving survivor order.
pub fn apply(mut catalog: Catalog, config: &DecomposeConfig) -> (Catalog, Vec<RemovedEntry>) {
    let mut removed = Vec::new();
    for branch in &mut catalog.branches {
        let (country, category) = (branch.country, branch.category);
        for column in &mut branch.columns {
            column.entries.retain(|entry| match removal_reason(entry, config) {
                None => true,
                Some(reason) => {
                    log::debug!("{country}/{category}: filtered {} ({reason})", entry.id);
                    removed.push(RemovedEntry {
                        id: entry.id.clone(),
                        country,
                        category,
                        reason,
                    });
                    false
                }
            });
        }
    }
    (catalog, removed)
}

fn removal_reason(entry: &Entry, config: &DecomposeConfig) -> Option<RemovalReason> {
    if is_anomalous(&entry.id, config) {
        return Some(RemovalReason::AnomalousId);
    }
    entry
        .children()
        .iter()
        .find(|child| is_anomalous(&child.id, config))
        .map(|child| RemovalReason::AnomalousChild {
            child_id: child.id.clone(),
        })
}

fn is_anomalous(id: &str, config: &DecomposeConfig) -> bool {
    config.anomalous_suffixes.iter().any(|s| id.ends_with(s.as_str()))
        || config.anomalous_prefixes.iter().any(|p| id.starts_with(p.as_str()))
}
