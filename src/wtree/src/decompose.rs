//! The decomposition pipeline.
//!
//! Order of operations is fixed: anomaly filtering, global slave-unit
//! resolution, then a per-branch walk of every column, and finally the
//! run-wide id dedup and edge validation passes. The alias map is frozen
//! before the first column is touched, so branch processing has no shared
//! mutable state and can run on a thread pool behind the `parallel`
//! feature. Output order is always document order: country, category,
//! column, entry.

use std::collections::{BTreeMap, HashSet};

use crate::alias::{self, SlaveMap};
use crate::classify;
use crate::column::{self, ColumnContext};
use crate::config::DecomposeConfig;
use crate::document::{Branch, Catalog};
use crate::filter::{self, RemovedEntry};
use crate::premium::PremiumColumn;
use crate::types::Node;

/// Everything one run produces
#[derive(Debug)]
pub struct Decomposition {
    /// Flat node list in emission order
    pub nodes: Vec<Node>,
    /// Fallback display-name sources for aliased and suppressed ids
    pub image_fields: BTreeMap<String, String>,
    pub report: DecomposeReport,
}

/// Audit trail for one run
#[derive(Debug, Default)]
pub struct DecomposeReport {
    /// Entries removed by the anomaly filter
    pub filtered: Vec<RemovedEntry>,
    /// Ids dropped because an earlier node already used them
    pub duplicate_ids: Vec<String>,
    /// `(node id, predecessor id)` edges dropped by validation
    pub dropped_edges: Vec<(String, String)>,
}

/// Decompose a catalog into flat classified nodes.
///
/// Never fails: malformed pieces of the document degrade to logged skips,
/// and the worst outcome for a node is a dropped edge, recorded in the
/// report.
pub fn decompose(catalog: Catalog, config: &DecomposeConfig) -> Decomposition {
    let (catalog, filtered) = filter::apply(catalog, config);
    let slaves = SlaveMap::build(&catalog);
    let image_fields = alias::collect_image_fields(&catalog, &slaves);

    let mut nodes: Vec<Node> = process_branches(&catalog, &slaves, config)
        .into_iter()
        .flatten()
        .collect();

    let duplicate_ids = drop_duplicate_ids(&mut nodes);
    let dropped_edges = validate_edges(&mut nodes);

    log::info!(
        "decomposed {} nodes ({} filtered, {} duplicate ids, {} dangling edges)",
        nodes.len(),
        filtered.len(),
        duplicate_ids.len(),
        dropped_edges.len()
    );

    Decomposition {
        nodes,
        image_fields,
        report: DecomposeReport {
            filtered,
            duplicate_ids,
            dropped_edges,
        },
    }
}

#[cfg(feature = "parallel")]
fn process_branches(catalog: &Catalog, slaves: &SlaveMap, config: &DecomposeConfig) -> Vec<Vec<Node>> {
    use rayon::prelude::*;
    catalog
        .branches
        .par_iter()
        .map(|branch| process_branch(branch, slaves, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn process_branches(catalog: &Catalog, slaves: &SlaveMap, config: &DecomposeConfig) -> Vec<Vec<Node>> {
    catalog
        .branches
        .iter()
        .map(|branch| process_branch(branch, slaves, config))
        .collect()
}

fn process_branch(branch: &Branch, slaves: &SlaveMap, config: &DecomposeConfig) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut premium_slots: i64 = 0;
    for (position, col) in branch.columns.iter().enumerate() {
        let share = classify::premium_share(col, slaves, config.suppress_slaves());
        let ctx = ColumnContext {
            country: branch.country,
            category: branch.category,
            column_index: position as i64,
            slaves,
            config,
        };
        let column_nodes = column::process_column(col, &ctx);
        if share >= config.premium_threshold {
            log::debug!(
                "{}/{} column {position}: premium share {share:.2}, reflowing to slot {premium_slots}",
                branch.country,
                branch.category
            );
            nodes.extend(PremiumColumn::from(column_nodes).finalize(premium_slots));
            premium_slots += 1;
        } else {
            nodes.extend(column_nodes);
        }
    }
    nodes
}

/// First occurrence of an id wins; later ones are dropped with a warning.
/// Ids are already lowercased, so this is the case-insensitive rule.
fn drop_duplicate_ids(nodes: &mut Vec<Node>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut duplicates = Vec::new();
    nodes.retain(|node| {
        if seen.insert(node.id.clone()) {
            true
        } else {
            log::warn!("duplicate node id {}, keeping first occurrence", node.id);
            duplicates.push(node.id.clone());
            false
        }
    });
    duplicates
}

/// Drop predecessor edges that do not point at an earlier node.
///
/// Covers dangling alias targets and any forward reference; what survives
/// satisfies the no-forward-reference rule, which also rules out cycles.
fn validate_edges(nodes: &mut [Node]) -> Vec<(String, String)> {
    let mut emitted: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut dangling = Vec::new();
    for node in nodes.iter() {
        if let Some(pred) = node.predecessor.as_deref() {
            if !emitted.contains(pred) {
                dangling.push((node.id.clone(), pred.to_string()));
            }
        }
        emitted.insert(node.id.as_str());
    }
    if !dangling.is_empty() {
        let broken: HashSet<&str> = dangling.iter().map(|(id, _)| id.as_str()).collect();
        for node in nodes.iter_mut() {
            if broken.contains(node.id.as_str()) {
                if let Some(pred) = node.predecessor.take() {
                    log::warn!(
                        "node {}: predecessor {pred} not emitted earlier, dropping edge",
                        node.id
                    );
                }
            }
        }
    }
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Country, NodeStatus, VehicleCategory};

    fn run(doc: &str) -> Decomposition {
        decompose(
            Catalog::from_json(doc).unwrap(),
            &DecomposeConfig::default(),
        )
    }

    fn ids(result: &Decomposition) -> Vec<&str> {
        result.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_walks_branches_in_document_order() {
        let result = run(
            r#"{
                "country_germany": {
                    "aviation": { "range": [ { "g_plane": { "rank": 1 } } ] }
                },
                "country_usa": {
                    "army": { "range": [ { "us_tank": { "rank": 1 } } ] },
                    "aviation": { "range": [ { "us_plane": { "rank": 1 } } ] }
                }
            }"#,
        );
        assert_eq!(ids(&result), vec!["g_plane", "us_tank", "us_plane"]);
        assert_eq!(result.nodes[0].country, Country::Germany);
        assert_eq!(result.nodes[2].vehicle_category, VehicleCategory::Aviation);
    }

    #[test]
    fn test_standard_columns_keep_their_positions() {
        let result = run(
            r#"{ "country_usa": { "army": { "range": [
                { "us_a": { "rank": 1 } },
                { "us_b": { "rank": 1 } }
            ] } } }"#,
        );
        assert_eq!(result.nodes[0].column_index, 0);
        assert_eq!(result.nodes[1].column_index, 1);
    }

    #[test]
    fn test_premium_column_reflowed() {
        let result = run(
            r#"{ "country_usa": { "army": { "range": [
                { "us_a": { "rank": 1 } },
                {
                    "us_gift": { "rank": 2, "gift": "x" },
                    "us_paid": { "rank": 2, "marketplaceItemdefId": 9 },
                    "us_plain": { "rank": 3 }
                }
            ] } } }"#,
        );
        let gift = result.nodes.iter().find(|n| n.id == "us_gift").unwrap();
        let paid = result.nodes.iter().find(|n| n.id == "us_paid").unwrap();
        let plain = result.nodes.iter().find(|n| n.id == "us_plain").unwrap();
        for node in [gift, paid, plain] {
            assert_eq!(node.status, NodeStatus::Premium);
            assert_eq!(node.predecessor, None);
            // first premium slot for usa/army
            assert_eq!(node.column_index, 0);
        }
        assert_eq!((gift.row_index, paid.row_index), (0, 1));
        assert_eq!(plain.row_index, 0);
        // the standard column is untouched
        assert_eq!(result.nodes[0].status, NodeStatus::Standard);
    }

    #[test]
    fn test_premium_slots_count_per_branch() {
        let result = run(
            r#"{ "country_usa": { "army": { "range": [
                { "us_g1": { "rank": 1, "gift": "a" } },
                { "us_plain": { "rank": 1 } },
                { "us_g2": { "rank": 1, "gift": "b" } }
            ] } } }"#,
        );
        let g1 = result.nodes.iter().find(|n| n.id == "us_g1").unwrap();
        let g2 = result.nodes.iter().find(|n| n.id == "us_g2").unwrap();
        assert_eq!(g1.column_index, 0);
        assert_eq!(g2.column_index, 1);
        let plain = result.nodes.iter().find(|n| n.id == "us_plain").unwrap();
        assert_eq!(plain.column_index, 1);
        assert_eq!(plain.status, NodeStatus::Standard);
    }

    #[test]
    fn test_threshold_is_met_or_exceeded() {
        let doc = r#"{ "country_usa": { "army": { "range": [ {
            "us_a": { "rank": 1 },
            "us_b": { "rank": 1 },
            "us_c": { "rank": 1 },
            "us_gift": { "rank": 1, "gift": "x" }
        } ] } } }"#;

        // 1 premium of 4 entries is under the default 0.3
        let result = run(doc);
        assert!(result
            .nodes
            .iter()
            .all(|n| n.status == NodeStatus::Standard));

        // threshold met exactly flips the column
        let config = DecomposeConfig {
            premium_threshold: 0.25,
            ..DecomposeConfig::default()
        };
        let result = decompose(Catalog::from_json(doc).unwrap(), &config);
        assert!(result.nodes.iter().all(|n| n.status == NodeStatus::Premium));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let result = run(
            r#"{
                "country_usa": {
                    "army": { "range": [ { "us_dup": { "rank": 1 } } ] },
                    "aviation": { "range": [ { "US_DUP": { "rank": 4 } } ] }
                }
            }"#,
        );
        assert_eq!(ids(&result), vec!["us_dup"]);
        assert_eq!(result.nodes[0].rank, 1);
        assert_eq!(result.report.duplicate_ids, vec!["us_dup"]);
    }

    #[test]
    fn test_dangling_alias_edge_dropped() {
        // folder aliases a unit that never appears in the document
        let result = run(
            r#"{ "country_usa": { "army": { "range": [ {
                "m_group": {
                    "rank": 1,
                    "slaveUnit": "ghost",
                    "m1": { "rank": 1 }
                }
            } ] } } }"#,
        );
        let m1 = result.nodes.iter().find(|n| n.id == "m1").unwrap();
        assert_eq!(m1.predecessor, None);
        assert_eq!(
            result.report.dropped_edges,
            vec![("m1".to_string(), "ghost".to_string())]
        );
        // parent linkage is a label, not an edge, and is preserved
        assert_eq!(m1.parent_id.as_deref(), Some("ghost"));
    }

    #[test]
    fn test_filter_feeds_report() {
        let result = run(
            r#"{ "country_usa": { "army": { "range": [ {
                "us_ok": { "rank": 1 },
                "us_gp_race": { "rank": 1 }
            } ] } } }"#,
        );
        assert_eq!(ids(&result), vec!["us_ok"]);
        assert_eq!(result.report.filtered.len(), 1);
        assert_eq!(result.report.filtered[0].id, "us_gp_race");
    }

    #[test]
    fn test_no_forward_references() {
        let result = run(
            r#"{ "country_usa": { "army": { "range": [
                {
                    "us_a": { "rank": 1, "reqAir": "" },
                    "us_pack_group": {
                        "rank": 1,
                        "us_p1": { "rank": 1 },
                        "us_p2": { "rank": 2 }
                    },
                    "us_b": { "rank": 2 }
                },
                { "us_c": { "rank": 1 } }
            ] } } }"#,
        );
        let mut seen = HashSet::new();
        for node in &result.nodes {
            if let Some(pred) = node.predecessor.as_deref() {
                assert!(seen.contains(pred), "{} references unseen {pred}", node.id);
            }
            seen.insert(node.id.as_str());
        }
        assert!(result.report.dropped_edges.is_empty());
    }

    #[test]
    fn test_idempotent_over_same_document() {
        let doc = r#"{
            "country_usa": {
                "army": { "range": [
                    {
                        "us_a": { "rank": 1 },
                        "us_pack_group": { "rank": 1, "us_p1": { "rank": 1 } }
                    },
                    { "us_gift": { "rank": 1, "gift": "x" } }
                ] }
            }
        }"#;
        let first = run(doc);
        let second = run(doc);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.image_fields, second.image_fields);
    }

    #[test]
    fn test_image_fields_exposed() {
        let result = run(
            r##"{ "country_usa": { "army": { "range": [ {
                "us_visible": {
                    "rank": 1,
                    "slaveUnit": "us_hidden",
                    "image": "#ui/unitshopitems#us_visible_icon"
                },
                "us_hidden": { "rank": 1 }
            } ] } } }"##,
        );
        assert_eq!(
            result.image_fields.get("us_hidden").map(String::as_str),
            Some("us_visible_icon")
        );
    }
}
