//! Decomposition command handler

use anyhow::Result;
use std::path::Path;
use wtree::{decompose, Decomposition, NodeKind, NodeStatus};

use crate::export;
use crate::source;

/// Handle the parse command
pub fn handle(
    input: Option<&Path>,
    threshold: Option<f64>,
    keep_slaves: bool,
    nodes_out: &Path,
    images_out: &Path,
) -> Result<()> {
    let catalog = source::load_catalog(input)?;
    let config = super::engine_config(threshold, keep_slaves);
    let result = decompose(catalog, &config);

    export::write_nodes(nodes_out, &result.nodes)?;
    export::write_image_fields(images_out, &result.image_fields)?;

    print_summary(&result);
    println!("Node table:   {}", nodes_out.display());
    println!("Image fields: {}", images_out.display());
    Ok(())
}

fn print_summary(result: &Decomposition) {
    let folders = result
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Folder)
        .count();
    let premium = result
        .nodes
        .iter()
        .filter(|n| n.status == NodeStatus::Premium)
        .count();

    println!(
        "Decomposed {} nodes ({} folders, {} premium)",
        result.nodes.len(),
        folders,
        premium
    );
    println!("  Image fields:  {}", result.image_fields.len());
    if !result.report.filtered.is_empty() {
        println!("  Filtered:      {}", result.report.filtered.len());
    }
    if !result.report.duplicate_ids.is_empty() {
        println!("  Duplicate ids: {}", result.report.duplicate_ids.len());
    }
    if !result.report.dropped_edges.is_empty() {
        println!("  Dropped edges: {}", result.report.dropped_edges.len());
    }
}
