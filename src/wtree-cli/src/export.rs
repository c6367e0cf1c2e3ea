//! CSV output for decomposition results.
//!
//! Two tables come out of a decomposition run: the node table and the image
//! field table consumed by the icon resolver downstream.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use wtree::Node;
use wtree_db::NodeRow;

/// Header row for the node table
pub const NODE_HEADERS: [&str; 10] = [
    "id",
    "rank",
    "country",
    "vehicle_category",
    "kind",
    "status",
    "column_index",
    "row_index",
    "predecessor",
    "order_in_folder",
];

/// Write the node table
pub fn write_nodes(path: &Path, nodes: &[Node]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(NODE_HEADERS)?;
    for node in nodes {
        writer.write_record(&[
            node.id.clone(),
            node.rank.to_string(),
            node.country.to_string(),
            node.vehicle_category.to_string(),
            node.kind.to_string(),
            node.status.to_string(),
            node.column_index.to_string(),
            node.row_index.to_string(),
            node.predecessor.clone().unwrap_or_default(),
            node.order_in_folder
                .map(|o| o.to_string())
                .unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the image field table
pub fn write_image_fields(path: &Path, fields: &BTreeMap<String, String>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(["id", "image_field"])?;
    for (id, stem) in fields {
        writer.write_record([id.as_str(), stem.as_str()])?;
    }
    writer.flush()?;

    Ok(())
}

/// Read node rows back from a previously exported node table.
///
/// The exported table does not carry parent ids, so `parent_id` comes back
/// as `None` on every row.
pub fn read_node_rows(path: &Path) -> Result<Vec<NodeRow>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_from_record(&record)
            .with_context(|| format!("Malformed row {} in {}", index + 2, path.display()))?;
        rows.push(row);
    }

    Ok(rows)
}

fn row_from_record(record: &csv::StringRecord) -> Result<NodeRow> {
    let field = |i: usize| record.get(i).unwrap_or_default().to_string();
    let optional = |i: usize| {
        let value = field(i);
        (!value.is_empty()).then_some(value)
    };

    Ok(NodeRow {
        id: field(0),
        rank: field(1).parse().context("Invalid rank")?,
        country: field(2),
        vehicle_category: field(3),
        kind: field(4),
        status: field(5),
        column_index: field(6).parse().context("Invalid column_index")?,
        row_index: field(7).parse().context("Invalid row_index")?,
        predecessor: optional(8),
        parent_id: None,
        order_in_folder: optional(9)
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("Invalid order_in_folder")?,
    })
}
