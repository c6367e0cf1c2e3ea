//! Node store command handlers

use anyhow::Result;
use std::path::Path;
use wtree_db::{NodeRow, NodesRepository, SqliteStore};

use crate::export;
use crate::source;

/// Handle `db init`
pub fn init(db: &Path) -> Result<()> {
    if let Some(parent) = db.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(db)?;
    store.init()?;
    println!("Your node store is ready at {}", db.display());
    Ok(())
}

/// Handle `db load`
pub fn load(
    db: &Path,
    input: Option<&Path>,
    from_csv: Option<&Path>,
    threshold: Option<f64>,
    keep_slaves: bool,
) -> Result<()> {
    if let Some(parent) = db.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(db)?;
    store.init()?;

    let rows: Vec<NodeRow> = if let Some(csv_path) = from_csv {
        export::read_node_rows(csv_path)?
    } else {
        let catalog = source::load_catalog(input)?;
        let config = super::engine_config(threshold, keep_slaves);
        let result = wtree::decompose(catalog, &config);
        result.nodes.iter().map(NodeRow::from).collect()
    };

    let stored = store.replace_nodes(&rows)?;
    println!("Stored {} nodes in {}", stored, db.display());
    Ok(())
}

/// Handle `db stats`
pub fn stats(db: &Path) -> Result<()> {
    let store = SqliteStore::open(db)?;
    store.init()?;
    let stats = store.stats()?;
    println!("Node Store Statistics");
    println!("  Nodes:        {}", stats.nodes);
    println!("  Vehicles:     {}", stats.vehicles);
    println!("  Folders:      {}", stats.folders);
    println!("  Premium:      {}", stats.premium);
    println!("  Dependencies: {}", stats.dependencies);
    Ok(())
}

/// Handle `db clear`
pub fn clear(db: &Path) -> Result<()> {
    let store = SqliteStore::open(db)?;
    store.init()?;
    let removed = store.clear()?;
    println!("Removed {} nodes", removed);
    Ok(())
}
