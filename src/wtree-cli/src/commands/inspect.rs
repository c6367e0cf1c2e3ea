//! Catalog inspection command handler

use anyhow::Result;
use std::path::Path;

use crate::source;

/// Handle the inspect command.
///
/// Ingests the document and reports its shape without running the engine.
pub fn handle(input: Option<&Path>) -> Result<()> {
    let catalog = source::load_catalog(input)?;

    println!("Branches: {}", catalog.branches.len());
    for branch in &catalog.branches {
        let top_level: usize = branch.columns.iter().map(|c| c.entries.len()).sum();
        let nested: usize = branch
            .columns
            .iter()
            .flat_map(|c| &c.entries)
            .map(|e| e.children().len())
            .sum();

        println!(
            "  {}/{}: {} columns, {} entries ({} nested)",
            branch.country,
            branch.category,
            branch.columns.len(),
            top_level,
            nested
        );
    }

    Ok(())
}
