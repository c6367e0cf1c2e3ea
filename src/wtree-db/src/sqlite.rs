//! SQLite implementation using rusqlite (synchronous).
//!
//! This implementation is used by the CLI tool.

use crate::repository::*;
use crate::types::*;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/wtree.db";

/// Comma-separated column list for SELECT queries.
/// Order must match the positional indices in `row_to_node`.
pub const NODE_SELECT_COLUMNS: &str = "id, rank, country, vehicle_category, kind, status,
                    column_index, row_index, predecessor, parent_id, order_in_folder";

/// SQLite-backed research tree store
pub struct SqliteStore {
    conn: Connection,
}

fn row_to_node(row: &rusqlite::Row<'_>) -> rusqlite::Result<NodeRow> {
    Ok(NodeRow {
        id: row.get(0)?,
        rank: row.get(1)?,
        country: row.get(2)?,
        vehicle_category: row.get(3)?,
        kind: row.get(4)?,
        status: row
            .get::<_, Option<String>>(5)?
            .unwrap_or_else(|| "standard".to_string()),
        column_index: row.get(6)?,
        row_index: row.get(7)?,
        predecessor: row.get(8)?,
        parent_id: row.get(9)?,
        order_in_folder: row.get(10)?,
    })
}

/// Build a list query with optional filters.
///
/// The caller binds parameters in the same order `build_filter_params`
/// produces them.
fn build_list_query(filter: &NodeFilter) -> String {
    let mut sql = format!("SELECT {} FROM nodes WHERE 1=1", NODE_SELECT_COLUMNS);
    if filter.country.is_some() {
        sql.push_str(" AND country = ?");
    }
    if filter.vehicle_category.is_some() {
        sql.push_str(" AND vehicle_category = ?");
    }
    if filter.kind.is_some() {
        sql.push_str(" AND kind = ?");
    }
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    // rowid preserves insertion order, which downstream consumers rely on
    sql.push_str(" ORDER BY rowid");
    sql
}

/// Build parameter vector from filter for rusqlite queries
fn build_filter_params(filter: &NodeFilter) -> Vec<Box<dyn rusqlite::ToSql>> {
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if let Some(c) = &filter.country {
        params.push(Box::new(c.clone()));
    }
    if let Some(v) = &filter.vehicle_category {
        params.push(Box::new(v.clone()));
    }
    if let Some(k) = &filter.kind {
        params.push(Box::new(k.clone()));
    }
    if let Some(s) = &filter.status {
        params.push(Box::new(s.clone()));
    }
    params
}

impl SqliteStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Check if a migration has been applied
    fn is_migration_applied(&self, version: &str) -> StoreResult<bool> {
        let result: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(result.is_some())
    }

    /// Mark a migration as applied
    fn mark_migration_applied(&self, version: &str) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                params![version],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// Run pending migrations
    fn run_migrations(&self) -> StoreResult<()> {
        // Migration 0001: Base schema (nodes, node_dependencies)
        if !self.is_migration_applied("0001_base_schema")? {
            self.conn
                .execute_batch(
                    r#"
                CREATE TABLE IF NOT EXISTS nodes (
                    id TEXT PRIMARY KEY NOT NULL,
                    rank INTEGER NOT NULL,
                    country TEXT NOT NULL,
                    vehicle_category TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    status TEXT DEFAULT 'standard',
                    column_index INTEGER NOT NULL,
                    row_index INTEGER NOT NULL,
                    predecessor TEXT,
                    parent_id TEXT,
                    order_in_folder INTEGER
                );

                CREATE TABLE IF NOT EXISTS node_dependencies (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    node_id TEXT NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
                    prerequisite_id TEXT NOT NULL REFERENCES nodes(id) ON DELETE CASCADE,
                    UNIQUE(node_id, prerequisite_id)
                );
                "#,
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;

            self.mark_migration_applied("0001_base_schema")?;
            debug!("SQLite: applied migration 0001_base_schema");
        }

        // Create indexes AFTER all migrations
        self.conn
            .execute_batch(
                r#"
                CREATE INDEX IF NOT EXISTS idx_nodes_branch ON nodes(country, vehicle_category);
                CREATE INDEX IF NOT EXISTS idx_nodes_status ON nodes(status);
                CREATE INDEX IF NOT EXISTS idx_node_dependencies_node ON node_dependencies(node_id);
                "#,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

impl NodesRepository for SqliteStore {
    fn init(&self) -> StoreResult<()> {
        // Create schema_migrations table first
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version TEXT PRIMARY KEY NOT NULL,
                    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // Run incremental migrations
        self.run_migrations()?;

        Ok(())
    }

    fn replace_nodes(&self, rows: &[NodeRow]) -> StoreResult<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.execute("DELETE FROM node_dependencies", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.execute("DELETE FROM nodes", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO nodes (id, rank, country, vehicle_category, kind, status,
                        column_index, row_index, predecessor, parent_id, order_in_folder)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;
            for row in rows {
                stmt.execute(params![
                    row.id,
                    row.rank,
                    row.country,
                    row.vehicle_category,
                    row.kind,
                    row.status,
                    row.column_index,
                    row.row_index,
                    row.predecessor,
                    row.parent_id,
                    row.order_in_folder,
                ])
                .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        // Derive dependency edges from predecessors. Only edges whose target
        // actually exists in this batch are recorded.
        {
            let ids: std::collections::HashSet<&str> =
                rows.iter().map(|r| r.id.as_str()).collect();
            let mut stmt = tx
                .prepare(
                    "INSERT OR IGNORE INTO node_dependencies (node_id, prerequisite_id)
                     VALUES (?1, ?2)",
                )
                .map_err(|e| StoreError::Database(e.to_string()))?;
            for row in rows {
                if let Some(prereq) = &row.predecessor {
                    if ids.contains(prereq.as_str()) {
                        stmt.execute(params![row.id, prereq])
                            .map_err(|e| StoreError::Database(e.to_string()))?;
                    }
                }
            }
        }

        tx.commit().map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(rows.len())
    }

    fn get_node(&self, id: &str) -> StoreResult<Option<NodeRow>> {
        let sql = format!("SELECT {} FROM nodes WHERE id = ?1", NODE_SELECT_COLUMNS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let node = stmt
            .query_row(params![id], row_to_node)
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(node)
    }

    fn list_nodes(&self, filter: &NodeFilter) -> StoreResult<Vec<NodeRow>> {
        let sql = build_list_query(filter);
        let params_vec = build_filter_params(filter);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        let nodes = stmt
            .query_map(params_refs.as_slice(), row_to_node)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(nodes)
    }

    fn list_dependencies(&self) -> StoreResult<Vec<DependencyRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT node_id, prerequisite_id FROM node_dependencies ORDER BY id")
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let edges = stmt
            .query_map([], |row| {
                Ok(DependencyRow {
                    node_id: row.get(0)?,
                    prerequisite_id: row.get(1)?,
                })
            })
            .map_err(|e| StoreError::Database(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(edges)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let count = |sql: &str| -> StoreResult<usize> {
            let n: i64 = self
                .conn
                .query_row(sql, [], |row| row.get(0))
                .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };

        Ok(StoreStats {
            nodes: count("SELECT COUNT(*) FROM nodes")?,
            vehicles: count("SELECT COUNT(*) FROM nodes WHERE kind = 'vehicle'")?,
            folders: count("SELECT COUNT(*) FROM nodes WHERE kind = 'folder'")?,
            premium: count("SELECT COUNT(*) FROM nodes WHERE status = 'premium'")?,
            dependencies: count("SELECT COUNT(*) FROM node_dependencies")?,
        })
    }

    fn clear(&self) -> StoreResult<usize> {
        self.conn
            .execute("DELETE FROM node_dependencies", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let rows = self
            .conn
            .execute("DELETE FROM nodes", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
    }

    fn sample_row(id: &str) -> NodeRow {
        NodeRow {
            id: id.to_string(),
            rank: 1,
            country: "usa".to_string(),
            vehicle_category: "army".to_string(),
            kind: "vehicle".to_string(),
            status: "standard".to_string(),
            column_index: 0,
            row_index: 0,
            predecessor: None,
            parent_id: None,
            order_in_folder: None,
        }
    }

    #[test]
    fn test_init_creates_tables() {
        let store = setup_store();
        // Should be able to query the tables
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_init_is_idempotent() {
        let store = setup_store();
        store.init().unwrap();
        store.init().unwrap();
    }

    #[test]
    fn test_replace_and_get_node() {
        let store = setup_store();

        let stored = store.replace_nodes(&[sample_row("us_m2a2")]).unwrap();
        assert_eq!(stored, 1);

        let node = store.get_node("us_m2a2").unwrap().unwrap();
        assert_eq!(node.id, "us_m2a2");
        assert_eq!(node.country, "usa");
        assert_eq!(node.rank, 1);
        assert!(store.get_node("us_m3_stuart").unwrap().is_none());
    }

    #[test]
    fn test_replace_derives_dependencies() {
        let store = setup_store();

        let mut second = sample_row("us_m3_stuart");
        second.predecessor = Some("us_m2a2".to_string());
        store
            .replace_nodes(&[sample_row("us_m2a2"), second])
            .unwrap();

        let edges = store.list_dependencies().unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].node_id, "us_m3_stuart");
        assert_eq!(edges[0].prerequisite_id, "us_m2a2");
    }

    #[test]
    fn test_replace_skips_dangling_predecessor() {
        let store = setup_store();

        let mut row = sample_row("us_m3_stuart");
        row.predecessor = Some("us_never_stored".to_string());
        store.replace_nodes(&[row]).unwrap();

        // The predecessor label survives on the node, the edge does not
        let node = store.get_node("us_m3_stuart").unwrap().unwrap();
        assert_eq!(node.predecessor, Some("us_never_stored".to_string()));
        assert!(store.list_dependencies().unwrap().is_empty());
    }

    #[test]
    fn test_replace_drops_previous_contents() {
        let store = setup_store();

        store.replace_nodes(&[sample_row("us_m2a2")]).unwrap();
        store.replace_nodes(&[sample_row("us_m3_stuart")]).unwrap();

        assert!(store.get_node("us_m2a2").unwrap().is_none());
        assert!(store.get_node("us_m3_stuart").unwrap().is_some());
    }

    #[test]
    fn test_list_nodes_preserves_insertion_order() {
        let store = setup_store();

        store
            .replace_nodes(&[
                sample_row("us_m2a2"),
                sample_row("us_m3_stuart"),
                sample_row("us_m5a1_stuart"),
            ])
            .unwrap();

        let nodes = store.list_nodes(&NodeFilter::default()).unwrap();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["us_m2a2", "us_m3_stuart", "us_m5a1_stuart"]);
    }

    #[test]
    fn test_list_nodes_with_filter() {
        let store = setup_store();

        let mut german = sample_row("germ_pzii_c");
        german.country = "germany".to_string();
        let mut premium = sample_row("us_m2a4");
        premium.status = "premium".to_string();
        store
            .replace_nodes(&[sample_row("us_m2a2"), german, premium])
            .unwrap();

        let filter = NodeFilter {
            country: Some("usa".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list_nodes(&filter).unwrap().len(), 2);

        let filter = NodeFilter {
            country: Some("usa".to_string()),
            status: Some("premium".to_string()),
            ..Default::default()
        };
        let nodes = store.list_nodes(&filter).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "us_m2a4");
    }

    #[test]
    fn test_stats() {
        let store = setup_store();

        let mut folder = sample_row("us_pack_group");
        folder.kind = "folder".to_string();
        let mut premium = sample_row("us_m2a4");
        premium.status = "premium".to_string();
        let mut chained = sample_row("us_m3_stuart");
        chained.predecessor = Some("us_m2a2".to_string());
        store
            .replace_nodes(&[sample_row("us_m2a2"), folder, premium, chained])
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.vehicles, 3);
        assert_eq!(stats.folders, 1);
        assert_eq!(stats.premium, 1);
        assert_eq!(stats.dependencies, 1);
    }

    #[test]
    fn test_clear() {
        let store = setup_store();

        let mut chained = sample_row("us_m3_stuart");
        chained.predecessor = Some("us_m2a2".to_string());
        store
            .replace_nodes(&[sample_row("us_m2a2"), chained])
            .unwrap();

        let removed = store.clear().unwrap();
        assert_eq!(removed, 2);
        assert!(store.list_nodes(&NodeFilter::default()).unwrap().is_empty());
        assert!(store.list_dependencies().unwrap().is_empty());
    }
}
