//! SQLite schema for the inventory table
//!
//! The schema version lives in `PRAGMA user_version`. Version 1 is the only
//! layout so far, so the upgrade path has nothing to do yet.

use rusqlite::{Connection, Result};
use tracing::{debug, info};

use crate::contract::items;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Create the items table if it does not exist
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            {id} INTEGER PRIMARY KEY AUTOINCREMENT,
            {name} TEXT NOT NULL,
            {quantity} INTEGER NOT NULL DEFAULT 0,
            {price} REAL NOT NULL,
            {image} TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_name ON {table}({name});
        "#,
        table = items::TABLE_NAME,
        id = items::ID,
        name = items::NAME,
        quantity = items::QUANTITY,
        price = items::PRICE,
        image = items::IMAGE,
    ))?;

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Initialized inventory schema v{}", SCHEMA_VERSION);
    Ok(())
}

/// Bring an older schema up to `SCHEMA_VERSION`
pub fn upgrade_schema(conn: &Connection, from: i32) -> Result<()> {
    debug!("Upgrading schema from v{} to v{}", from, SCHEMA_VERSION);
    set_schema_version(conn, SCHEMA_VERSION)
}

/// Get the current schema version from the database
///
/// Returns `None` for a database that has never been initialized.
pub fn get_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(if version == 0 { None } else { Some(version) })
}

/// Check if schema needs initialization
pub fn needs_init(conn: &Connection) -> bool {
    let table_exists = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")
        .and_then(|mut stmt| stmt.exists([items::TABLE_NAME]))
        .unwrap_or(false);

    !table_exists || matches!(get_schema_version(conn), Ok(None) | Err(_))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM pragma_table_info('items') ORDER BY cid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(
            columns(&conn),
            vec!["id", "name", "quantity", "price", "image"]
        );
    }

    #[test]
    fn test_schema_version() {
        let conn = Connection::open_in_memory().unwrap();

        // Before init, needs init
        assert!(needs_init(&conn));
        assert_eq!(get_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
        assert!(!needs_init(&conn));
    }

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO items (name, price, image) VALUES ('a', 1.0, 'img')",
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO items (name, price, image) VALUES ('a', 1.0, 'img')",
            [],
        )
        .unwrap();

        let quantity: i64 = conn
            .query_row("SELECT quantity FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(quantity, 0);
    }

    #[test]
    fn test_upgrade_sets_version() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.pragma_update(None, "user_version", 0).unwrap();

        upgrade_schema(&conn, 0).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }
}
