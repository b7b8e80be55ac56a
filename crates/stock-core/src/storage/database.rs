//! Database handle ownership
//!
//! `StockDb` owns the single SQLite connection. Callers borrow it one
//! operation at a time through `readable()` or `writable()`; the returned
//! handle holds the connection lock until it is dropped.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::debug;

use crate::error::StoreError;
use crate::storage::schema::{
    get_schema_version, init_schema, needs_init, upgrade_schema, SCHEMA_VERSION,
};

/// Owner of the inventory database connection
pub struct StockDb {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

/// Scoped access to the connection for one operation
pub struct DbHandle<'a> {
    conn: MutexGuard<'a, Connection>,
}

impl Deref for DbHandle<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl StockDb {
    /// Open or create the database file, creating the schema if needed
    ///
    /// Safe to call repeatedly on the same path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Opened database at {:?}", path);

        Self::with_connection(conn, Some(path.to_path_buf()))
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        prepare_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Borrow the connection for reads
    ///
    /// The connection is switched to `query_only` for the lifetime of the
    /// handle, so a stray write through it fails instead of landing.
    pub fn readable(&self) -> rusqlite::Result<DbHandle<'_>> {
        self.acquire(true)
    }

    /// Borrow the connection for writes
    pub fn writable(&self) -> rusqlite::Result<DbHandle<'_>> {
        self.acquire(false)
    }

    fn acquire(&self, query_only: bool) -> rusqlite::Result<DbHandle<'_>> {
        // A panic while holding the lock leaves the connection itself intact.
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.pragma_update(None, "query_only", query_only)?;
        Ok(DbHandle { conn })
    }
}

fn prepare_schema(conn: &Connection) -> rusqlite::Result<()> {
    if needs_init(conn) {
        return init_schema(conn);
    }
    match get_schema_version(conn)? {
        Some(version) if version < SCHEMA_VERSION => upgrade_schema(conn, version),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file_and_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("stock.db");

        let db = StockDb::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock.db");

        {
            let db = StockDb::open(&path).unwrap();
            db.writable()
                .unwrap()
                .execute(
                    "INSERT INTO items (name, price, image) VALUES ('a', 1.0, 'img')",
                    [],
                )
                .unwrap();
        }

        let db = StockDb::open(&path).unwrap();
        let count: i64 = db
            .readable()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_readable_handle_rejects_writes() {
        let db = StockDb::open_in_memory().unwrap();

        let result = db.readable().unwrap().execute(
            "INSERT INTO items (name, price, image) VALUES ('a', 1.0, 'img')",
            [],
        );
        assert!(result.is_err());

        // A later writable handle lifts the restriction
        let inserted = db
            .writable()
            .unwrap()
            .execute(
                "INSERT INTO items (name, price, image) VALUES ('a', 1.0, 'img')",
                [],
            )
            .unwrap();
        assert_eq!(inserted, 1);
    }
}
