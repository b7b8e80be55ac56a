//! URI-addressed CRUD gateway
//!
//! `StockProvider` is the only way in or out of the items table. Every call
//! resolves its identifier to a `Route`, validates any payload, runs exactly
//! one SQL statement, and on a successful mutation notifies observers of the
//! identifier it was called with.
//!
//! ## Addressing
//!
//! - `content://com.example.android.inventoryapp/items` is the collection;
//!   selection and sort order are applied as given.
//! - `.../items/<id>` is a single item; any caller selection is replaced by
//!   `id = <id>`, so an item identifier never widens to several rows.
//!
//! ## Usage
//!
//! ```ignore
//! let provider = StockProvider::open_in_memory()?;
//! let uri = provider
//!     .insert(items::content_uri(), &NewItem::new("Widget", 9.99, "img://widget").to_values())?
//!     .expect("store accepted the row");
//! let cursor = provider.query(&uri, None, None, &[], None)?;
//! ```

use std::sync::Arc;

use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tracing::{debug, error};
use url::Url;

use crate::config::Config;
use crate::contract::items;
use crate::cursor::Cursor;
use crate::error::{ProviderError, ProviderResult};
use crate::notify::ChangeNotifier;
use crate::storage::StockDb;
use crate::uri::{with_appended_id, ResourceKind, Route};
use crate::validation::{validate_insert, validate_update};
use crate::values::ContentValues;

/// Result of selling one unit of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    /// One unit sold; `remaining` units left
    Sold { remaining: i64 },
    /// Quantity was already zero, nothing changed
    OutOfStock,
    /// No item with that id
    NotFound,
}

/// Content provider for inventory items
pub struct StockProvider {
    db: StockDb,
    notifier: Arc<ChangeNotifier>,
}

impl StockProvider {
    /// Create a provider over an open database with its own notifier
    pub fn new(db: StockDb) -> Self {
        Self::with_notifier(db, Arc::new(ChangeNotifier::new()))
    }

    /// Create a provider that publishes to an existing notifier
    pub fn with_notifier(db: StockDb, notifier: Arc<ChangeNotifier>) -> Self {
        Self { db, notifier }
    }

    /// Open the database named by the configuration
    pub fn open(config: &Config) -> ProviderResult<Self> {
        Ok(Self::new(StockDb::open(config.sqlite_path())?))
    }

    /// Open an in-memory provider (for testing)
    pub fn open_in_memory() -> ProviderResult<Self> {
        Ok(Self::new(StockDb::open_in_memory()?))
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }

    pub fn db(&self) -> &StockDb {
        &self.db
    }

    // ==================== Query ====================

    /// Run a query against the collection or a single item
    ///
    /// `projection` of `None` selects every column. For item identifiers the
    /// `selection` and `selection_args` are ignored.
    pub fn query(
        &self,
        uri: impl AsRef<str>,
        projection: Option<&[&str]>,
        selection: Option<&str>,
        selection_args: &[&str],
        sort_order: Option<&str>,
    ) -> ProviderResult<Cursor> {
        let (uri, route) = Route::resolve_str(uri.as_ref())?;
        let columns = projection_sql(projection)?;
        let filter = Filter::for_route(route, selection, selection_args);

        let mut sql = format!("SELECT {} FROM {}", columns, items::TABLE_NAME);
        filter.append_where(&mut sql);
        if let Some(order) = sort_order.filter(|o| !o.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        debug!("query {} -> {}", uri, sql);

        let conn = self.db.readable()?;
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = names.len();

        let rows = stmt
            .query_map(params_from_iter(filter.args.iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Cursor::new(names, rows, uri))
    }

    // ==================== Insert ====================

    /// Insert a new item through the collection identifier
    ///
    /// Returns the new item's identifier, or `Ok(None)` when the store
    /// rejected the row. Item identifiers are not insertable.
    pub fn insert(
        &self,
        uri: impl AsRef<str>,
        values: &ContentValues,
    ) -> ProviderResult<Option<Url>> {
        let (uri, route) = Route::resolve_str(uri.as_ref())?;
        match route {
            Route::Collection => self.insert_item(&uri, values),
            Route::Item(_) => Err(ProviderError::unsupported("Insertion", &uri)),
        }
    }

    fn insert_item(&self, uri: &Url, values: &ContentValues) -> ProviderResult<Option<Url>> {
        validate_insert(values)?;

        let columns: Vec<&str> = values.keys().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            items::TABLE_NAME,
            columns.join(", "),
            placeholders
        );
        debug!("insert {} -> {}", uri, sql);

        let inserted = self.db.writable().and_then(|conn| {
            conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))?;
            Ok(conn.last_insert_rowid())
        });

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to insert row for {}: {}", uri, e);
                return Ok(None);
            }
        };

        self.notifier.notify_change(uri);
        Ok(Some(with_appended_id(uri, id)))
    }

    // ==================== Update ====================

    /// Update the rows addressed by `uri`
    ///
    /// Only the columns present in `values` are validated and written. An
    /// empty payload returns 0 without touching the store.
    pub fn update(
        &self,
        uri: impl AsRef<str>,
        values: &ContentValues,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> ProviderResult<usize> {
        let (uri, route) = Route::resolve_str(uri.as_ref())?;
        let filter = Filter::for_route(route, selection, selection_args);

        validate_update(values)?;
        if values.is_empty() {
            return Ok(0);
        }

        let assignments: Vec<String> = values.keys().map(|c| format!("{} = ?", c)).collect();
        let mut sql = format!(
            "UPDATE {} SET {}",
            items::TABLE_NAME,
            assignments.join(", ")
        );
        filter.append_where(&mut sql);
        debug!("update {} -> {}", uri, sql);

        let params = values
            .iter()
            .map(|(_, v)| v.clone())
            .chain(filter.args.iter().cloned());

        let updated = {
            let conn = self.db.writable()?;
            conn.execute(&sql, params_from_iter(params))?
        };

        if updated > 0 {
            self.notifier.notify_change(&uri);
        }
        Ok(updated)
    }

    // ==================== Delete ====================

    /// Delete the rows addressed by `uri`; 0 rows is not an error
    pub fn delete(
        &self,
        uri: impl AsRef<str>,
        selection: Option<&str>,
        selection_args: &[&str],
    ) -> ProviderResult<usize> {
        let (uri, route) = Route::resolve_str(uri.as_ref())?;
        let filter = Filter::for_route(route, selection, selection_args);

        let mut sql = format!("DELETE FROM {}", items::TABLE_NAME);
        filter.append_where(&mut sql);
        debug!("delete {} -> {}", uri, sql);

        let deleted = {
            let conn = self.db.writable()?;
            conn.execute(&sql, params_from_iter(filter.args.iter()))?
        };

        if deleted > 0 {
            self.notifier.notify_change(&uri);
        }
        Ok(deleted)
    }

    // ==================== Type negotiation ====================

    /// Classify an identifier as collection or item
    pub fn resolve_kind(&self, uri: impl AsRef<str>) -> ProviderResult<ResourceKind> {
        let (_, route) = Route::resolve_str(uri.as_ref())?;
        Ok(route.kind())
    }

    /// Type tag for the data an identifier addresses
    pub fn get_type(&self, uri: impl AsRef<str>) -> ProviderResult<String> {
        Ok(match self.resolve_kind(uri)? {
            ResourceKind::Collection => items::content_list_type(),
            ResourceKind::Item => items::content_item_type(),
        })
    }

    // ==================== Sales ====================

    /// Sell one unit of the item at `uri`
    ///
    /// The decrement goes through `update`, so it is validated and observers
    /// are notified like any other change.
    pub fn sell_one(&self, uri: impl AsRef<str>) -> ProviderResult<SaleOutcome> {
        let (uri, route) = Route::resolve_str(uri.as_ref())?;
        if route == Route::Collection {
            return Err(ProviderError::unsupported("Sale", &uri));
        }

        let cursor = self.query(&uri, Some(&[items::QUANTITY][..]), None, &[], None)?;
        let Some(quantity) = cursor.get_i64(0, items::QUANTITY) else {
            return Ok(SaleOutcome::NotFound);
        };
        if quantity <= 0 {
            return Ok(SaleOutcome::OutOfStock);
        }

        let remaining = quantity - 1;
        let values = ContentValues::new().with(items::QUANTITY, remaining);
        match self.update(&uri, &values, None, &[])? {
            0 => Ok(SaleOutcome::NotFound),
            _ => Ok(SaleOutcome::Sold { remaining }),
        }
    }
}

/// WHERE clause and its bound arguments
struct Filter {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Filter {
    fn for_route(route: Route, selection: Option<&str>, selection_args: &[&str]) -> Self {
        match route {
            Route::Collection => Filter {
                clause: selection
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string),
                args: selection_args
                    .iter()
                    .map(|a| Value::Text(a.to_string()))
                    .collect(),
            },
            Route::Item(id) => Filter {
                clause: Some(format!("{} = ?", items::ID)),
                args: vec![Value::Integer(id)],
            },
        }
    }

    fn append_where(&self, sql: &mut String) {
        if let Some(clause) = &self.clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
    }
}

fn projection_sql(projection: Option<&[&str]>) -> ProviderResult<String> {
    let Some(columns) = projection.filter(|p| !p.is_empty()) else {
        return Ok(items::ALL_COLUMNS.join(", "));
    };
    if let Some(unknown) = columns.iter().find(|c| !items::is_column(c)) {
        return Err(ProviderError::invalid(format!("unknown column {}", unknown)));
    }
    Ok(columns.join(", "))
}
