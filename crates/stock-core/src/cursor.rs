//! Query results
//!
//! A `Cursor` is a materialized result set plus the identifier it was queried
//! through. It does not refresh itself: observers of `notification_uri()` are
//! told when the data changed and re-run the query.

use rusqlite::types::Value;
use url::Url;

use crate::contract::items;
use crate::error::{ProviderError, ProviderResult};
use crate::models::Item;
use crate::values::real_to_i64;

#[derive(Debug, Clone)]
pub struct Cursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    notification_uri: Url,
}

impl Cursor {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>, notification_uri: Url) -> Self {
        Self {
            columns,
            rows,
            notification_uri,
        }
    }

    /// The identifier whose change notifications invalidate this result
    pub fn notification_uri(&self) -> &Url {
        &self.notification_uri
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn get_i64(&self, row: usize, column: &str) -> Option<i64> {
        match self.get(row, column)? {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => real_to_i64(*f),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_f64(&self, row: usize, column: &str) -> Option<f64> {
        match self.get(row, column)? {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_string(&self, row: usize, column: &str) -> Option<String> {
        match self.get(row, column)? {
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Convert every row to an `Item`
    ///
    /// Requires all item columns to be in the projection.
    pub fn to_items(&self) -> ProviderResult<Vec<Item>> {
        for column in items::ALL_COLUMNS {
            if self.column_index(column).is_none() {
                return Err(ProviderError::invalid(format!(
                    "column {} not in projection",
                    column
                )));
            }
        }

        (0..self.len())
            .map(|row| {
                Ok(Item {
                    id: cell(row, items::ID, self.get_i64(row, items::ID))?,
                    name: cell(row, items::NAME, self.get_string(row, items::NAME))?,
                    quantity: cell(row, items::QUANTITY, self.get_i64(row, items::QUANTITY))?,
                    price: cell(row, items::PRICE, self.get_f64(row, items::PRICE))?,
                    image: cell(row, items::IMAGE, self.get_string(row, items::IMAGE))?,
                })
            })
            .collect()
    }
}

/// A cell that is NULL or of the wrong storage class fails the conversion
fn cell<T>(row: usize, column: &str, value: Option<T>) -> ProviderResult<T> {
    value.ok_or_else(|| {
        ProviderError::invalid(format!("row {} has no usable {} value", row, column))
    })
}
