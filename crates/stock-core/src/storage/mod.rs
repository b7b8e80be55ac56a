//! Storage layer
//!
//! Owns the SQLite database that holds inventory items.
//!
//! ## Layout
//!
//! - `schema`: table definition and version tracking
//! - `database`: connection ownership and per-operation handles

pub mod database;
pub mod schema;

pub use database::{DbHandle, StockDb};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
