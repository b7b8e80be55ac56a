//! Stock Core Library
//!
//! This crate provides the core of Stock, a local inventory store addressed
//! by resource identifiers and backed by a single SQLite table.
//!
//! # Architecture
//!
//! - **Provider**: maps `content://…/items[/<id>]` to table operations,
//!   validates payloads, and notifies observers after each change
//! - **Storage**: owns the SQLite connection and the table schema
//! - **Notifier**: publish/subscribe registry keyed by identifier
//!
//! # Quick Start
//!
//! ```text
//! let provider = StockProvider::open(&Config::load()?)?;
//!
//! // Add an item
//! let item = NewItem::new("Widget", 9.99, "img://widget").with_quantity(3);
//! let uri = provider.insert(items_uri(), &item.to_values())?;
//!
//! // Query items
//! let cursor = provider.query(items_uri(), None, None, &[], Some("name"))?;
//! let items = cursor.to_items()?;
//! ```
//!
//! # Modules
//!
//! - `provider`: CRUD gateway (main entry point)
//! - `uri`: identifier parsing and routing
//! - `validation`: payload rules applied before every write
//! - `notify`: change notification registry
//! - `list_view`: cached list that requeries on change
//! - `storage`: SQLite schema and connection handling
//! - `config`: Application configuration

pub mod config;
pub mod contract;
pub mod cursor;
pub mod error;
pub mod list_view;
pub mod models;
pub mod notify;
pub mod provider;
pub mod storage;
pub mod uri;
pub mod validation;
pub mod values;

pub use config::Config;
pub use cursor::Cursor;
pub use error::{ProviderError, ProviderResult, StoreError};
pub use list_view::InventoryList;
pub use models::{Item, NewItem};
pub use notify::{ChangeNotifier, SubscriptionId};
pub use provider::{SaleOutcome, StockProvider};
pub use storage::StockDb;
pub use uri::{item_uri, items_uri, ResourceKind, Route};
pub use values::ContentValues;
