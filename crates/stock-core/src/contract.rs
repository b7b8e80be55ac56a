//! Names shared between the provider and its callers
//!
//! The authority, collection path, table and column names, and the type tags
//! returned by `StockProvider::get_type` all live here so that every layer
//! agrees on them.

/// URI scheme for all resource identifiers
pub const SCHEME: &str = "content";

/// Globally unique name for the provider (the URI authority)
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventoryapp";

/// Collection path appended to the base URI
pub const PATH_ITEMS: &str = "items";

/// Base URI shared by every resource: `content://<authority>`
pub fn base_content_uri() -> String {
    format!("{}://{}", SCHEME, CONTENT_AUTHORITY)
}

/// Table and column names for inventory items
pub mod items {
    use super::{CONTENT_AUTHORITY, PATH_ITEMS};

    pub const TABLE_NAME: &str = "items";

    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const QUANTITY: &str = "quantity";
    pub const PRICE: &str = "price";
    pub const IMAGE: &str = "image";

    /// Every column, in table order
    pub const ALL_COLUMNS: [&str; 5] = [ID, NAME, QUANTITY, PRICE, IMAGE];

    /// Columns a caller may supply in an insert or update payload
    pub const WRITABLE_COLUMNS: [&str; 4] = [NAME, QUANTITY, PRICE, IMAGE];

    const CURSOR_DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
    const CURSOR_ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

    /// Full URI of the item collection
    pub fn content_uri() -> String {
        format!("{}/{}", super::base_content_uri(), PATH_ITEMS)
    }

    /// Type tag for a list of items
    pub fn content_list_type() -> String {
        format!("{}/{}/{}", CURSOR_DIR_BASE_TYPE, CONTENT_AUTHORITY, PATH_ITEMS)
    }

    /// Type tag for a single item
    pub fn content_item_type() -> String {
        format!("{}/{}/{}", CURSOR_ITEM_BASE_TYPE, CONTENT_AUTHORITY, PATH_ITEMS)
    }

    pub fn is_column(name: &str) -> bool {
        ALL_COLUMNS.contains(&name)
    }
}
