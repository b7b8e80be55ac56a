//! Data models for Stock
//!
//! `Item` is a persisted row. `NewItem` describes an item that has not been
//! inserted yet and converts into the `ContentValues` payload the provider
//! accepts.

use serde::{Deserialize, Serialize};

use crate::contract::items;
use crate::values::ContentValues;

/// An inventory item as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    /// Units on hand
    pub quantity: i64,
    /// Unit price
    pub price: f64,
    /// Image reference or path
    pub image: String,
}

/// An item waiting to be inserted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewItem {
    pub name: String,
    /// Left to the store default when `None`
    pub quantity: Option<i64>,
    pub price: f64,
    pub image: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            price,
            image: image.into(),
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Build the insert payload
    pub fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        values.put(items::NAME, self.name.clone());
        if let Some(quantity) = self.quantity {
            values.put(items::QUANTITY, quantity);
        }
        values.put(items::PRICE, self.price);
        values.put(items::IMAGE, self.image.clone());
        values
    }
}
