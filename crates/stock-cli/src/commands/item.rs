//! Item command handlers

use anyhow::{bail, Context, Result};

use stock_core::contract::items;
use stock_core::{
    item_uri, items_uri, ContentValues, Item, NewItem, SaleOutcome, StockProvider,
};

use crate::output::Output;
use crate::prompt::confirm;

/// Fields accepted by `stock edit`
#[derive(Debug, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

impl ItemChanges {
    fn to_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        if let Some(ref name) = self.name {
            values.put(items::NAME, name.clone());
        }
        if let Some(quantity) = self.quantity {
            values.put(items::QUANTITY, quantity);
        }
        if let Some(price) = self.price {
            values.put(items::PRICE, price);
        }
        if let Some(ref image) = self.image {
            values.put(items::IMAGE, image.clone());
        }
        values
    }
}

/// Add a new item
pub fn add(provider: &StockProvider, item: NewItem, output: &Output) -> Result<()> {
    let uri = provider
        .insert(items_uri(), &item.to_values())
        .context("Failed to add item")?;

    let Some(uri) = uri else {
        bail!("The store rejected the new item");
    };

    let item = fetch(provider, &uri)?;
    output.success(&format!("Added item: {}", uri));
    output.print_item(&item);
    Ok(())
}

/// List items, optionally filtered and sorted
pub fn list(
    provider: &StockProvider,
    selection: Option<String>,
    args: Vec<String>,
    sort: Option<String>,
    output: &Output,
) -> Result<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let items = provider
        .query(
            items_uri(),
            None,
            selection.as_deref(),
            &args,
            sort.as_deref().or(Some(items::ID)),
        )?
        .to_items()?;

    output.print_items(&items);
    Ok(())
}

/// Show a single item
pub fn show(provider: &StockProvider, id: i64, output: &Output) -> Result<()> {
    let item = fetch(provider, item_uri(id).as_str())?;
    output.print_item(&item);
    Ok(())
}

/// Change some fields of an item
pub fn edit(
    provider: &StockProvider,
    id: i64,
    changes: ItemChanges,
    output: &Output,
) -> Result<()> {
    let values = changes.to_values();
    if values.is_empty() {
        output.message("Nothing to change.");
        return Ok(());
    }

    let uri = item_uri(id);
    let updated = provider
        .update(&uri, &values, None, &[])
        .context("Failed to update item")?;
    if updated == 0 {
        bail!("Item not found: {}", id);
    }

    output.success("Item updated");
    output.print_item(&fetch(provider, &uri)?);
    Ok(())
}

/// Sell one unit of an item
pub fn sell(provider: &StockProvider, id: i64, output: &Output) -> Result<()> {
    match provider.sell_one(item_uri(id))? {
        SaleOutcome::Sold { remaining } => {
            output.success(&format!("Sold one. {} left in stock", remaining));
            Ok(())
        }
        SaleOutcome::OutOfStock => bail!("Item {} is out of stock", id),
        SaleOutcome::NotFound => bail!("Item not found: {}", id),
    }
}

/// Delete a single item
pub fn delete(provider: &StockProvider, id: i64, output: &Output) -> Result<()> {
    let uri = item_uri(id);
    let item = fetch(provider, &uri)?;

    if output.should_prompt() {
        println!("Delete item: {} - {}", item.id, item.name);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    provider
        .delete(&uri, None, &[])
        .context("Failed to delete item")?;
    output.success(&format!("Deleted item: {}", id));
    Ok(())
}

/// Delete every item
pub fn delete_all(provider: &StockProvider, output: &Output) -> Result<()> {
    if output.should_prompt() && !confirm("Delete all items?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let deleted = provider
        .delete(items_uri(), None, &[])
        .context("Failed to delete items")?;
    output.success(&format!("Deleted {} item(s)", deleted));
    Ok(())
}

/// Print the type tag for an identifier
pub fn content_type(provider: &StockProvider, uri: String, output: &Output) -> Result<()> {
    let tag = provider.get_type(&uri)?;
    if output.is_json() {
        println!("{}", serde_json::json!({ "uri": uri, "type": tag }));
    } else {
        println!("{}", tag);
    }
    Ok(())
}

fn fetch(provider: &StockProvider, uri: impl AsRef<str>) -> Result<Item> {
    let uri = uri.as_ref();
    provider
        .query(uri, None, None, &[], None)?
        .to_items()?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", uri))
}
