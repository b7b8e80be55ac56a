//! Payload validation
//!
//! Every check runs before the store is touched, so a rejected payload never
//! causes a partial write.

use crate::contract::items;
use crate::error::{ProviderError, ProviderResult};
use crate::values::ContentValues;

const NAME_REQUIRED: &str = "name required";
const QUANTITY_NEGATIVE: &str = "quantity must be non-negative";
const PRICE_NEGATIVE: &str = "price must be non-negative";
const IMAGE_REQUIRED: &str = "image required";

/// Validate a full item for insertion: name, price and image are mandatory
pub fn validate_insert(values: &ContentValues) -> ProviderResult<()> {
    check_columns(values)?;
    check_name(values)?;
    if values.contains_key(items::QUANTITY) {
        check_quantity(values)?;
    }
    check_price(values)?;
    check_image(values)
}

/// Validate a partial update: only the fields present are checked
pub fn validate_update(values: &ContentValues) -> ProviderResult<()> {
    check_columns(values)?;
    if values.contains_key(items::NAME) {
        check_name(values)?;
    }
    if values.contains_key(items::QUANTITY) {
        check_quantity(values)?;
    }
    if values.contains_key(items::PRICE) {
        check_price(values)?;
    }
    if values.contains_key(items::IMAGE) {
        check_image(values)?;
    }
    Ok(())
}

// Column names end up in SQL text, so only known columns get through.
fn check_columns(values: &ContentValues) -> ProviderResult<()> {
    for column in values.keys() {
        if column == items::ID {
            return Err(ProviderError::invalid("id is assigned by the store"));
        }
        if !items::WRITABLE_COLUMNS.contains(&column) {
            return Err(ProviderError::invalid(format!("unknown column {}", column)));
        }
    }
    Ok(())
}

fn check_name(values: &ContentValues) -> ProviderResult<()> {
    match values.get_as_string(items::NAME) {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(ProviderError::invalid(NAME_REQUIRED)),
    }
}

fn check_quantity(values: &ContentValues) -> ProviderResult<()> {
    match values.get_as_i64(items::QUANTITY) {
        Some(quantity) if quantity >= 0 => Ok(()),
        _ => Err(ProviderError::invalid(QUANTITY_NEGATIVE)),
    }
}

fn check_price(values: &ContentValues) -> ProviderResult<()> {
    match values.get_as_f64(items::PRICE) {
        Some(price) if price >= 0.0 && price.is_finite() => Ok(()),
        _ => Err(ProviderError::invalid(PRICE_NEGATIVE)),
    }
}

fn check_image(values: &ContentValues) -> ProviderResult<()> {
    match values.get_as_string(items::IMAGE) {
        Some(_) => Ok(()),
        None => Err(ProviderError::invalid(IMAGE_REQUIRED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;

    fn widget() -> ContentValues {
        ContentValues::new()
            .with(items::NAME, "Widget".to_string())
            .with(items::QUANTITY, 3i64)
            .with(items::PRICE, 9.99)
            .with(items::IMAGE, "img://widget".to_string())
    }

    fn message(result: ProviderResult<()>) -> String {
        match result {
            Err(ProviderError::InvalidArgument(msg)) => msg,
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_insert() {
        assert!(validate_insert(&widget()).is_ok());

        // Quantity is optional on insert
        let mut values = widget();
        values.remove(items::QUANTITY);
        assert!(validate_insert(&values).is_ok());
    }

    #[test]
    fn test_insert_missing_required_fields() {
        let mut values = widget();
        values.remove(items::NAME);
        assert_eq!(message(validate_insert(&values)), "name required");

        let mut values = widget();
        values.remove(items::IMAGE);
        assert_eq!(message(validate_insert(&values)), "image required");

        let mut values = widget();
        values.remove(items::PRICE);
        assert_eq!(message(validate_insert(&values)), "price must be non-negative");
    }

    #[test]
    fn test_insert_rejects_bad_values() {
        let values = widget().with(items::NAME, String::new());
        assert_eq!(message(validate_insert(&values)), "name required");

        let values = widget().with(items::QUANTITY, -1i64);
        assert_eq!(message(validate_insert(&values)), "quantity must be non-negative");

        let values = widget().with(items::QUANTITY, "lots".to_string());
        assert_eq!(message(validate_insert(&values)), "quantity must be non-negative");

        let values = widget().with(items::PRICE, -0.01);
        assert_eq!(message(validate_insert(&values)), "price must be non-negative");

        let values = widget().with(items::IMAGE, Value::Null);
        assert_eq!(message(validate_insert(&values)), "image required");
    }

    #[test]
    fn test_rejects_blob_text_fields() {
        let values = widget().with(items::NAME, Value::Blob(b"Widget".to_vec()));
        assert_eq!(message(validate_insert(&values)), "name required");

        let values = widget().with(items::IMAGE, Value::Blob(b"img".to_vec()));
        assert_eq!(message(validate_insert(&values)), "image required");

        let values = ContentValues::new().with(items::NAME, Value::Blob(b"x".to_vec()));
        assert_eq!(message(validate_update(&values)), "name required");
    }

    #[test]
    fn test_rejects_quantity_outside_integer_range() {
        let values = widget().with(items::QUANTITY, 1e19);
        assert_eq!(message(validate_insert(&values)), "quantity must be non-negative");

        let values = ContentValues::new().with(items::QUANTITY, 1e19);
        assert_eq!(message(validate_update(&values)), "quantity must be non-negative");

        let values = widget().with(items::QUANTITY, 12.0);
        assert!(validate_insert(&values).is_ok());
    }

    #[test]
    fn test_zero_is_allowed() {
        let values = widget().with(items::QUANTITY, 0i64).with(items::PRICE, 0.0);
        assert!(validate_insert(&values).is_ok());
    }

    #[test]
    fn test_update_checks_only_present_fields() {
        let values = ContentValues::new().with(items::QUANTITY, 2i64);
        assert!(validate_update(&values).is_ok());

        assert!(validate_update(&ContentValues::new()).is_ok());

        let values = ContentValues::new().with(items::NAME, "  ".to_string());
        assert_eq!(message(validate_update(&values)), "name required");

        let values = ContentValues::new().with(items::PRICE, -5i64);
        assert_eq!(message(validate_update(&values)), "price must be non-negative");

        let values = ContentValues::new().with(items::IMAGE, Value::Null);
        assert_eq!(message(validate_update(&values)), "image required");
    }

    #[test]
    fn test_rejects_id_and_unknown_columns() {
        let values = widget().with(items::ID, 5i64);
        assert_eq!(message(validate_insert(&values)), "id is assigned by the store");

        let values = ContentValues::new().with("gender", 1i64);
        assert_eq!(message(validate_update(&values)), "unknown column gender");
    }
}
