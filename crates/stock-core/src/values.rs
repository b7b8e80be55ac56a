//! Column/value payloads for inserts and updates

use rusqlite::types::Value;

/// An ordered set of column → value pairs
///
/// Getters coerce between SQLite storage classes the way a loosely typed
/// caller would expect: `"3"` reads as the integer 3, `2.5` reads as `"2.5"`.
/// A getter returns `None` when the column is absent, NULL, or cannot be
/// coerced. Blobs never coerce, since SQLite stores them as-is even in a
/// TEXT column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: Vec<(String, Value)>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// Builder-style `put`
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(c, _)| c == column)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.entries.iter().any(|(c, _)| c == column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn get_as_string(&self, column: &str) -> Option<String> {
        match self.get(column)? {
            Value::Null => None,
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Blob(_) => None,
        }
    }

    pub fn get_as_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => real_to_i64(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_as_f64(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A whole-valued real that fits in an `i64`, without saturating
pub(crate) fn real_to_i64(f: f64) -> Option<i64> {
    // 2^63 is exact as an f64; i64::MAX is not.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_replaces_existing() {
        let mut values = ContentValues::new();
        values.put("quantity", 1i64).put("quantity", 2i64);

        assert_eq!(values.len(), 1);
        assert_eq!(values.get_as_i64("quantity"), Some(2));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let values = ContentValues::new()
            .with("name", "Widget".to_string())
            .with("price", 9.99)
            .with("image", "img://widget".to_string());

        let keys: Vec<_> = values.keys().collect();
        assert_eq!(keys, vec!["name", "price", "image"]);
    }

    #[test]
    fn test_coercing_getters() {
        let values = ContentValues::new()
            .with("a", "3".to_string())
            .with("b", 2.0)
            .with("c", 2.5)
            .with("d", "abc".to_string())
            .with("e", Value::Null);

        assert_eq!(values.get_as_i64("a"), Some(3));
        assert_eq!(values.get_as_f64("a"), Some(3.0));
        assert_eq!(values.get_as_i64("b"), Some(2));
        assert_eq!(values.get_as_i64("c"), None);
        assert_eq!(values.get_as_f64("c"), Some(2.5));
        assert_eq!(values.get_as_i64("d"), None);
        assert_eq!(values.get_as_string("d"), Some("abc".to_string()));
        assert_eq!(values.get_as_string("e"), None);
        assert!(values.contains_key("e"));
        assert_eq!(values.get_as_string("missing"), None);
    }

    #[test]
    fn test_blobs_do_not_read_as_text() {
        let values = ContentValues::new().with("name", Value::Blob(b"Widget".to_vec()));
        assert_eq!(values.get_as_string("name"), None);
        assert_eq!(values.get_as_i64("name"), None);
    }

    #[test]
    fn test_out_of_range_reals_are_not_integers() {
        let values = ContentValues::new()
            .with("big", 1e19)
            .with("small", -1e19)
            .with("edge", 9_223_372_036_854_775_808.0)
            .with("nan", f64::NAN)
            .with("inf", f64::INFINITY)
            .with("ok", -4096.0);

        assert_eq!(values.get_as_i64("big"), None);
        assert_eq!(values.get_as_i64("small"), None);
        assert_eq!(values.get_as_i64("edge"), None);
        assert_eq!(values.get_as_i64("nan"), None);
        assert_eq!(values.get_as_i64("inf"), None);
        assert_eq!(values.get_as_i64("ok"), Some(-4096));
    }

    #[test]
    fn test_remove() {
        let mut values = ContentValues::new().with("name", "x".to_string());
        assert_eq!(values.remove("name"), Some(Value::Text("x".to_string())));
        assert!(values.is_empty());
        assert_eq!(values.remove("name"), None);
    }
}
