//! Resource identifier routing
//!
//! Identifiers have the shape `content://<authority>/items[/<id>]`. Anything
//! else is rejected with `ProviderError::UnrecognizedResource`.

use url::Url;

use crate::contract::{items, CONTENT_AUTHORITY, PATH_ITEMS, SCHEME};
use crate::error::{ProviderError, ProviderResult};

/// The route an identifier resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The whole item set
    Collection,
    /// A single item, by id
    Item(i64),
}

/// The kind of resource a route addresses, used for type negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Item,
}

impl Route {
    /// Match a parsed identifier against the known routes
    pub fn resolve(uri: &Url) -> ProviderResult<Route> {
        if uri.scheme() != SCHEME || uri.host_str() != Some(CONTENT_AUTHORITY) {
            return Err(ProviderError::unrecognized(uri));
        }

        let segments = path_segments(uri);
        match segments.as_slice() {
            [path] if *path == PATH_ITEMS => Ok(Route::Collection),
            [path, id] if *path == PATH_ITEMS => parse_decimal_id(id)
                .map(Route::Item)
                .ok_or_else(|| ProviderError::unrecognized(uri)),
            _ => Err(ProviderError::unrecognized(uri)),
        }
    }

    /// Parse and match an identifier string
    pub fn resolve_str(uri: &str) -> ProviderResult<(Url, Route)> {
        let parsed = parse(uri)?;
        let route = Route::resolve(&parsed)?;
        Ok((parsed, route))
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Route::Collection => ResourceKind::Collection,
            Route::Item(_) => ResourceKind::Item,
        }
    }
}

/// Parse an identifier string, mapping syntax errors to `UnrecognizedResource`
pub fn parse(uri: &str) -> ProviderResult<Url> {
    Url::parse(uri).map_err(|_| ProviderError::unrecognized(uri))
}

/// The collection identifier for all items
pub fn items_uri() -> Url {
    // The contract constants always form a valid URL.
    Url::parse(&items::content_uri()).expect("contract URI is valid")
}

/// The identifier of a single item
pub fn item_uri(id: i64) -> Url {
    with_appended_id(&items_uri(), id)
}

/// Append an id as a new final path segment
///
/// Any query or fragment on `uri` is dropped.
pub fn with_appended_id(uri: &Url, id: i64) -> Url {
    let mut appended = uri.clone();
    appended.set_query(None);
    appended.set_fragment(None);
    if let Ok(mut segments) = appended.path_segments_mut() {
        segments.pop_if_empty().push(&id.to_string());
    }
    appended
}

/// Read the id from the final path segment, if it is a decimal integer
pub fn parse_id(uri: &Url) -> Option<i64> {
    path_segments(uri).last().and_then(|s| parse_decimal_id(s))
}

/// Non-empty path segments of an identifier
pub(crate) fn path_segments(uri: &Url) -> Vec<&str> {
    uri.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Whether `ancestor` is `uri` itself or one of its path prefixes
pub(crate) fn is_ancestor_or_self(ancestor: &Url, uri: &Url) -> bool {
    if ancestor.scheme() != uri.scheme() || ancestor.host_str() != uri.host_str() {
        return false;
    }
    let prefix = path_segments(ancestor);
    let full = path_segments(uri);
    prefix.len() <= full.len() && prefix.iter().zip(full.iter()).all(|(a, b)| a == b)
}

fn parse_decimal_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_collection() {
        let (_, route) =
            Route::resolve_str("content://com.example.android.inventoryapp/items").unwrap();
        assert_eq!(route, Route::Collection);
        assert_eq!(route.kind(), ResourceKind::Collection);

        // Trailing slash is tolerated
        let (_, route) =
            Route::resolve_str("content://com.example.android.inventoryapp/items/").unwrap();
        assert_eq!(route, Route::Collection);
    }

    #[test]
    fn test_resolve_item() {
        let (_, route) =
            Route::resolve_str("content://com.example.android.inventoryapp/items/42").unwrap();
        assert_eq!(route, Route::Item(42));
        assert_eq!(route.kind(), ResourceKind::Item);
    }

    #[test]
    fn test_resolve_rejects_unknown_shapes() {
        let bad = [
            "content://com.example.android.inventoryapp/bogus",
            "content://com.example.android.inventoryapp/items/abc",
            "content://com.example.android.inventoryapp/items/-1",
            "content://com.example.android.inventoryapp/items/1/2",
            "content://com.example.android.inventoryapp",
            "content://other.authority/items",
            "https://com.example.android.inventoryapp/items",
            "not a uri",
        ];

        for uri in bad {
            let err = Route::resolve_str(uri).unwrap_err();
            assert!(
                matches!(err, ProviderError::UnrecognizedResource { .. }),
                "expected {} to be unrecognized",
                uri
            );
        }
    }

    #[test]
    fn test_id_overflow_is_unrecognized() {
        let uri = "content://com.example.android.inventoryapp/items/99999999999999999999";
        assert!(Route::resolve_str(uri).is_err());
    }

    #[test]
    fn test_with_appended_id() {
        let uri = with_appended_id(&items_uri(), 7);
        assert_eq!(
            uri.as_str(),
            "content://com.example.android.inventoryapp/items/7"
        );
        assert_eq!(parse_id(&uri), Some(7));
        assert_eq!(parse_id(&items_uri()), None);

        let trailing = parse("content://com.example.android.inventoryapp/items/").unwrap();
        assert_eq!(with_appended_id(&trailing, 3), item_uri(3));

        let decorated =
            parse("content://com.example.android.inventoryapp/items?x=1#top").unwrap();
        assert_eq!(with_appended_id(&decorated, 4), item_uri(4));
    }

    #[test]
    fn test_is_ancestor_or_self() {
        let items = items_uri();
        let item = item_uri(5);

        assert!(is_ancestor_or_self(&items, &item));
        assert!(is_ancestor_or_self(&item, &item));
        assert!(!is_ancestor_or_self(&item, &items));
        assert!(!is_ancestor_or_self(&item_uri(6), &item));
    }
}
