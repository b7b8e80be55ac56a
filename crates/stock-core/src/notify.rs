//! Change notification registry
//!
//! Observers register a callback against a resource identifier. When
//! `notify_change(uri)` fires, an observer registered at `O` is called if:
//!
//! - `O` is `uri` itself,
//! - `O` lies below `uri` (a change to the collection touches every item), or
//! - `O` lies above `uri` and asked for descendant notifications.
//!
//! Callbacks run synchronously on the notifying thread, after the registry
//! lock has been released, so a callback may register or unregister freely.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;
use url::Url;

use crate::uri::is_ancestor_or_self;

/// Callback invoked with the identifier that changed
pub type ChangeCallback = Arc<dyn Fn(&Url) + Send + Sync>;

/// Handle returned by `register`, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Observer {
    uri: Url,
    notify_for_descendants: bool,
    callback: ChangeCallback,
}

impl Observer {
    fn wants(&self, changed: &Url) -> bool {
        is_ancestor_or_self(changed, &self.uri)
            || (self.notify_for_descendants && is_ancestor_or_self(&self.uri, changed))
    }
}

/// Registry of change observers keyed by resource identifier
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Mutex<HashMap<SubscriptionId, Observer>>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for changes at `uri`
    pub fn register<F>(&self, uri: &Url, notify_for_descendants: bool, callback: F) -> SubscriptionId
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let observer = Observer {
            uri: uri.clone(),
            notify_for_descendants,
            callback: Arc::new(callback),
        };
        self.lock().insert(id, observer);
        debug!("Registered observer {} on {}", id, uri);
        id
    }

    /// Remove a registration; returns false if it was already gone
    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            debug!("Unregistered observer {}", id);
        }
        removed
    }

    /// Tell every interested observer that `uri` changed
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify_change(&self, uri: &Url) -> usize {
        let mut matched: Vec<(SubscriptionId, ChangeCallback)> = self
            .lock()
            .iter()
            .filter(|(_, observer)| observer.wants(uri))
            .map(|(id, observer)| (*id, Arc::clone(&observer.callback)))
            .collect();
        matched.sort_by_key(|(id, _)| *id);

        debug!("Change at {} -> {} observer(s)", uri, matched.len());
        for (_, callback) in &matched {
            callback(uri);
        }
        matched.len()
    }

    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SubscriptionId, Observer>> {
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}
