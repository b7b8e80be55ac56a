//! Read-through inventory list
//!
//! `InventoryList` is the consumer the provider is built for: it keeps the
//! last result of a collection query and re-runs it only after the notifier
//! reports a change somewhere under the collection identifier.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::contract::items;
use crate::error::ProviderResult;
use crate::models::Item;
use crate::notify::SubscriptionId;
use crate::provider::StockProvider;
use crate::uri::items_uri;

pub struct InventoryList {
    provider: Arc<StockProvider>,
    subscription: SubscriptionId,
    stale: Arc<AtomicBool>,
    rows: Vec<Item>,
    loads: usize,
}

impl InventoryList {
    /// Subscribe to the item collection; the first `rows()` call loads it
    pub fn new(provider: Arc<StockProvider>) -> Self {
        let stale = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&stale);
        let subscription = provider
            .notifier()
            .register(&items_uri(), true, move |_| flag.store(true, Ordering::SeqCst));

        Self {
            provider,
            subscription,
            stale,
            rows: Vec::new(),
            loads: 0,
        }
    }

    /// Whether a change has been reported since the last load
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Current rows, requerying first if the data changed
    pub fn rows(&mut self) -> ProviderResult<&[Item]> {
        if self.stale.swap(false, Ordering::SeqCst) {
            match self.reload() {
                Ok(rows) => self.rows = rows,
                Err(e) => {
                    self.stale.store(true, Ordering::SeqCst);
                    return Err(e);
                }
            }
        }
        Ok(&self.rows)
    }

    /// Number of times the list has hit the store
    pub fn load_count(&self) -> usize {
        self.loads
    }

    fn reload(&mut self) -> ProviderResult<Vec<Item>> {
        self.loads += 1;
        debug!("Reloading inventory list (load #{})", self.loads);
        let sort = format!("{} ASC", items::NAME);
        self.provider
            .query(items_uri(), None, None, &[], Some(&sort))?
            .to_items()
    }
}

impl Drop for InventoryList {
    fn drop(&mut self) {
        self.provider.notifier().unregister(self.subscription);
    }
}
