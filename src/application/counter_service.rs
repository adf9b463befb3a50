//! Counter Service - Main application use case
//!
//! Handles a page view: one atomic increment on the counter store,
//! surfaced to the inbound adapter as either a count or a store error.

use crate::domain::entities::PageViews;
use crate::domain::error::StoreError;
use crate::domain::ports::CounterStore;
use crate::domain::value_objects::CounterKey;
use std::sync::Arc;

/// Counter service - main application use case.
///
/// Owns the injected store handle for the lifetime of the process;
/// every request goes through the same handle.
pub struct CounterService {
    store: Arc<dyn CounterStore>,
    key: CounterKey,
}

impl CounterService {
    /// Create a new counter service.
    pub fn new(store: Arc<dyn CounterStore>, key: CounterKey) -> Self {
        Self { store, key }
    }

    /// Record one page view.
    ///
    /// Issues exactly one increment. A failed increment is returned
    /// as-is and never retried.
    pub async fn record_view(&self) -> Result<PageViews, StoreError> {
        let count = self.store.incr(&self.key).await?;
        tracing::debug!(key = %self.key, count, "recorded page view");
        Ok(PageViews::new(count))
    }

    /// Read the current count without recording a view.
    pub async fn current_views(&self) -> Result<Option<PageViews>, StoreError> {
        Ok(self.store.get(&self.key).await?.map(PageViews::new))
    }

    /// Overwrite the counter. Test harnesses use this for isolation.
    pub async fn reset_views(&self, value: i64) -> Result<(), StoreError> {
        self.store.set(&self.key, value).await?;
        tracing::debug!(key = %self.key, value, "reset page views");
        Ok(())
    }

    pub fn key(&self) -> &CounterKey {
        &self.key
    }

    /// The shared store handle.
    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }
}
