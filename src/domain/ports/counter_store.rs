//! Counter Store Port
//!
//! Defines the interface to the key-value store that owns the counter.
//! Implementations may use Redis or in-memory storage.

use crate::domain::error::StoreError;
use crate::domain::value_objects::CounterKey;
use async_trait::async_trait;

/// Store holding named integer counters.
///
/// This is an outbound port. The increment must be atomic at the store:
/// callers never read-modify-write, so concurrent requests cannot lose
/// or double-count a view. Implementations do not retry.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter and return the new value.
    ///
    /// An absent key is treated as 0, so the first increment returns 1.
    async fn incr(&self, key: &CounterKey) -> Result<i64, StoreError>;

    /// Read the counter, or None if it has never been set.
    async fn get(&self, key: &CounterKey) -> Result<Option<i64>, StoreError>;

    /// Overwrite the counter.
    async fn set(&self, key: &CounterKey, value: i64) -> Result<(), StoreError>;
}
