//! In-Memory Counter Store
//!
//! Implements CounterStore using DashMap. Serves as the store double for
//! tests that must not depend on a running Redis: failures can be injected
//! and every call is recorded.

use crate::domain::error::StoreError;
use crate::domain::ports::CounterStore;
use crate::domain::value_objects::CounterKey;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

/// One operation issued against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Incr(CounterKey),
    Get(CounterKey),
    Set(CounterKey, i64),
}

/// DashMap-backed counter store.
///
/// Increments take the per-key shard lock, so they are atomic just like
/// Redis `INCR`. While a failure is injected, every operation returns it
/// and no value changes.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: DashMap<String, i64>,
    failure: RwLock<Option<StoreError>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl InMemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with `err`.
    pub fn fail_with(&self, err: StoreError) {
        *self.failure.write() = Some(err);
    }

    /// Stop injecting failures.
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// All operations issued so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// How many increments were issued for `key`.
    pub fn incr_calls(&self, key: &CounterKey) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, StoreCall::Incr(k) if k == key))
            .count()
    }

    /// Current value without recording a call.
    pub fn peek(&self, key: &CounterKey) -> Option<i64> {
        self.counters.get(key.as_str()).map(|v| *v)
    }

    fn record(&self, call: StoreCall) -> Result<(), StoreError> {
        self.calls.lock().push(call);
        match self.failure.read().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr(&self, key: &CounterKey) -> Result<i64, StoreError> {
        self.record(StoreCall::Incr(key.clone()))?;
        let mut value = self.counters.entry(key.as_str().to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn get(&self, key: &CounterKey) -> Result<Option<i64>, StoreError> {
        self.record(StoreCall::Get(key.clone()))?;
        Ok(self.peek(key))
    }

    async fn set(&self, key: &CounterKey, value: i64) -> Result<(), StoreError> {
        self.record(StoreCall::Set(key.clone(), value))?;
        self.counters.insert(key.as_str().to_string(), value);
        Ok(())
    }
}
