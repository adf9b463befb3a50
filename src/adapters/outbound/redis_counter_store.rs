//! Redis Counter Store
//!
//! Implements CounterStore on top of a shared multiplexed Redis connection.
//! The connection is opened on first use and reused until it breaks; the
//! request after a broken connection opens a new one.

use crate::domain::error::StoreError;
use crate::domain::ports::CounterStore;
use crate::domain::value_objects::CounterKey;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, ErrorKind, RedisError};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Redis-backed counter store.
///
/// Construction only parses the connection string; no network traffic
/// happens until the first command. Each command makes at most one connect
/// attempt and is never retried. A connect that fails is not cached, and a
/// connection that fails with a connectivity error is dropped, so the next
/// command starts fresh. Changing the URL requires building a new adapter
/// (in practice, restarting the process).
pub struct RedisCounterStore {
    client: Client,
    /// Current connection tagged with the attempt that opened it.
    conn: Mutex<Option<(usize, MultiplexedConnection)>>,
    connect_attempts: AtomicUsize,
}

impl RedisCounterStore {
    /// Parse `url` (`redis://host:port[/db]`) and build a lazy adapter.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        let client = Client::open(url).map_err(classify)?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
            connect_attempts: AtomicUsize::new(0),
        })
    }

    /// Number of times a connection has been attempted.
    ///
    /// Stays at 1 while the first connection stays healthy.
    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    /// Whether a shared connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    async fn connection(&self) -> Result<(usize, MultiplexedConnection), StoreError> {
        // Held across the connect so concurrent requests share one attempt.
        let mut slot = self.conn.lock().await;
        if let Some((attempt, conn)) = slot.as_ref() {
            // Clones share the same underlying connection.
            return Ok((*attempt, conn.clone()));
        }

        let attempt = self.connect_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(attempt, "connecting to redis");
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(classify)?;
        tracing::info!(attempt, "redis connection established");

        *slot = Some((attempt, conn.clone()));
        Ok((attempt, conn))
    }

    /// Drop the connection opened by `attempt` if `result` shows it is broken.
    async fn settle<T>(
        &self,
        attempt: usize,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        if let Err(err) = &result {
            if err.is_connectivity() {
                let mut slot = self.conn.lock().await;
                // Another request may already have replaced it.
                if matches!(slot.as_ref(), Some((current, _)) if *current == attempt) {
                    tracing::warn!(attempt, error = %err, "discarding broken redis connection");
                    *slot = None;
                }
            }
        }
        result
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &CounterKey) -> Result<i64, StoreError> {
        let (attempt, mut conn) = self.connection().await?;
        let result = conn.incr(key.as_str(), 1i64).await.map_err(classify);
        self.settle(attempt, result).await
    }

    async fn get(&self, key: &CounterKey) -> Result<Option<i64>, StoreError> {
        let (attempt, mut conn) = self.connection().await?;
        let result = conn.get(key.as_str()).await.map_err(classify);
        self.settle(attempt, result).await
    }

    async fn set(&self, key: &CounterKey, value: i64) -> Result<(), StoreError> {
        let (attempt, mut conn) = self.connection().await?;
        let result = conn.set(key.as_str(), value).await.map_err(classify);
        self.settle(attempt, result).await
    }
}

/// Map a Redis client error onto the store error taxonomy.
fn classify(err: RedisError) -> StoreError {
    let detail = err.to_string();
    if err.is_timeout() {
        StoreError::Timeout(detail)
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        StoreError::Connection(detail)
    } else {
        match err.kind() {
            ErrorKind::TypeError => StoreError::Type(detail),
            ErrorKind::InvalidClientConfig => StoreError::InvalidUrl(detail),
            _ => StoreError::Response(detail),
        }
    }
}
