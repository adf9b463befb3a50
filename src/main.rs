//! page-tracker - Page view counter backed by Redis
//!
//! This is the composition root that wires together all the components.

use page_tracker::infrastructure::shutdown_signal;
use page_tracker::{load_config, CounterKey, CounterService, HttpServer, RedisCounterStore};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting page-tracker listen={} counter_key={}",
        cfg.listen_addr,
        cfg.counter_key
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapter: one lazily connected Redis handle for the whole process
    let store = RedisCounterStore::open(&cfg.redis_url)
        .map_err(|e| anyhow::anyhow!("invalid REDIS_URL {:?}: {}", cfg.redis_url, e))?;
    tracing::debug!("redis client configured for {}", cfg.redis_url);

    // 2. Application service
    let service = Arc::new(CounterService::new(
        Arc::new(store),
        CounterKey::new(cfg.counter_key.clone()),
    ));

    // 3. Inbound adapter
    let server = HttpServer::new(cfg.listen_addr.clone(), service);

    server.run(shutdown_signal()).await
}
