//! page-tracker Library
//!
//! A page view counter backed by Redis, laid out as ports and adapters.
//! Exposed as a library so the integration and end-to-end tiers can
//! assemble the same components the binary does.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{router, HttpServer};
pub use adapters::outbound::{InMemoryCounterStore, RedisCounterStore};
pub use application::CounterService;
pub use config::{load_config, Config};
pub use domain::entities::{PageViews, APOLOGY_MESSAGE};
pub use domain::error::StoreError;
pub use domain::ports::CounterStore;
pub use domain::value_objects::CounterKey;
