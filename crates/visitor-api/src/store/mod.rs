//! Durable counter storage.
//!
//! The only shared mutable state of the service lives behind `CounterStore`.
//! Backends must perform add-and-read as one store-level operation: callers
//! never issue a separate get and put, so parallel invocations cannot lose an
//! increment.

pub mod memory;
pub mod redis;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use visitor_core::error::Result;

use crate::config::{StoreBackend, StoreSection};

pub use self::memory::{AttributeValue, MemoryStore};
pub use self::redis::RedisStore;

/// Address of a numeric attribute on a counter record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub table: String,
    pub id: String,
    pub attribute: String,
}

impl RecordKey {
    pub fn new(table: &str, id: &str, attribute: &str) -> Self {
        Self {
            table: table.to_string(),
            id: id.to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// Record identity without the attribute (`table:id`).
    pub fn record_id(&self) -> String {
        format!("{}:{}", self.table, self.id)
    }
}

impl Default for RecordKey {
    fn default() -> Self {
        Self::new("visitors", "count", "visits")
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.table, self.id, self.attribute)
    }
}

/// Atomic numeric storage for counter records.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Backend name for logs and metric labels.
    fn backend(&self) -> &'static str;

    /// Add `delta` to the attribute and return the post-add value, atomically.
    /// A missing record or attribute counts as 0.
    async fn add_and_get(&self, key: &RecordKey, delta: u64) -> Result<u64>;
}

/// Build the configured backend. Redis connects eagerly so a bad url fails at boot.
pub async fn build_store(cfg: &StoreSection) -> Result<Arc<dyn CounterStore>> {
    match cfg.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Redis => {
            let url = cfg.redis_url.as_deref().unwrap_or_default();
            let timeout = Duration::from_millis(cfg.connect_timeout_ms);
            let store = RedisStore::connect(url, timeout).await?;
            Ok(Arc::new(store))
        }
    }
}
