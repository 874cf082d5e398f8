//! Shared application state for the counter service.
//!
//! The service itself is stateless between requests: this only holds handles
//! (store client, record address, metrics) that every request reuses.

use std::sync::Arc;

use visitor_core::error::Result;

use crate::config::CounterConfig;
use crate::obs::CounterMetrics;
use crate::store::{self, CounterStore, RecordKey};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: CounterConfig,
    record: RecordKey,
    store: Arc<dyn CounterStore>,
    metrics: CounterMetrics,
}

impl AppState {
    /// Build state and connect the configured store.
    /// Returns Result so main can report a bad store setup instead of panicking.
    pub async fn new(cfg: CounterConfig) -> Result<Self> {
        let store = store::build_store(&cfg.store).await?;
        Ok(Self::with_store(cfg, store))
    }

    /// Build state around an existing store (tests, embedding).
    pub fn with_store(cfg: CounterConfig, store: Arc<dyn CounterStore>) -> Self {
        let record = cfg.store.record_key();
        tracing::info!(backend = store.backend(), record = %record, "counter store ready");
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                record,
                store,
                metrics: CounterMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &CounterConfig {
        &self.inner.cfg
    }

    pub fn record_key(&self) -> &RecordKey {
        &self.inner.record
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn metrics(&self) -> &CounterMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
