//! Shared fixtures for the counter service tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use visitor_api::app_state::AppState;
use visitor_api::config::{self, CounterConfig};
use visitor_api::store::{CounterStore, MemoryStore, RecordKey};
use visitor_core::error::{CounterError, Result};

pub fn test_config() -> CounterConfig {
    config::load_from_str("version: 1\nstore:\n  backend: memory\n").expect("minimal config must parse")
}

pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(test_config(), store.clone());
    (state, store)
}

/// Memory store with a switchable outage.
#[derive(Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl FaultyStore {
    pub fn failing() -> Self {
        let s = Self::default();
        s.set_failing(true);
        s
    }

    pub fn set_failing(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for FaultyStore {
    fn backend(&self) -> &'static str {
        "faulty"
    }

    async fn add_and_get(&self, key: &RecordKey, delta: u64) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CounterError::Unavailable("injected outage".into()));
        }
        self.inner.add_and_get(key, delta).await
    }
}
