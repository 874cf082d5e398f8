//! In-process store used for local runs and tests.
//!
//! Records live in a `DashMap`; `add_and_get` holds the record's shard write
//! lock across read, add and write, which makes it atomic with respect to
//! every other caller.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use visitor_core::error::{CounterError, Result};

use super::{CounterStore, RecordKey};

/// Attribute value as stored on a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Number(i64),
    Text(String),
}

#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, HashMap<String, AttributeValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Overwrite one attribute, creating the record if needed.
    pub fn put_attribute(&self, key: &RecordKey, value: AttributeValue) {
        self.records
            .entry(key.record_id())
            .or_default()
            .insert(key.attribute.clone(), value);
    }

    pub fn get_attribute(&self, key: &RecordKey) -> Option<AttributeValue> {
        self.records
            .get(&key.record_id())
            .and_then(|r| r.value().get(&key.attribute).cloned())
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn add_and_get(&self, key: &RecordKey, delta: u64) -> Result<u64> {
        let delta = i64::try_from(delta)
            .map_err(|_| CounterError::Internal(format!("delta {delta} out of range")))?;

        let mut record = self.records.entry(key.record_id()).or_default();
        let slot = record
            .entry(key.attribute.clone())
            .or_insert(AttributeValue::Number(0));

        let current = match slot {
            AttributeValue::Number(n) => *n,
            AttributeValue::Text(_) => {
                return Err(CounterError::MalformedRecord(format!(
                    "{key} is not a number"
                )))
            }
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| CounterError::MalformedRecord(format!("{key} would overflow")))?;
        let out = u64::try_from(next)
            .map_err(|_| CounterError::MalformedRecord(format!("{key} is negative ({next})")))?;

        *slot = AttributeValue::Number(next);
        Ok(out)
    }
}
