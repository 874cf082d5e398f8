//! # Redis
//!
//! Durable store for the counter record.
//!
//! ## Layout
//!
//! - One hash per record, key `"{table}:{id}"`
//! - The counted attribute is a hash field (`visits` by default)
//! - `HINCRBY` does add-and-read server side, so concurrent requests queue
//!   inside redis instead of racing in the service
//! - A missing hash or field is treated as 0 by redis, which gives the
//!   "first visit returns 1" behavior without a seeding step
//!
//! ## Connection
//!
//! A `ConnectionManager` is shared by all requests. It reconnects on its own
//! after a dropped connection; the request that observed the drop still
//! fails and surfaces as a store failure.
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, ErrorKind, RedisError};

use visitor_core::error::{CounterError, Result};

use super::{CounterStore, RecordKey};

pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::open(url)
            .map_err(|e| CounterError::BadConfig(format!("invalid redis url: {e}")))?;

        let conn = tokio::time::timeout(timeout, client.get_connection_manager())
            .await
            .map_err(|_| {
                CounterError::Unavailable(format!("redis connect timed out after {timeout:?}"))
            })?
            .map_err(classify)?;

        tracing::info!(url = %redact(url), "redis store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn add_and_get(&self, key: &RecordKey, delta: u64) -> Result<u64> {
        let delta = i64::try_from(delta)
            .map_err(|_| CounterError::Internal(format!("delta {delta} out of range")))?;

        let mut conn = self.conn.clone();
        let value: i64 = conn
            .hincr(key.record_id(), &key.attribute, delta)
            .await
            .map_err(classify)?;

        u64::try_from(value)
            .map_err(|_| CounterError::MalformedRecord(format!("{key} is negative ({value})")))
    }
}

/// Sort a redis error into the store failure taxonomy.
pub(crate) fn classify(e: RedisError) -> CounterError {
    let msg = e.to_string();
    if e.is_io_error() || e.is_timeout() || e.is_connection_refusal() || e.is_connection_dropped() {
        return CounterError::Unavailable(msg);
    }
    match e.kind() {
        ErrorKind::AuthenticationFailed => CounterError::PermissionDenied(msg),
        ErrorKind::BusyLoadingError | ErrorKind::TryAgain => CounterError::Throttled(msg),
        ErrorKind::TypeError => CounterError::MalformedRecord(msg),
        ErrorKind::ResponseError if msg.contains("not an integer") => {
            CounterError::MalformedRecord(msg)
        }
        ErrorKind::ResponseError if msg.contains("NOPERM") || msg.contains("NOAUTH") => {
            CounterError::PermissionDenied(msg)
        }
        _ => CounterError::Internal(msg),
    }
}

/// Strip credentials from a redis url before logging it.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            format!("{}://***{}", &url[..scheme], &url[at..])
        }
        _ => url.to_string(),
    }
}
