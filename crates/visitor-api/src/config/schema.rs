use std::net::SocketAddr;

use serde::Deserialize;
use visitor_core::error::{CounterError, Result};

use crate::store::RecordKey;

/// Paths owned by the operational endpoints.
const RESERVED_ROUTES: [&str; 3] = ["/healthz", "/readyz", "/metrics"];

/// Characters axum reads as path parameters or wildcards.
const ROUTE_PATTERN_CHARS: [char; 4] = [':', '*', '{', '}'];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub store: StoreSection,
}

impl CounterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CounterError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_route")]
    pub route: String,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            route: default_route(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.route.starts_with('/') || self.route.len() < 2 {
            return Err(CounterError::BadConfig(
                "server.route must start with '/' and name a path".into(),
            ));
        }
        if self.route.contains(ROUTE_PATTERN_CHARS) {
            return Err(CounterError::BadConfig(format!(
                "server.route {} must be a literal path (no ':', '*', '{{' or '}}')",
                self.route
            )));
        }
        if RESERVED_ROUTES.contains(&self.route.as_str()) {
            return Err(CounterError::BadConfig(format!(
                "server.route {} is reserved for operational endpoints",
                self.route
            )));
        }
        if self.shutdown_grace_ms > 60_000 {
            return Err(CounterError::BadConfig(
                "server.shutdown_grace_ms must be between 0 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            CounterError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_route() -> String {
    "/visitors".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

/// No default: `memory` loses the count on restart and must be chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub backend: StoreBackend,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_id")]
    pub id: String,

    #[serde(default = "default_attribute")]
    pub attribute: String,
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=30_000).contains(&self.connect_timeout_ms) {
            return Err(CounterError::BadConfig(
                "store.connect_timeout_ms must be between 10 and 30000".into(),
            ));
        }
        for (name, v) in [
            ("store.table", &self.table),
            ("store.id", &self.id),
            ("store.attribute", &self.attribute),
        ] {
            if v.trim().is_empty() {
                return Err(CounterError::BadConfig(format!("{name} must not be empty")));
            }
        }
        if self.backend == StoreBackend::Redis {
            match self.redis_url.as_deref() {
                Some(url) if url.starts_with("redis://") || url.starts_with("rediss://") => {}
                Some(url) => {
                    return Err(CounterError::BadConfig(format!(
                        "store.redis_url must be a redis:// or rediss:// url, got {url}"
                    )))
                }
                None => {
                    return Err(CounterError::BadConfig(
                        "store.redis_url is required when store.backend is redis".into(),
                    ))
                }
            }
        }
        Ok(())
    }

    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(&self.table, &self.id, &self.attribute)
    }
}

fn default_connect_timeout_ms() -> u64 {
    500
}
fn default_table() -> String {
    "visitors".into()
}
fn default_id() -> String {
    "count".into()
}
fn default_attribute() -> String {
    "visits".into()
}
