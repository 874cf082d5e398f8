//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use visitor_core::error::{CounterError, Result};

pub use schema::{CounterConfig, ServerSection, StoreBackend, StoreSection};

/// Environment variable consulted when no path is passed on the command line.
pub const CONFIG_ENV: &str = "VISITOR_COUNTER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "visitor-counter.yaml";

pub fn load_from_file(path: &str) -> Result<CounterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CounterError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CounterConfig> {
    let cfg: CounterConfig = serde_yaml::from_str(s)
        .map_err(|e| CounterError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config path: first CLI argument, then `VISITOR_COUNTER_CONFIG`, then the default.
pub fn resolve_path(cli_arg: Option<String>) -> String {
    cli_arg
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}
