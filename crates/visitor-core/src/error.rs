//! Shared error type across visitor counter crates.

use thiserror::Error;

/// Externally visible failure classes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Configuration rejected at startup.
    Config,
    /// Any error originating from the durable store.
    StoreFailure,
}

impl FailureKind {
    /// String representation used in logs and metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Config => "BAD_CONFIG",
            FailureKind::StoreFailure => "STORE_FAILURE",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, CounterError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store throttled: {0}")]
    Throttled(String),
    #[error("store permission denied: {0}")]
    PermissionDenied(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CounterError {
    /// Map an error to its externally visible class.
    pub fn kind(&self) -> FailureKind {
        match self {
            CounterError::BadConfig(_) | CounterError::UnsupportedVersion => FailureKind::Config,
            CounterError::Unavailable(_)
            | CounterError::Throttled(_)
            | CounterError::PermissionDenied(_)
            | CounterError::MalformedRecord(_)
            | CounterError::Internal(_) => FailureKind::StoreFailure,
        }
    }
}
