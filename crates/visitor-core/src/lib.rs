//! Visitor counter core: response envelope, tagged outcome, and error types.
//!
//! This crate defines the HTTP-facing contract of the counter service
//! (status, headers, JSON body) and the error surface shared by the service
//! and its store backends. It carries no transport or runtime dependencies so
//! the same envelope can be produced behind axum, a function runtime, or tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible
//! path surfaces as `CounterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod envelope;
pub mod error;

pub use envelope::{ApiResponse, CountBody, ErrorBody, Outcome};
pub use error::{CounterError, FailureKind, Result};
