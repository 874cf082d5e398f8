//! Visitor counter service library entry.
//!
//! Wires config, the counter store, the counter operation, and the
//! operational endpoints into an axum app. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod counter;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
pub mod store;
