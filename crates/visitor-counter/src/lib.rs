//! Top-level facade crate for the visitor counter.
//!
//! Re-exports the envelope/error contracts and the counter service so users can depend on a single crate.

pub mod core {
    pub use visitor_core::*;
}

pub mod api {
    pub use visitor_api::*;
}
