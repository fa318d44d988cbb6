//! Parcel Application Layer
//!
//! Ports for the record store, cache engine and external provider, and the
//! use cases that implement the resolution pipeline and mutation path on top
//! of them.
pub mod context;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use context::RequestContext;
