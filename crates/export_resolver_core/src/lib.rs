//! Shared export resolver domain primitives.
//!
//! This crate owns request/response contracts, export filter matching and
//! identifier derivation. It intentionally excludes AWS SDK and Lambda
//! runtime concerns, which live in `export_resolver_lambda`.

pub mod contract;
pub mod error;
pub mod filters;
