//! AWS-oriented adapters and handlers for resolving CloudFormation exports.
//!
//! This crate owns runtime integration details (the custom resource handler,
//! the export listing and response delivery seams, env configuration and
//! structured logging). Contract and matching primitives come from
//! `export_resolver_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
