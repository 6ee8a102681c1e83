//! InsightFlow CLI crate
//!
//! `AppService` wires configuration, the durable store, the sync watcher,
//! and the AI client into the operation surface the CLI (the stand-in for
//! the product UI) calls.

pub mod cli;
pub mod service;

pub use service::{AppService, ServiceError, ServiceResult};
