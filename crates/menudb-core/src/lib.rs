//! menudb-core
//!
//! Shared building blocks for the product search backend: the loosely-typed
//! document tree returned by the store, structured filters, the aggregation
//! stage vocabulary, request validation, result sanitizing, collaborator
//! traits, configuration and logging.

pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod request;
pub mod sanitize;
pub mod traits;
pub mod types;
