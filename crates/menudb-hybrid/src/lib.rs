//! menudb-hybrid
//!
//! Builds retrieval plans (similarity, lexical, or a weighted fusion of
//! both), runs them through the injected collaborators, and shapes results.
pub mod catalog;
pub mod fusion;
pub mod plan;
pub mod service;
pub mod text;
pub mod vector;

pub use catalog::CatalogLister;
pub use plan::{build_plan, PlanRequest, RetrievalPlan};
pub use service::{SearchIndexes, SearchService};
