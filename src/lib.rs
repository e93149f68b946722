//! dex_catalog - creature catalog browsing core
//!
//! Loads records from a PokeAPI-style upstream in generation-sized groups,
//! caches responses for a limited time, and computes the filtered view the
//! presentation layer renders.

pub mod api;
pub mod batch;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod filter;
pub mod models;
pub mod orchestrator;
pub mod search;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use api::HttpGateway;
pub use batch::{BatchFetcher, BatchOutcome, DroppedItem};
pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use catalog::{Catalog, CatalogView, GroupView};
pub use config::{Config, Generation, IdRange, GENERATIONS};
pub use detail::{DetailResolver, EvolutionMember, RecordDetail};
pub use error::{CatalogError, Result};
pub use filter::visible;
pub use models::{FilterCriteria, Group, GroupStatus, Record, TYPE_GROUP_ID};
pub use orchestrator::{GenerationOrchestrator, LoadOutcome, LoadTracker, SkipReason};
