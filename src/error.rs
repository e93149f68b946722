//! Error types for dex_catalog

use crate::batch::DroppedItem;
use crate::models::Record;
use thiserror::Error;

/// Unified error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection refused, TLS, body read, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream answered with a non-success status code
    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Payload did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// One or more item fetches in a batch failed
    #[error("{} item(s) failed to load, {} succeeded", dropped.len(), records.len())]
    PartialBatch {
        records: Vec<Record>,
        dropped: Vec<DroppedItem>,
    },
    /// Group id not present in the generation table
    #[error("Unknown generation: {0}")]
    UnknownGeneration(i32),
    /// Configuration failed validation
    #[error("Invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),
}

impl CatalogError {
    /// True for failures of a single upstream request (transport or status)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_) | CatalogError::HttpStatus { .. }
        )
    }
}

/// Result alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
