//! Batched resolution of index stubs into full records
//!
//! Stubs are resolved in fixed-size batches. Requests inside a batch run
//! concurrently; batches run one after another with a pacing delay between
//! them to keep the upstream request rate bounded.

use crate::api::HttpGateway;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{Record, ResourceRef};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// An item whose detail fetch failed and was left out of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    pub name: String,
    pub url: String,
    pub reason: String,
}

/// Records resolved by a batch run, in stub order, plus what was dropped
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    pub dropped: Vec<DroppedItem>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }

    /// All-or-nothing view: any dropped item turns into `PartialBatch`
    pub fn into_strict(self) -> Result<Vec<Record>> {
        if self.dropped.is_empty() {
            Ok(self.records)
        } else {
            Err(CatalogError::PartialBatch {
                records: self.records,
                dropped: self.dropped,
            })
        }
    }
}

/// Paginates the index and resolves details batch by batch
pub struct BatchFetcher {
    gateway: Arc<HttpGateway>,
    batch_size: usize,
    pacing: Duration,
}

impl BatchFetcher {
    pub fn new(gateway: Arc<HttpGateway>, batch_size: usize, pacing: Duration) -> Self {
        Self {
            gateway,
            batch_size: batch_size.max(1),
            pacing,
        }
    }

    pub fn from_config(gateway: Arc<HttpGateway>, config: &Config) -> Self {
        Self::new(gateway, config.batch_size, config.batch_pacing)
    }

    pub fn gateway(&self) -> &Arc<HttpGateway> {
        &self.gateway
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolve the records listed at `[offset, offset + limit)` of the index.
    ///
    /// A failing index request is returned as an error. Failing detail
    /// requests are dropped from the outcome and logged.
    pub async fn fetch_range(&self, offset: u32, limit: i64) -> Result<BatchOutcome> {
        if limit <= 0 {
            return Ok(BatchOutcome::default());
        }
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);

        let index = self.gateway.list_page(limit, offset).await?;
        log::debug!(
            "Index page offset={} limit={} returned {} stubs",
            offset,
            limit,
            index.results.len()
        );

        Ok(self.resolve_stubs(&index.results).await)
    }

    /// Resolve an arbitrary stub list with the same batching and pacing
    pub async fn resolve_stubs(&self, stubs: &[ResourceRef]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (n, batch) in stubs.chunks(self.batch_size).enumerate() {
            if n > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let results = join_all(batch.iter().map(|stub| self.gateway.record_for(stub))).await;

            for (stub, result) in batch.iter().zip(results) {
                match result {
                    Ok(record) => outcome.records.push(record),
                    Err(e) => {
                        log::warn!("Dropping {} ({}): {}", stub.name, stub.url, e);
                        outcome.dropped.push(DroppedItem {
                            name: stub.name.clone(),
                            url: stub.url.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if !outcome.dropped.is_empty() {
            log::warn!(
                "Resolved {} of {} records, {} dropped",
                outcome.records.len(),
                stubs.len(),
                outcome.dropped.len()
            );
        }

        outcome
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
