//! Generation load orchestration
//!
//! Owns the collection of loaded groups and decides when a group load is
//! admitted. A group id can only have one load running at a time; different
//! groups may load concurrently. The type-scoped mode swaps the whole
//! collection for a single synthetic group.

pub mod tracker;

pub use tracker::{InFlightGuard, LoadTracker};

use crate::batch::{BatchFetcher, BatchOutcome};
use crate::config::{self, GENERATIONS};
use crate::error::Result;
use crate::models::{Group, GroupStatus, Record, TYPE_GROUP_ID};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const GENERATION_LOAD_FAILED: &str = "Failed to load generation";
pub const TYPE_LOAD_FAILED: &str = "Failed to load type";

/// Why a load request did not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLoaded,
    InFlight,
    UnknownGroup,
    NoMoreGroups,
    /// The collection holds a type-scoped result
    TypeMode,
}

/// Result of a load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded {
        group_id: i32,
        records: usize,
        dropped: usize,
    },
    Failed {
        group_id: i32,
        message: String,
    },
    Skipped {
        group_id: Option<i32>,
        reason: SkipReason,
    },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LoadOutcome::Skipped { .. })
    }
}

/// Tracks and drives group loads
pub struct GenerationOrchestrator {
    fetcher: BatchFetcher,
    tracker: Arc<LoadTracker>,
    groups: Mutex<Vec<Group>>,
}

impl GenerationOrchestrator {
    pub fn new(fetcher: BatchFetcher, tracker: Arc<LoadTracker>) -> Self {
        Self {
            fetcher,
            tracker,
            groups: Mutex::new(Vec::new()),
        }
    }

    pub fn fetcher(&self) -> &BatchFetcher {
        &self.fetcher
    }

    pub fn tracker(&self) -> &Arc<LoadTracker> {
        &self.tracker
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Group>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the group with `group_id`; false if it is gone
    fn update_group<F>(&self, group_id: i32, f: F) -> bool
    where
        F: FnOnce(&mut Group),
    {
        match self.lock().iter_mut().find(|g| g.id == group_id) {
            Some(group) => {
                f(group);
                true
            }
            None => false,
        }
    }

    // ── Snapshots ────────────────────────────────────────────────────

    /// All groups, ordered by id
    pub fn groups(&self) -> Vec<Group> {
        self.lock().clone()
    }

    pub fn group(&self, group_id: i32) -> Option<Group> {
        self.lock().iter().find(|g| g.id == group_id).cloned()
    }

    pub fn status(&self, group_id: i32) -> Option<GroupStatus> {
        self.lock().iter().find(|g| g.id == group_id).map(|g| g.status)
    }

    /// Every loaded record across groups, in group order
    pub fn records(&self) -> Vec<Record> {
        self.lock()
            .iter()
            .flat_map(|g| g.records.iter().cloned())
            .collect()
    }

    /// True while any load is running
    pub fn is_loading(&self) -> bool {
        !self.tracker.is_idle()
    }

    pub fn in_type_mode(&self) -> bool {
        self.lock().iter().any(Group::is_type_group)
    }

    fn has_generation_groups(&self) -> bool {
        self.lock().iter().any(|g| !g.is_type_group())
    }

    // ── Generation loads ─────────────────────────────────────────────

    /// Load one generation unless it is loaded or already loading.
    ///
    /// A failed generation can be requested again; that is the retry path.
    pub async fn request_load(&self, group_id: i32) -> LoadOutcome {
        let generation = match config::require_generation(group_id) {
            Ok(generation) => generation,
            Err(e) => {
                log::warn!("Ignoring load request: {}", e);
                return LoadOutcome::Skipped {
                    group_id: Some(group_id),
                    reason: SkipReason::UnknownGroup,
                };
            }
        };

        let Some(_guard) = self.tracker.try_begin(group_id) else {
            log::debug!("Generation {} is already loading", group_id);
            return LoadOutcome::Skipped {
                group_id: Some(group_id),
                reason: SkipReason::InFlight,
            };
        };

        if self.status(group_id) == Some(GroupStatus::Loaded) {
            return LoadOutcome::Skipped {
                group_id: Some(group_id),
                reason: SkipReason::AlreadyLoaded,
            };
        }

        {
            let mut groups = self.lock();
            groups.retain(|g| !g.is_type_group());
            let index = match groups.iter().position(|g| g.id == group_id) {
                Some(index) => index,
                None => {
                    let at = groups.partition_point(|g| g.id < group_id);
                    groups.insert(
                        at,
                        Group::pending(group_id, generation.name, Some(generation.range)),
                    );
                    at
                }
            };
            groups[index].start_loading();
        }

        let range = generation.range;
        log::info!(
            "Loading generation {} ({}): ids {}-{}",
            group_id,
            generation.name,
            range.min,
            range.max
        );

        let result = self
            .fetcher
            .fetch_range(range.offset(), i64::from(range.len()))
            .await;

        self.finish(group_id, result, GENERATION_LOAD_FAILED)
    }

    /// Load the lowest-numbered generation not yet in the collection.
    ///
    /// Refused while a type-scoped result is shown; leaving type mode is
    /// the only way back to generation paging.
    pub async fn load_next(&self) -> LoadOutcome {
        if self.in_type_mode() {
            log::debug!("Not paging generations while in type mode");
            return LoadOutcome::Skipped {
                group_id: None,
                reason: SkipReason::TypeMode,
            };
        }
        let present: Vec<i32> = self.lock().iter().map(|g| g.id).collect();
        match GENERATIONS.iter().find(|g| !present.contains(&g.id)) {
            Some(next) => self.request_load(next.id).await,
            None => LoadOutcome::Skipped {
                group_id: None,
                reason: SkipReason::NoMoreGroups,
            },
        }
    }

    /// Load the first generation if no generation group exists yet
    pub async fn ensure_initial(&self) -> Option<LoadOutcome> {
        if self.has_generation_groups() {
            return None;
        }
        Some(self.request_load(GENERATIONS[0].id).await)
    }

    // ── Type-scoped loads ────────────────────────────────────────────

    /// Replace the collection with every member of a type
    pub async fn load_type(&self, tag: &str) -> LoadOutcome {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            return LoadOutcome::Skipped {
                group_id: Some(TYPE_GROUP_ID),
                reason: SkipReason::UnknownGroup,
            };
        }

        let Some(_guard) = self.tracker.try_begin(TYPE_GROUP_ID) else {
            log::debug!("A type load is already running, ignoring {}", tag);
            return LoadOutcome::Skipped {
                group_id: Some(TYPE_GROUP_ID),
                reason: SkipReason::InFlight,
            };
        };

        {
            let mut group = Group::pending(TYPE_GROUP_ID, format!("Type: {}", tag), None);
            group.start_loading();
            *self.lock() = vec![group];
        }

        log::info!("Loading all records of type {}", tag);

        let result = self.fetch_type(&tag).await;
        self.finish(TYPE_GROUP_ID, result, TYPE_LOAD_FAILED)
    }

    async fn fetch_type(&self, tag: &str) -> Result<BatchOutcome> {
        let members = self.fetcher.gateway().type_members(tag).await?;
        Ok(self.fetcher.resolve_stubs(&members.stubs()).await)
    }

    /// Drop the synthetic type group, if any
    pub fn leave_type_mode(&self) {
        self.lock().retain(|g| !g.is_type_group());
    }

    /// Record the result of a load in its group
    fn finish(&self, group_id: i32, result: Result<BatchOutcome>, failure: &str) -> LoadOutcome {
        match result {
            Ok(outcome) => {
                let records = outcome.records.len();
                let dropped = outcome.dropped.len();
                if !self.update_group(group_id, |g| g.finish_loaded(outcome.records)) {
                    log::debug!("Group {} left the collection while loading", group_id);
                }
                log::info!(
                    "Group {} loaded: {} records ({} dropped)",
                    group_id,
                    records,
                    dropped
                );
                LoadOutcome::Loaded {
                    group_id,
                    records,
                    dropped,
                }
            }
            Err(e) => {
                log::error!("Group {} failed to load: {}", group_id, e);
                self.update_group(group_id, |g| g.finish_failed(failure));
                LoadOutcome::Failed {
                    group_id,
                    message: failure.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
