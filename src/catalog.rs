//! Catalog session: the surface the presentation layer talks to
//!
//! Holds the current filter criteria, turns user intents into loads and
//! derives what each group should show.

use crate::api::HttpGateway;
use crate::batch::BatchFetcher;
use crate::cache::{CacheStats, CacheStore};
use crate::config::{self, Config, GENERATIONS};
use crate::detail::{DetailResolver, RecordDetail};
use crate::error::Result;
use crate::filter;
use crate::models::{FilterCriteria, GroupStatus, Record, TYPE_GROUP_ID};
use crate::orchestrator::{GenerationOrchestrator, LoadOutcome, LoadTracker, SkipReason};
use crate::search;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the presentation layer renders for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: i32,
    pub name: String,
    /// Records that pass the current filter
    pub records: Vec<Record>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Full rendered state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogView {
    pub groups: Vec<GroupView>,
    pub visible_count: usize,
    pub type_mode: bool,
}

/// A browsing session over the upstream catalog
pub struct Catalog {
    config: Config,
    orchestrator: GenerationOrchestrator,
    details: DetailResolver,
    criteria: Mutex<FilterCriteria>,
}

impl Catalog {
    /// Build a session with its own cache and load tracker
    pub fn new(config: Config) -> Self {
        let store = Arc::new(CacheStore::new(config.cache_duration));
        Self::with_parts(config, store, Arc::new(LoadTracker::new()))
    }

    /// Build a session around an existing cache store and load tracker
    pub fn with_parts(config: Config, store: Arc<CacheStore>, tracker: Arc<LoadTracker>) -> Self {
        let gateway = Arc::new(HttpGateway::new(&config, store));
        let fetcher = BatchFetcher::from_config(Arc::clone(&gateway), &config);
        let details = DetailResolver::new(gateway, config.description_languages.clone());

        Self {
            orchestrator: GenerationOrchestrator::new(fetcher, tracker),
            details,
            criteria: Mutex::new(FilterCriteria::default()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    fn lock(&self) -> MutexGuard<'_, FilterCriteria> {
        self.criteria.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.lock().clone()
    }

    // ── Intents ──────────────────────────────────────────────────────

    /// First use: load the first generation
    pub async fn start(&self) -> Option<LoadOutcome> {
        self.orchestrator.ensure_initial().await
    }

    pub async fn search(&self, term: &str) -> Option<LoadOutcome> {
        let term = term.trim().to_string();
        self.apply(|c| c.search_term = term).await
    }

    pub async fn filter_by_generation(&self, generation_id: Option<i32>) -> Option<LoadOutcome> {
        self.apply(|c| c.generation_id = generation_id).await
    }

    /// Set or clear the type tag. Tags outside the known set are refused
    /// and leave the criteria untouched.
    pub async fn filter_by_type(&self, type_tag: Option<&str>) -> Option<LoadOutcome> {
        let type_tag = type_tag
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        if let Some(ref tag) = type_tag {
            if !config::is_known_type(tag) {
                log::warn!("Ignoring unknown type filter {:?}", tag);
                return Some(LoadOutcome::Skipped {
                    group_id: Some(TYPE_GROUP_ID),
                    reason: SkipReason::UnknownGroup,
                });
            }
        }

        self.apply(|c| c.type_tag = type_tag).await
    }

    pub async fn load_next_generation(&self) -> LoadOutcome {
        self.orchestrator.load_next().await
    }

    /// "Try again" for a failed group
    pub async fn retry(&self, group_id: i32) -> LoadOutcome {
        if group_id == TYPE_GROUP_ID {
            if let Some(tag) = self.criteria().type_scope() {
                return self.orchestrator.load_type(tag).await;
            }
        }
        self.orchestrator.request_load(group_id).await
    }

    pub async fn select_record(&self, record_id: u32) -> Result<RecordDetail> {
        self.details.resolve(record_id).await
    }

    /// Search the whole upstream index by name, beyond what is loaded
    pub async fn search_upstream(&self, term: &str) -> Result<Vec<Record>> {
        search::search_by_name(
            self.orchestrator.fetcher(),
            term,
            self.config.max_search_results,
        )
        .await
    }

    /// Update the criteria and start whatever load the change calls for
    async fn apply<F>(&self, update: F) -> Option<LoadOutcome>
    where
        F: FnOnce(&mut FilterCriteria),
    {
        let (before, after) = {
            let mut criteria = self.lock();
            let before = criteria.clone();
            update(&mut criteria);
            (before, criteria.clone())
        };

        let scope_before = before.type_scope();
        let scope_after = after.type_scope();

        if scope_before != scope_after {
            return match scope_after {
                Some(tag) => Some(self.orchestrator.load_type(tag).await),
                None => {
                    self.orchestrator.leave_type_mode();
                    match after.generation_id {
                        Some(id) => Some(self.orchestrator.request_load(id).await),
                        None => self.orchestrator.ensure_initial().await,
                    }
                }
            };
        }

        match after.generation_id {
            Some(id) if before.generation_id != Some(id) => {
                Some(self.orchestrator.request_load(id).await)
            }
            _ => None,
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Groups and records as the presentation layer should show them
    pub fn view(&self) -> CatalogView {
        let criteria = self.criteria();
        let type_mode = criteria.type_scope().is_some();

        let groups: Vec<GroupView> = self
            .orchestrator
            .groups()
            .into_iter()
            .filter(|g| type_mode || criteria.generation_id.map_or(true, |id| g.id == id))
            .map(|g| GroupView {
                id: g.id,
                records: filter::visible(&g.records, &criteria),
                loading: g.status == GroupStatus::Loading,
                error: g.error_message,
                name: g.display_name,
            })
            .collect();

        let visible_count = groups.iter().map(|g| g.records.len()).sum();

        CatalogView {
            groups,
            visible_count,
            type_mode,
        }
    }

    /// Every visible record across groups, in group order
    pub fn visible_records(&self) -> Vec<Record> {
        filter::visible(&self.orchestrator.records(), &self.criteria())
    }

    /// Whether another generation can still be requested
    pub fn can_load_more(&self) -> bool {
        !self.orchestrator.is_loading()
            && !self.orchestrator.in_type_mode()
            && self
                .orchestrator
                .groups()
                .iter()
                .filter(|g| !g.is_type_group())
                .count()
                < GENERATIONS.len()
    }

    pub fn clear_cache(&self) {
        self.orchestrator.fetcher().gateway().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.orchestrator.fetcher().gateway().stats()
    }
}
