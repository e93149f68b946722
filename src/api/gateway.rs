//! Cached access to the upstream creature API
//!
//! Every GET goes through [`HttpGateway::fetch`], which answers from the
//! [`CacheStore`] while an entry is fresh and only stores successful responses.

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{
    EvolutionChainResponse, ListResponse, PokemonResponse, Record, ResourceRef, SpeciesResponse,
    TypeResponse,
};
use log::Level;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// HTTP client with a time-bounded response cache in front of it
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    default_limit: u32,
    store: Arc<CacheStore>,
    /// Level for cache traffic; raised to info when debug_calls is set
    traffic_level: Level,
}

impl HttpGateway {
    /// Create a gateway using the given cache store
    pub fn new(config: &Config, store: Arc<CacheStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            default_limit: config.default_limit,
            store,
            traffic_level: if config.debug_calls {
                Level::Info
            } else {
                Level::Debug
            },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Fetch a JSON document, checking the cache first
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        if let Some(payload) = self.store.get(url) {
            log::log!(self.traffic_level, "Cache hit: {}", url);
            return Ok(payload);
        }

        log::log!(self.traffic_level, "Fetching: {}", url);

        let payload = match self.request(url).await {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Error fetching data from {}: {}", url, e);
                return Err(e);
            }
        };

        self.store.insert(url, payload.clone());
        log::log!(self.traffic_level, "Cached: {}", url);

        Ok(payload)
    }

    async fn request(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch and decode into a typed response
    pub async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let payload = self.fetch(url).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Empty the response cache
    pub fn clear(&self) {
        self.store.clear();
        log::log!(self.traffic_level, "Cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    // ── Endpoints ────────────────────────────────────────────────────

    pub fn list_url(&self, limit: u32, offset: u32) -> String {
        format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset)
    }

    pub fn record_url(&self, id_or_name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, id_or_name)
    }

    /// Detail url for a list stub, keyed by id so it shares cache entries
    /// with direct lookups
    pub fn record_url_for(&self, stub: &ResourceRef) -> String {
        match stub.trailing_id() {
            Some(id) => self.record_url(&id.to_string()),
            None => self.record_url(&stub.name),
        }
    }

    pub fn type_url(&self, tag: &str) -> String {
        format!(
            "{}/type/{}",
            self.base_url,
            urlencoding::encode(&tag.to_lowercase())
        )
    }

    pub fn species_url(&self, id: u32) -> String {
        format!("{}/pokemon-species/{}", self.base_url, id)
    }

    /// One page of the creature index
    pub async fn list_page(&self, limit: u32, offset: u32) -> Result<ListResponse> {
        self.fetch_as(&self.list_url(limit, offset)).await
    }

    /// One page of the index using the configured default page size
    pub async fn list_default_page(&self, offset: u32) -> Result<ListResponse> {
        self.list_page(self.default_limit, offset).await
    }

    pub async fn record(&self, id_or_name: &str) -> Result<Record> {
        let response: PokemonResponse = self.fetch_as(&self.record_url(id_or_name)).await?;
        Ok(Record::from(response))
    }

    pub async fn record_for(&self, stub: &ResourceRef) -> Result<Record> {
        let response: PokemonResponse = self.fetch_as(&self.record_url_for(stub)).await?;
        Ok(Record::from(response))
    }

    pub async fn type_members(&self, tag: &str) -> Result<TypeResponse> {
        self.fetch_as(&self.type_url(tag)).await
    }

    pub async fn species(&self, id: u32) -> Result<SpeciesResponse> {
        self.fetch_as(&self.species_url(id)).await
    }

    /// Species by the absolute url a record points at
    pub async fn species_at(&self, url: &str) -> Result<SpeciesResponse> {
        self.fetch_as(url).await
    }

    pub async fn evolution_chain(&self, url: &str) -> Result<EvolutionChainResponse> {
        self.fetch_as(url).await
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
