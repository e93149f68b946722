//! Detail view resolution: record, species text and evolution chain
//!
//! The evolution chain is a tree of unbounded depth. It is walked with an
//! explicit stack instead of recursion, visiting nodes in pre-order with
//! children kept in upstream order.

use crate::api::HttpGateway;
use crate::error::Result;
use crate::models::{trailing_id, ChainLink, Record, SpeciesResponse};
use std::sync::Arc;

pub const NO_DESCRIPTION: &str = "Description not available";
pub const DEFAULT_GENUS: &str = "Pokémon";

/// One stage of an evolution chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionMember {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
}

impl From<&Record> for EvolutionMember {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            image_url: record.image_url.clone(),
            types: record.types.clone(),
        }
    }
}

/// Everything the detail page shows for one record
#[derive(Debug, Clone)]
pub struct RecordDetail {
    pub record: Record,
    pub genus: String,
    pub description: String,
    pub evolution: Vec<EvolutionMember>,
}

/// Resolves detail views through the cached gateway
pub struct DetailResolver {
    gateway: Arc<HttpGateway>,
    languages: Vec<String>,
}

impl DetailResolver {
    pub fn new(gateway: Arc<HttpGateway>, languages: Vec<String>) -> Self {
        Self { gateway, languages }
    }

    /// Load the record, its species text and its evolution chain.
    ///
    /// Failing to load the record or species is an error; a failing
    /// evolution stage is logged and left out.
    pub async fn resolve(&self, record_id: u32) -> Result<RecordDetail> {
        let record = self.gateway.record(&record_id.to_string()).await?;

        let species = match record.species_url {
            Some(ref url) => self.gateway.species_at(url).await?,
            None => self.gateway.species(record.id).await?,
        };

        let description = describe(&species, &self.languages);
        let genus = genus(&species, &self.languages);

        let evolution = match species.evolution_chain {
            Some(ref chain_ref) => {
                let chain = self.gateway.evolution_chain(&chain_ref.url).await?;
                self.resolve_chain(&chain.chain).await
            }
            None => Vec::new(),
        };

        Ok(RecordDetail {
            record,
            genus,
            description,
            evolution,
        })
    }

    /// Fetch every stage of the chain, in pre-order
    pub async fn resolve_chain(&self, root: &ChainLink) -> Vec<EvolutionMember> {
        let mut members = Vec::new();

        for species_id in chain_species_ids(root) {
            match self.gateway.record(&species_id.to_string()).await {
                Ok(record) => members.push(EvolutionMember::from(&record)),
                Err(e) => log::warn!("Skipping evolution stage {}: {}", species_id, e),
            }
        }

        members
    }
}

/// Species ids of every node in the chain, pre-order.
///
/// Nodes whose species url carries no id are skipped; their children are
/// still visited.
pub fn chain_species_ids(root: &ChainLink) -> Vec<u32> {
    let mut ids = Vec::new();
    let mut stack = vec![root];

    while let Some(link) = stack.pop() {
        match trailing_id(&link.species.url) {
            Some(id) => ids.push(id),
            None => log::warn!("No species id in {}", link.species.url),
        }
        stack.extend(link.evolves_to.iter().rev());
    }

    ids
}

/// First flavor text in the preferred languages, with control breaks removed
pub fn describe(species: &SpeciesResponse, languages: &[String]) -> String {
    languages
        .iter()
        .find_map(|lang| {
            species
                .flavor_text_entries
                .iter()
                .find(|entry| entry.language.name == *lang)
        })
        .map(|entry| entry.flavor_text.replace(|c: char| c == '\u{c}' || c == '\n', " "))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Genus in the preferred languages, falling back to the generic label
pub fn genus(species: &SpeciesResponse, languages: &[String]) -> String {
    languages
        .iter()
        .find_map(|lang| species.genera.iter().find(|g| g.language.name == *lang))
        .map(|g| g.genus.clone())
        .unwrap_or_else(|| DEFAULT_GENUS.to_string())
}

#[cfg(test)]
#[path = "detail_tests.rs"]
mod tests;
