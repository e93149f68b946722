//! Upstream response shapes and the catalog's own record/group types

use crate::config::IdRange;
use serde::Deserialize;

/// Id of the synthetic group holding a type-scoped result
pub const TYPE_GROUP_ID: i32 = -1;

// ── Upstream wire types ──────────────────────────────────────────────

/// A `{name, url}` reference as returned by list endpoints
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub name: String,
    pub url: String,
}

impl ResourceRef {
    /// Numeric id from the last path segment of the url
    pub fn trailing_id(&self) -> Option<u32> {
        trailing_id(&self.url)
    }
}

/// Extract the numeric id at the end of a resource url (`.../pokemon/25/`)
pub fn trailing_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// Paginated index response
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ListResponse {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<ResourceRef>,
}

/// Full creature response
#[derive(Debug, Deserialize, Clone)]
pub struct PokemonResponse {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub species: Option<ResourceRef>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprite>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ArtworkSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: ResourceRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: ResourceRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AbilitySlot {
    pub ability: ResourceRef,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u32,
}

impl Sprites {
    /// Official artwork first, then the default front sprite
    pub fn best_image(&self) -> Option<&str> {
        if let Some(ref other) = self.other {
            if let Some(ref artwork) = other.official_artwork {
                if let Some(ref url) = artwork.front_default {
                    return Some(url.as_str());
                }
            }
        }
        self.front_default.as_deref()
    }
}

/// Members of a type (`GET /type/{name}`)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TypeResponse {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypeMember {
    pub pokemon: ResourceRef,
    #[serde(default)]
    pub slot: u32,
}

impl TypeResponse {
    pub fn stubs(&self) -> Vec<ResourceRef> {
        self.pokemon.iter().map(|m| m.pokemon.clone()).collect()
    }
}

/// Species data (`GET /pokemon-species/{id}`)
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SpeciesResponse {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    #[serde(default)]
    pub evolution_chain: Option<UrlRef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: ResourceRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Genus {
    pub genus: String,
    pub language: ResourceRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UrlRef {
    pub url: String,
}

/// Evolution chain document
#[derive(Debug, Deserialize, Clone)]
pub struct EvolutionChainResponse {
    #[serde(default)]
    pub id: u32,
    pub chain: ChainLink,
}

/// One node of the evolution tree
#[derive(Debug, Deserialize, Clone)]
pub struct ChainLink {
    pub species: ResourceRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

// ── Catalog types ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

/// A creature entry, immutable once fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    pub height: u32,
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub species_url: Option<String>,
}

impl Record {
    /// Base value of a named stat
    pub fn stat(&self, name: &str) -> Option<u8> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Id padded to three digits, as shown on cards (`025`)
    pub fn display_id(&self) -> String {
        format!("{:03}", self.id)
    }
}

impl From<PokemonResponse> for Record {
    fn from(p: PokemonResponse) -> Self {
        let image_url = p.sprites.best_image().unwrap_or_default().to_string();

        let mut types = p.types;
        types.sort_by_key(|t| t.slot);

        Self {
            id: p.id,
            name: p.name,
            image_url,
            types: types.into_iter().map(|t| t.kind.name).collect(),
            stats: p
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: u8::try_from(s.base_stat).unwrap_or(u8::MAX),
                })
                .collect(),
            abilities: p
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    is_hidden: a.is_hidden,
                })
                .collect(),
            height: p.height,
            weight: p.weight,
            base_experience: p.base_experience,
            species_url: p.species.map(|s| s.url),
        }
    }
}

/// Load state of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Pending,
    Loading,
    Loaded,
    Failed,
}

/// A unit of batch loading: one generation or one type-scoped result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i32,
    pub display_name: String,
    /// None for the synthetic type group
    pub id_range: Option<IdRange>,
    pub records: Vec<Record>,
    pub status: GroupStatus,
    pub error_message: Option<String>,
}

impl Group {
    pub fn pending(id: i32, display_name: impl Into<String>, id_range: Option<IdRange>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            id_range,
            records: Vec::new(),
            status: GroupStatus::Pending,
            error_message: None,
        }
    }

    pub fn start_loading(&mut self) {
        self.status = GroupStatus::Loading;
        self.records.clear();
        self.error_message = None;
    }

    pub fn finish_loaded(&mut self, records: Vec<Record>) {
        self.status = GroupStatus::Loaded;
        self.records = records;
        self.error_message = None;
    }

    pub fn finish_failed(&mut self, message: impl Into<String>) {
        self.status = GroupStatus::Failed;
        self.records.clear();
        self.error_message = Some(message.into());
    }

    pub fn is_loaded(&self) -> bool {
        self.status == GroupStatus::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.status == GroupStatus::Loading
    }

    pub fn is_type_group(&self) -> bool {
        self.id == TYPE_GROUP_ID
    }
}

/// User-supplied filter predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub generation_id: Option<i32>,
    pub type_tag: Option<String>,
}

impl FilterCriteria {
    /// The type tag, when the type-scoped load mode should be active
    pub fn type_scope(&self) -> Option<&str> {
        match self.type_tag.as_deref() {
            Some(tag) if self.generation_id.is_none() && self.search_term.is_empty() => Some(tag),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
