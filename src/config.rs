//! Runtime configuration and the static generation table
//!
//! Settings are supplied through environment variables; anything missing or
//! unparseable falls back to the documented default.

use crate::error::{CatalogError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_millis(300_000);
pub const DEFAULT_LIMIT: u32 = 20;
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 30;
pub const DEFAULT_BATCH_PACING: Duration = Duration::from_millis(50);

/// Inclusive range of record ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub min: u32,
    pub max: u32,
}

impl IdRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, id: u32) -> bool {
        id >= self.min && id <= self.max
    }

    /// Zero-based list offset of the first id
    pub fn offset(&self) -> u32 {
        self.min.saturating_sub(1)
    }

    /// Number of ids covered by the range
    pub fn len(&self) -> u32 {
        if self.max < self.min {
            0
        } else {
            self.max - self.min + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A configured generation: the unit of grouped loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub id: i32,
    pub name: &'static str,
    pub region: &'static str,
    pub range: IdRange,
}

pub const GENERATIONS: [Generation; 9] = [
    Generation {
        id: 1,
        name: "Kanto (I)",
        region: "Kanto",
        range: IdRange::new(1, 151),
    },
    Generation {
        id: 2,
        name: "Johto (II)",
        region: "Johto",
        range: IdRange::new(152, 251),
    },
    Generation {
        id: 3,
        name: "Hoenn (III)",
        region: "Hoenn",
        range: IdRange::new(252, 386),
    },
    Generation {
        id: 4,
        name: "Sinnoh (IV)",
        region: "Sinnoh",
        range: IdRange::new(387, 493),
    },
    Generation {
        id: 5,
        name: "Unova (V)",
        region: "Unova",
        range: IdRange::new(494, 649),
    },
    Generation {
        id: 6,
        name: "Kalos (VI)",
        region: "Kalos",
        range: IdRange::new(650, 721),
    },
    Generation {
        id: 7,
        name: "Alola (VII)",
        region: "Alola",
        range: IdRange::new(722, 809),
    },
    Generation {
        id: 8,
        name: "Galar (VIII)",
        region: "Galar",
        range: IdRange::new(810, 905),
    },
    Generation {
        id: 9,
        name: "Paldea (IX)",
        region: "Paldea",
        range: IdRange::new(906, 1025),
    },
];

/// Type tags the upstream API knows about
pub const KNOWN_TYPES: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// Whether `tag` names one of [`KNOWN_TYPES`], ignoring case
pub fn is_known_type(tag: &str) -> bool {
    KNOWN_TYPES.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
}

/// Look up a generation by its id
pub fn generation(id: i32) -> Option<&'static Generation> {
    GENERATIONS.iter().find(|g| g.id == id)
}

/// Like [`generation`], but an unknown id is an error
pub fn require_generation(id: i32) -> Result<&'static Generation> {
    generation(id).ok_or(CatalogError::UnknownGeneration(id))
}

/// Find the generation whose range contains a record id
pub fn generation_for_record(record_id: u32) -> Option<&'static Generation> {
    GENERATIONS.iter().find(|g| g.range.contains(record_id))
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub cache_duration: Duration,
    pub default_limit: u32,
    pub max_search_results: usize,
    /// Log cache traffic at info instead of debug
    pub debug_calls: bool,
    pub batch_size: usize,
    pub batch_pacing: Duration,
    /// Flavor text languages in order of preference
    pub description_languages: Vec<String>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_duration: DEFAULT_CACHE_DURATION,
            default_limit: DEFAULT_LIMIT,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            debug_calls: false,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pacing: DEFAULT_BATCH_PACING,
            description_languages: vec!["pt-BR".to_string(), "pt".to_string(), "en".to_string()],
            user_agent: format!("dex_catalog/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("DEX_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            cache_duration: Duration::from_millis(parse_or(
                &lookup,
                "DEX_API_CACHE_DURATION_MS",
                millis(defaults.cache_duration),
            )),
            default_limit: parse_or(&lookup, "DEX_DEFAULT_LIMIT", defaults.default_limit),
            max_search_results: parse_or(
                &lookup,
                "DEX_MAX_SEARCH_RESULTS",
                defaults.max_search_results,
            ),
            debug_calls: lookup("DEX_DEBUG_API_CALLS")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            batch_size: parse_or(&lookup, "DEX_BATCH_SIZE", defaults.batch_size),
            batch_pacing: Duration::from_millis(parse_or(
                &lookup,
                "DEX_BATCH_PACING_MS",
                millis(defaults.batch_pacing),
            )),
            description_languages: defaults.description_languages,
            user_agent: defaults.user_agent,
        }
    }

    /// Check value ranges, collecting every problem found
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.base_url.trim().is_empty() {
            errors.push("DEX_API_BASE_URL is required".to_string());
        }
        if !(1..=100).contains(&self.default_limit) {
            errors.push("DEX_DEFAULT_LIMIT must be between 1 and 100".to_string());
        }
        if self.batch_size == 0 {
            errors.push("DEX_BATCH_SIZE must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Config(errors))
        }
    }
}

/// Parse an optional variable. Unset yields `default`; unparseable input
/// yields `default` with a warning.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
