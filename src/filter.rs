//! Visible-subset computation for loaded records

use crate::config;
use crate::models::{FilterCriteria, Record};

/// Whether a single record passes every active predicate
pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    matches_search(record, &criteria.search_term)
        && matches_generation(record, criteria.generation_id)
        && matches_type(record, criteria.type_tag.as_deref())
}

/// Records passing `criteria`, in input order
pub fn visible(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}

fn matches_search(record: &Record, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(&term.to_lowercase())
        || record.id.to_string().contains(term)
        || record.display_id().contains(term)
}

/// Range membership comes from the static table, not from the group a
/// record was loaded into
fn matches_generation(record: &Record, generation_id: Option<i32>) -> bool {
    match generation_id {
        None => true,
        Some(id) => config::generation(id).is_some_and(|g| g.range.contains(record.id)),
    }
}

fn matches_type(record: &Record, tag: Option<&str>) -> bool {
    tag.map_or(true, |tag| record.has_type(tag))
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
