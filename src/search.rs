//! Name search against the full upstream index

use crate::batch::BatchFetcher;
use crate::error::Result;
use crate::models::Record;

/// How many index entries a name search scans
pub const SEARCH_INDEX_LIMIT: u32 = 1000;

/// Records whose name contains `term`, at most `max_results` of them.
///
/// The matching stubs are resolved through the batch fetcher, so detail
/// failures are dropped the same way as in a group load.
pub async fn search_by_name(
    fetcher: &BatchFetcher,
    term: &str,
    max_results: usize,
) -> Result<Vec<Record>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() || max_results == 0 {
        return Ok(Vec::new());
    }

    let index = fetcher
        .gateway()
        .list_page(SEARCH_INDEX_LIMIT, 0)
        .await?;

    let matching: Vec<_> = index
        .results
        .into_iter()
        .filter(|stub| stub.name.to_lowercase().contains(&term))
        .take(max_results)
        .collect();

    log::debug!("Name search {:?} matched {} stubs", term, matching.len());

    Ok(fetcher.resolve_stubs(&matching).await.records)
}
