use std::collections::HashSet;

use super::record::FeedRecord;
use crate::util::{is_valid_link, normalize_text};

/// Key under which two records are considered the same post.
///
/// The normalized title, or the normalized link when the title has no
/// letters or digits.
pub fn dedupe_key(record: &FeedRecord) -> String {
    let title_key = normalize_text(&record.title);
    if title_key.is_empty() {
        normalize_text(&record.link)
    } else {
        title_key
    }
}

/// Filters, deduplicates and caps a normalized record list.
///
/// Records without a valid link are dropped, the first record seen for each
/// [`dedupe_key`] wins, and at most `limit` records are returned. Relative
/// order is preserved.
pub fn dedupe_and_limit(records: Vec<FeedRecord>, limit: usize) -> Vec<FeedRecord> {
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);

    let kept: Vec<FeedRecord> = records
        .into_iter()
        .filter(|r| is_valid_link(&r.link))
        .filter(|r| seen.insert(dedupe_key(r)))
        .take(limit)
        .collect();

    if kept.len() < total {
        tracing::debug!(
            total = total,
            kept = kept.len(),
            limit = limit,
            "Feed records filtered"
        );
    }

    kept
}
