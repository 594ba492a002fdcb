pub mod debounce;

use serde::{Deserialize, Serialize};

use crate::parse::Record;

/// Predicate applied between a field value and the normalized query. Both
/// modes compare case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Field value contains the query as a substring.
    Contains,
    /// Field value equals the query exactly (ignoring case).
    Exact,
}

/// Result of one filter pass. An empty (post-trim) query is a distinguished
/// state, not a match-everything wildcard: the presentation layer must clear
/// its results and prompt for input rather than render the full dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    EmptyQuery,
    Matches(Vec<Record>),
}

/// Filter `dataset` down to the records where any of the designated fields
/// is present, non-empty, and satisfies `mode` against the trimmed,
/// lowercased query. Pure, order-preserving, no scoring.
pub fn filter(
    dataset: &[Record],
    query: &str,
    fields: &[String],
    mode: MatchMode,
) -> FilterOutcome {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return FilterOutcome::EmptyQuery;
    }

    let matches = dataset
        .iter()
        .filter(|record| {
            fields.iter().any(|key| match record.get(key) {
                Some(value) if !value.is_empty() => {
                    let haystack = value.to_lowercase();
                    match mode {
                        MatchMode::Contains => haystack.contains(&needle),
                        MatchMode::Exact => haystack == needle,
                    }
                }
                _ => false,
            })
        })
        .cloned()
        .collect();
    FilterOutcome::Matches(matches)
}
