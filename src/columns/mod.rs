use std::collections::HashMap;

use rapidfuzz::distance::levenshtein;
use tracing::debug;

use crate::models::{ColumnMatch, TableRow, CANONICAL_COLUMNS, REQUIRED_COLUMNS};

/// Minimum normalized similarity for a fuzzy header match
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.6;

/// Match the source table headers against the canonical transcript headers.
///
/// Returns one [`ColumnMatch`] per canonical header. Matching runs in two
/// passes:
/// 1. Exact: identical text after trimming and lower-casing, score 1.0
/// 2. Fuzzy: normalized Levenshtein similarity over all remaining pairs;
///    pairs scoring at or above the threshold are assigned greedily, highest
///    score first, each side used at most once
///
/// Never fails: an unresolved canonical header keeps `matched: None` and is
/// the caller's to fix (e.g. by prompting for a manual override).
pub fn map_columns(source_columns: &[String]) -> Vec<ColumnMatch> {
    let mut matches: Vec<ColumnMatch> = CANONICAL_COLUMNS
        .iter()
        .map(|&canonical| ColumnMatch::unresolved(canonical))
        .collect();
    let mut used = vec![false; source_columns.len()];

    // 1. Exact pass
    for entry in matches.iter_mut() {
        for (index, source) in source_columns.iter().enumerate() {
            if !used[index] && normalize_header(source) == entry.expected {
                entry.matched = Some(source.clone());
                entry.is_exact = true;
                entry.score = 1.0;
                used[index] = true;
                break;
            }
        }
    }

    // 2. Fuzzy pass: score every remaining pair, then assign best-first
    let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
    for (match_index, entry) in matches.iter().enumerate() {
        if entry.is_resolved() {
            continue;
        }
        for (source_index, source) in source_columns.iter().enumerate() {
            if used[source_index] {
                continue;
            }
            let score = header_similarity(&normalize_header(source), &entry.expected);
            if score >= FUZZY_MATCH_THRESHOLD {
                candidates.push((score, match_index, source_index));
            }
        }
    }

    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    for (score, match_index, source_index) in candidates {
        if matches[match_index].is_resolved() || used[source_index] {
            continue;
        }
        debug!(
            "Fuzzy-matched header '{}' to '{}' (score {:.2})",
            source_columns[source_index], matches[match_index].expected, score
        );
        matches[match_index].matched = Some(source_columns[source_index].clone());
        matches[match_index].score = score;
        used[source_index] = true;
    }

    matches
}

/// True only for the headers a transcript cannot be parsed without
pub fn is_required(header: &str) -> bool {
    REQUIRED_COLUMNS.contains(&header)
}

/// True iff every required header is resolved, either by detection or by an
/// explicit override.
///
/// An override key counts as a resolution even when it clears the match:
/// the caller made a deliberate decision, which is all this check asks for.
pub fn all_required_mapped(
    matches: &[ColumnMatch],
    overrides: &HashMap<String, Option<String>>,
) -> bool {
    REQUIRED_COLUMNS.iter().all(|required| {
        overrides.contains_key(*required)
            || matches
                .iter()
                .any(|entry| entry.expected == *required && entry.is_resolved())
    })
}

/// Merge overrides over detected matches into a single source -> canonical
/// mapping. An override of `None` removes the detected match entirely.
pub fn build_final_mapping(
    matches: &[ColumnMatch],
    overrides: &HashMap<String, Option<String>>,
) -> HashMap<String, String> {
    let mut mapping = HashMap::new();

    for entry in matches {
        match overrides.get(&entry.expected) {
            Some(Some(source)) => {
                mapping.insert(source.clone(), entry.expected.clone());
            }
            Some(None) => {}
            None => {
                if let Some(source) = &entry.matched {
                    mapping.insert(source.clone(), entry.expected.clone());
                }
            }
        }
    }

    mapping
}

/// Project raw rows through a source -> canonical mapping. Cells under
/// unmapped headers are dropped.
pub fn remap_data(rows: &[TableRow], mapping: &HashMap<String, String>) -> Vec<TableRow> {
    rows.iter()
        .map(|row| {
            let mut remapped = TableRow::new();
            for (source, canonical) in mapping {
                if let Some(value) = row.get(source) {
                    remapped.insert(canonical.clone(), value.clone());
                }
            }
            remapped
        })
        .collect()
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Normalized Levenshtein similarity: 1 - distance / max length
fn header_similarity(a: &str, b: &str) -> f64 {
    levenshtein::normalized_similarity(a.chars(), b.chars())
}
