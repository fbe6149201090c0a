use serde::{Deserialize, Serialize};

/// Canonical transcript header: speaker identity
pub const SPEAKER_COLUMN: &str = "speaker";
/// Canonical transcript header: turn text
pub const CONTENT_COLUMN: &str = "content";
/// Canonical transcript header: start time
pub const START_COLUMN: &str = "start";
/// Canonical transcript header: end time
pub const END_COLUMN: &str = "end";

/// All canonical headers, required first
pub const CANONICAL_COLUMNS: [&str; 4] =
    [SPEAKER_COLUMN, CONTENT_COLUMN, START_COLUMN, END_COLUMN];

/// Headers a transcript cannot be parsed without
pub const REQUIRED_COLUMNS: [&str; 2] = [SPEAKER_COLUMN, CONTENT_COLUMN];

/// Outcome of matching one canonical header against the source columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    /// The canonical header this match is for
    pub expected: String,
    /// The source column it resolved to, if any
    pub matched: Option<String>,
    /// True when the source column text was identical after normalization
    pub is_exact: bool,
    /// Similarity in [0, 1]; 1.0 for exact matches
    pub score: f64,
}

impl ColumnMatch {
    /// Create an unresolved match for a canonical header
    pub fn unresolved(expected: &str) -> Self {
        Self {
            expected: expected.to_string(),
            matched: None,
            is_exact: false,
            score: 0.0,
        }
    }

    /// True when a source column was found for this header
    pub fn is_resolved(&self) -> bool {
        self.matched.is_some()
    }
}
