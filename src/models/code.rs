use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A label applied to a set of turn numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnCodeEntry {
    /// Trimmed label text
    pub code: String,
    /// Turn numbers the label applies to: ascending, deduplicated, each >= 1
    pub turns: Vec<u32>,
}

impl TurnCodeEntry {
    /// Number of distinct turns this code covers
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

/// A label applied to a time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCodeEntry {
    /// Trimmed label text
    pub code: String,
    /// Range start in seconds
    pub start_time: f64,
    /// Range end in seconds; always >= start_time
    pub end_time: f64,
}

impl TimeCodeEntry {
    /// Length of the range in seconds (zero-duration ranges are valid)
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Parsed annotation file, discriminated by how labels attach to the
/// transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedCodeFile {
    /// Labels keyed by turn number (turn-based and turn-range files)
    Turn { entries: Vec<TurnCodeEntry> },
    /// Labels keyed by time range
    Time { entries: Vec<TimeCodeEntry> },
}

impl ParsedCodeFile {
    /// Number of entries regardless of kind
    pub fn entry_count(&self) -> usize {
        match self {
            ParsedCodeFile::Turn { entries } => entries.len(),
            ParsedCodeFile::Time { entries } => entries.len(),
        }
    }
}

/// Annotation file shape, determined purely from headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeFormat {
    /// A code column plus a single turn-number column
    TurnBased,
    /// A code column plus start-turn and end-turn columns
    TurnRange,
    /// Start and end time columns, code column optional
    TimeBased,
    /// No recognized header combination
    Unknown,
}

impl CodeFormat {
    /// Human-readable label for this shape
    pub fn label(&self) -> &'static str {
        match self {
            CodeFormat::TurnBased => "Turn-based",
            CodeFormat::TurnRange => "Turn range",
            CodeFormat::TimeBased => "Time-based",
            CodeFormat::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hard failures from annotation file parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodeFileError {
    /// The header set matches none of the recognized shapes; there is no
    /// safe default to fall back to
    #[error("unrecognized code file format: headers {headers:?} match no known shape")]
    UnrecognizedFormat { headers: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_labels() {
        assert_eq!(CodeFormat::TurnBased.label(), "Turn-based");
        assert_eq!(CodeFormat::TurnRange.label(), "Turn range");
        assert_eq!(CodeFormat::TimeBased.label(), "Time-based");
        assert_eq!(CodeFormat::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_zero_duration_entry() {
        let entry = TimeCodeEntry {
            code: "pause".to_string(),
            start_time: 4.0,
            end_time: 4.0,
        };
        assert_eq!(entry.duration(), 0.0);
    }
}
