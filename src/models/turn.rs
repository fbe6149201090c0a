use serde::{Deserialize, Serialize};

/// One contiguous utterance by a single speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTurn {
    /// Normalized speaker identity (trimmed, upper-cased)
    pub speaker: String,
    /// Raw turn text
    pub content: String,
    /// Start time in seconds, if known
    pub start_time: Option<f64>,
    /// End time in seconds, if known
    pub end_time: Option<f64>,
}

impl ParsedTurn {
    /// Number of whitespace-separated words in the turn content
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Duration in seconds, when both bounds are present
    pub fn duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// How much explicit timing the whole parse observed.
///
/// This is a property of the parse, not of individual turns: it governs how
/// downstream consumers recompute derived end times after edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// No timing cues anywhere; positions are word-index ranges
    Untimed,
    /// Start times observed, end times inferred
    StartOnly,
    /// Both bounds observed for at least half the turns; authoritative
    StartEnd,
}

/// Coarse signal: were any timestamps observed at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedFormat {
    Timestamped,
    Untimestamped,
}

/// Result of a single transcript parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    /// Speaker turns in input order, minus skipped rows
    pub turns: Vec<ParsedTurn>,
    /// Whether any timestamps were observed in the input
    pub detected_format: DetectedFormat,
    /// True if any row carried a parseable start or end time
    pub has_timestamps: bool,
    /// Distinct normalized speaker names in first-seen order
    pub speakers: Vec<String>,
    /// Number of input rows/lines consumed, skipped ones included
    pub total_line_count: usize,
    /// Timing classification for the whole parse
    pub detected_timing_mode: TimingMode,
}

impl ParseResult {
    /// Number of turns that survived parsing
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// True when parsing produced no usable turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Configuration for timing inference and recomputation
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Estimated speech rate in words per second
    pub speech_rate: f64,
    /// In start-only mode, keep silences between turns instead of
    /// stretching each turn to the next start
    pub preserve_gaps: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            speech_rate: 3.0,
            preserve_gaps: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        let turn = ParsedTurn {
            speaker: "A".to_string(),
            content: "  hello   world ".to_string(),
            start_time: None,
            end_time: None,
        };
        assert_eq!(turn.word_count(), 2);
    }

    #[test]
    fn test_duration_requires_both_bounds() {
        let mut turn = ParsedTurn {
            speaker: "A".to_string(),
            content: "hi".to_string(),
            start_time: Some(1.0),
            end_time: None,
        };
        assert_eq!(turn.duration(), None);
        turn.end_time = Some(3.5);
        assert_eq!(turn.duration(), Some(2.5));
    }
}
