use serde::{Deserialize, Serialize};

/// One word from the flattened transcript, produced by exploding turns
/// downstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    /// Speaker the word is attributed to
    pub speaker: String,
    /// Ordinal turn number the word belongs to
    pub turn_number: u32,
    /// The word text
    pub word: String,
}

/// Aggregate counts used to calibrate visualizations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptStats {
    /// Largest word count in any single turn
    pub largest_turn_word_count: usize,
    /// Largest total word count attributed to one speaker
    pub largest_speaker_word_count: usize,
    /// Largest number of distinct turns attributed to one speaker
    pub largest_speaker_turn_count: usize,
    /// Highest frequency reached by any single normalized word
    pub top_word_frequency: usize,
    /// The word that reached the top frequency first, in normalized
    /// (lower-cased) form; empty for empty input
    pub most_frequent_word: String,
}
