use std::collections::{HashMap, HashSet};

use crate::models::{TranscriptStats, TranscriptWord};
use crate::transcript::normalize_speaker;

/// Compute the aggregate counts that calibrate visualizations, from the
/// flattened word-level view of the transcript.
///
/// Word frequency keys are lower-cased, so the reported most frequent word
/// is the normalized form. Ties go to whichever word reached the maximum
/// first in scan order; later words matching the maximum do not replace it.
/// Empty input yields all zeros and an empty string.
pub fn calculate_transcript_stats(words: &[TranscriptWord]) -> TranscriptStats {
    let mut turn_word_counts: HashMap<u32, usize> = HashMap::new();
    let mut speaker_word_counts: HashMap<String, usize> = HashMap::new();
    let mut speaker_turns: HashMap<String, HashSet<u32>> = HashMap::new();
    let mut word_frequencies: HashMap<String, usize> = HashMap::new();

    let mut top_word_frequency = 0usize;
    let mut most_frequent_word = String::new();

    for item in words {
        let speaker = normalize_speaker(&item.speaker);

        *turn_word_counts.entry(item.turn_number).or_default() += 1;
        *speaker_word_counts.entry(speaker.clone()).or_default() += 1;
        speaker_turns.entry(speaker).or_default().insert(item.turn_number);

        let normalized = item.word.to_lowercase();
        let frequency = word_frequencies.entry(normalized.clone()).or_default();
        *frequency += 1;
        if *frequency > top_word_frequency {
            top_word_frequency = *frequency;
            most_frequent_word = normalized;
        }
    }

    TranscriptStats {
        largest_turn_word_count: turn_word_counts.values().copied().max().unwrap_or(0),
        largest_speaker_word_count: speaker_word_counts.values().copied().max().unwrap_or(0),
        largest_speaker_turn_count: speaker_turns.values().map(HashSet::len).max().unwrap_or(0),
        top_word_frequency,
        most_frequent_word,
    }
}
