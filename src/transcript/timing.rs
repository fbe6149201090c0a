use crate::models::{ParsedTurn, TimingConfig, TimingMode};

/// Estimated duration of a turn in seconds, from its word count.
///
/// The floor of 1 guarantees every turn has positive visible duration; the
/// speech-rate floor of 0.1 keeps a zero or negative configured rate from
/// blowing up the division.
pub fn estimate_duration(word_count: usize, speech_rate: f64) -> f64 {
    (word_count as f64 / speech_rate.max(0.1)).max(1.0)
}

/// Recompute derived turn times after edits, governed by the parse-wide
/// timing mode.
///
/// - `Untimed`: start/end become cumulative word-index ranges, rebuilt from
///   scratch on every call
/// - `StartOnly`: explicit starts are kept; each end is the next turn's
///   start (gap-filling default) or the word-count estimate when
///   `preserve_gaps` is set. The last turn always uses the estimate since
///   there is no next start.
/// - `StartEnd`: both bounds are authoritative, nothing changes
pub fn recompute_turn_times(turns: &mut [ParsedTurn], mode: TimingMode, config: &TimingConfig) {
    match mode {
        TimingMode::StartEnd => {}
        TimingMode::Untimed => {
            let mut words_so_far = 0usize;
            for turn in turns.iter_mut() {
                turn.start_time = Some(words_so_far as f64);
                words_so_far += turn.word_count();
                turn.end_time = Some(words_so_far as f64);
            }
        }
        TimingMode::StartOnly => {
            let mut previous_end = 0.0;
            for index in 0..turns.len() {
                let start = turns[index].start_time.unwrap_or(previous_end);
                let estimated = start + estimate_duration(turns[index].word_count(), config.speech_rate);

                let next_start = turns
                    .get(index + 1)
                    .and_then(|next| next.start_time);
                let end = match next_start {
                    Some(next) if !config.preserve_gaps => next,
                    _ => estimated,
                };

                turns[index].start_time = Some(start);
                turns[index].end_time = Some(end);
                previous_end = end;
            }
        }
    }
}
