pub mod timing;

use std::collections::HashSet;

use tracing::debug;

use crate::models::{
    DetectedFormat, ParseResult, ParsedTurn, TableRow, TimingConfig, TimingMode, CONTENT_COLUMN,
    END_COLUMN, SPEAKER_COLUMN, START_COLUMN,
};
use crate::time::to_seconds;
use self::timing::estimate_duration;

/// Normalize a speaker name into its identity key (trimmed, upper-cased).
///
/// Used everywhere a speaker is a grouping key so that "ana " and "Ana"
/// collapse to the same identity.
pub fn normalize_speaker(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Parse a plain-text transcript, one line per turn.
///
/// Each non-blank line splits on the first colon into speaker and content;
/// without a colon the first whitespace run is the separator instead. Lines
/// with an empty speaker or no content words are skipped. Text transcripts
/// never carry timestamps; word-count-based timing is applied downstream.
pub fn parse_txt_lines(lines: &[String]) -> ParseResult {
    let mut turns = Vec::new();
    let mut speakers = SpeakerRoster::new();

    for (index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (speaker_raw, content_raw) = match trimmed.split_once(':') {
            Some(parts) => parts,
            None => match trimmed.split_once(char::is_whitespace) {
                Some(parts) => parts,
                None => {
                    debug!("Skipping line {}: no content after speaker", index);
                    continue;
                }
            },
        };

        let speaker = normalize_speaker(speaker_raw);
        let content = content_raw.trim();
        if speaker.is_empty() || content.split_whitespace().count() == 0 {
            debug!("Skipping line {}: empty speaker or content", index);
            continue;
        }

        speakers.record(&speaker);
        turns.push(ParsedTurn {
            speaker,
            content: content.to_string(),
            start_time: None,
            end_time: None,
        });
    }

    ParseResult {
        turns,
        detected_format: DetectedFormat::Untimestamped,
        has_timestamps: false,
        speakers: speakers.into_names(),
        total_line_count: lines.len(),
        detected_timing_mode: TimingMode::Untimed,
    }
}

/// Parse a tabular transcript whose rows already use the canonical headers
/// (speaker, content, start, end).
///
/// Timing is inferred with running trackers:
/// 1. Rows before any timing signal stay untimed and leave the trackers
///    untouched
/// 2. Once any signal is seen, every row is timed: start falls back through
///    the last valid end, then the last valid start, then 0
/// 3. A missing end is taken from the next row's start when strictly greater,
///    otherwise estimated from the word count at the configured speech rate
/// 4. An end that is not strictly greater than its start is re-estimated
///
/// Malformed rows are skipped, never fatal; a zero-turn result is normal.
pub fn parse_csv_rows(rows: &[TableRow], config: &TimingConfig) -> ParseResult {
    let mut turns = Vec::new();
    let mut speakers = SpeakerRoster::new();

    let mut rows_with_start_time = 0usize;
    let mut rows_with_end_time = 0usize;
    let mut last_valid_start_time: Option<f64> = None;
    let mut last_valid_end_time: Option<f64> = None;

    for (index, row) in rows.iter().enumerate() {
        let Some(speaker) = speaker_cell(row) else {
            debug!("Skipping row {}: missing or empty speaker", index);
            continue;
        };
        let Some(content) = content_cell(row) else {
            debug!("Skipping row {}: missing or empty content", index);
            continue;
        };
        let word_count = content.split_whitespace().count();

        let current_start = row.get(START_COLUMN).and_then(to_seconds);
        let current_end = row.get(END_COLUMN).and_then(to_seconds);

        if current_start.is_some() {
            rows_with_start_time += 1;
        }
        if current_end.is_some() {
            rows_with_end_time += 1;
        }

        let timing_observed = current_start.is_some()
            || current_end.is_some()
            || last_valid_start_time.is_some()
            || last_valid_end_time.is_some();

        let (start_time, end_time) = if !timing_observed {
            // Pure-untimed row: no signal yet anywhere in the input
            (None, None)
        } else {
            let start = current_start
                .or(last_valid_end_time)
                .or(last_valid_start_time)
                .unwrap_or(0.0);

            let mut end = match current_end {
                Some(end) => end,
                None => {
                    let next_start = rows
                        .get(index + 1)
                        .and_then(|next| next.get(START_COLUMN))
                        .and_then(to_seconds);
                    match next_start {
                        Some(next) if next > start => next,
                        _ => start + estimate_duration(word_count, config.speech_rate),
                    }
                }
            };
            if end <= start {
                end = start + estimate_duration(word_count, config.speech_rate);
            }

            last_valid_start_time = Some(start);
            last_valid_end_time = Some(end);
            (Some(start), Some(end))
        };

        speakers.record(&speaker);
        turns.push(ParsedTurn {
            speaker,
            content,
            start_time,
            end_time,
        });
    }

    let has_timestamps = rows_with_start_time > 0 || rows_with_end_time > 0;
    let detected_timing_mode = if rows_with_end_time > 0 && rows_with_end_time * 2 >= turns.len() {
        TimingMode::StartEnd
    } else if rows_with_start_time > 0 {
        TimingMode::StartOnly
    } else {
        TimingMode::Untimed
    };

    ParseResult {
        turns,
        detected_format: if has_timestamps {
            DetectedFormat::Timestamped
        } else {
            DetectedFormat::Untimestamped
        },
        has_timestamps,
        speakers: speakers.into_names(),
        total_line_count: rows.len(),
        detected_timing_mode,
    }
}

/// Distinct speaker names in first-seen order
struct SpeakerRoster {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl SpeakerRoster {
    fn new() -> Self {
        Self {
            names: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn record(&mut self, speaker: &str) {
        if self.seen.insert(speaker.to_string()) {
            self.names.push(speaker.to_string());
        }
    }

    fn into_names(self) -> Vec<String> {
        self.names
    }
}

fn speaker_cell(row: &TableRow) -> Option<String> {
    let speaker = normalize_speaker(&row.get(SPEAKER_COLUMN)?.as_display_string());
    (!speaker.is_empty()).then_some(speaker)
}

fn content_cell(row: &TableRow) -> Option<String> {
    let content = row.get(CONTENT_COLUMN)?.as_display_string();
    (content.split_whitespace().count() > 0).then_some(content)
}
