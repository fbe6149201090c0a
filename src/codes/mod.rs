pub mod parse;

pub use parse::parse_code_file;

use crate::models::{CellValue, CodeFormat, TableRow};
use crate::time::to_seconds;

/// Annotation header: label text
pub const CODE_COLUMN: &str = "code";
/// Accepted turn-number headers for turn-based files
pub const TURN_COLUMNS: [&str; 2] = ["turn", "turn number"];
/// Range-bound headers for turn-range files
pub const START_TURN_COLUMN: &str = "start turn";
pub const END_TURN_COLUMN: &str = "end turn";
/// Accepted time-bound headers for time-based files
pub const START_TIME_COLUMNS: [&str; 2] = ["start", "start time"];
pub const END_TIME_COLUMNS: [&str; 2] = ["end", "end time"];

/// Widest inclusive turn range a single row may expand to. Anything wider
/// is treated as malformed and dropped whole, never truncated.
pub const MAX_RANGE_EXPANSION: u64 = 10_000;

/// Resolved column names for one recognized annotation shape
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CodeLayout {
    TurnBased {
        code: String,
        turn: String,
    },
    TurnRange {
        code: String,
        start_turn: String,
        end_turn: String,
    },
    TimeBased {
        code: Option<String>,
        start: String,
        end: String,
    },
}

/// Resolve the header set to one of the recognized shapes.
///
/// Precedence is most-specific first: a range file carrying a stray `turn`
/// column still reads as a range file, and turn columns win over the time
/// columns a transcript-style table would have.
pub(crate) fn detect_layout(headers: &[String]) -> Option<CodeLayout> {
    let code = find_column(headers, &[CODE_COLUMN]);

    if let Some(code) = &code {
        if let (Some(start_turn), Some(end_turn)) = (
            find_column(headers, &[START_TURN_COLUMN]),
            find_column(headers, &[END_TURN_COLUMN]),
        ) {
            return Some(CodeLayout::TurnRange {
                code: code.clone(),
                start_turn,
                end_turn,
            });
        }
        if let Some(turn) = find_column(headers, &TURN_COLUMNS) {
            return Some(CodeLayout::TurnBased {
                code: code.clone(),
                turn,
            });
        }
    }

    if let (Some(start), Some(end)) = (
        find_column(headers, &START_TIME_COLUMNS),
        find_column(headers, &END_TIME_COLUMNS),
    ) {
        return Some(CodeLayout::TimeBased { code, start, end });
    }

    None
}

/// Classify an annotation file shape from its headers alone; valid rows are
/// not required
pub fn detect_code_format(headers: &[String]) -> CodeFormat {
    match detect_layout(headers) {
        Some(CodeLayout::TurnBased { .. }) => CodeFormat::TurnBased,
        Some(CodeLayout::TurnRange { .. }) => CodeFormat::TurnRange,
        Some(CodeLayout::TimeBased { .. }) => CodeFormat::TimeBased,
        None => CodeFormat::Unknown,
    }
}

/// Does this table look like a genuine annotation file: a recognized header
/// combination plus at least one row satisfying that shape's validity rule
pub fn test_code_file(rows: &[TableRow]) -> bool {
    let headers = collect_headers(rows);
    match detect_layout(&headers) {
        Some(layout) => rows.iter().any(|row| layout.row_is_valid(row)),
        None => false,
    }
}

/// Distinct, trimmed, non-empty code values in first-seen order; without a
/// code column, the single filename-derived name
pub fn extract_code_names(rows: &[TableRow], headers: &[String], filename: &str) -> Vec<String> {
    let Some(code_column) = find_column(headers, &[CODE_COLUMN]) else {
        return vec![default_code_name(filename)];
    };

    let mut names: Vec<String> = Vec::new();
    for row in rows {
        if let Some(code) = code_text(row, &code_column) {
            if !names.contains(&code) {
                names.push(code);
            }
        }
    }
    names
}

impl CodeLayout {
    /// Would this row contribute an entry when parsed under this shape
    pub(crate) fn row_is_valid(&self, row: &TableRow) -> bool {
        match self {
            CodeLayout::TurnBased { code, turn } => {
                code_text(row, code).is_some() && turn_number(row, turn).is_some()
            }
            CodeLayout::TurnRange {
                code,
                start_turn,
                end_turn,
            } => {
                code_text(row, code).is_some()
                    && matches!(
                        (turn_number(row, start_turn), turn_number(row, end_turn)),
                        (Some(start), Some(end))
                            if end >= start && span(start, end) <= MAX_RANGE_EXPANSION
                    )
            }
            CodeLayout::TimeBased { code, start, end } => {
                let code_ok = match code {
                    Some(column) => code_text(row, column).is_some(),
                    None => true,
                };
                code_ok
                    && matches!(
                        (
                            row.get(start).and_then(to_seconds),
                            row.get(end).and_then(to_seconds),
                        ),
                        (Some(start), Some(end)) if start <= end
                    )
            }
        }
    }
}

/// Number of turns in the inclusive range [start..=end]
pub(crate) fn span(start: u32, end: u32) -> u64 {
    u64::from(end) - u64::from(start) + 1
}

/// Union of row keys in first-seen order
pub(crate) fn collect_headers(rows: &[TableRow]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

/// First header matching one of the candidate names, after normalization
pub(crate) fn find_column(headers: &[String], candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .find(|header| header.trim().to_lowercase() == *candidate)
            .cloned()
    })
}

/// Trimmed, non-empty code text from a row (internal whitespace preserved)
pub(crate) fn code_text(row: &TableRow, column: &str) -> Option<String> {
    let code = row.get(column)?.as_display_string();
    let code = code.trim();
    (!code.is_empty()).then(|| code.to_string())
}

/// Positive integer turn number from a numeric or numeric-string cell.
/// Clock strings are deliberately not accepted here; turn numbers are
/// ordinals, not times.
pub(crate) fn turn_number(row: &TableRow, column: &str) -> Option<u32> {
    let number = match row.get(column)? {
        CellValue::Number(number) => *number,
        CellValue::Text(text) => text.trim().parse::<f64>().ok()?,
        CellValue::Bool(_) => return None,
    };
    if !number.is_finite() || number < 1.0 || number.fract() != 0.0 || number > f64::from(u32::MAX)
    {
        return None;
    }
    Some(number as u32)
}

/// Synthetic code for files with no code column: the source filename with
/// its extension stripped, trimmed, lower-cased
pub(crate) fn default_code_name(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    stem.trim().to_lowercase()
}
