use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::models::{CodeFileError, ParsedCodeFile, TableRow, TimeCodeEntry, TurnCodeEntry};
use crate::time::to_seconds;

use super::{
    code_text, collect_headers, default_code_name, detect_layout, span, turn_number, CodeLayout,
    MAX_RANGE_EXPANSION,
};

/// Parse an annotation file into normalized label spans.
///
/// The shape is determined purely from headers; both turn-based and
/// turn-range files produce turn-keyed entries, time-based files produce
/// time ranges. Invalid rows are dropped and parsing continues — the only
/// hard failure is a header set matching none of the recognized shapes,
/// because no safe default exists there.
pub fn parse_code_file(rows: &[TableRow], filename: &str) -> Result<ParsedCodeFile, CodeFileError> {
    let headers = collect_headers(rows);
    let Some(layout) = detect_layout(&headers) else {
        return Err(CodeFileError::UnrecognizedFormat { headers });
    };

    Ok(match layout {
        CodeLayout::TurnBased { code, turn } => ParsedCodeFile::Turn {
            entries: parse_turn_rows(rows, &code, &turn),
        },
        CodeLayout::TurnRange {
            code,
            start_turn,
            end_turn,
        } => ParsedCodeFile::Turn {
            entries: parse_range_rows(rows, &code, &start_turn, &end_turn),
        },
        CodeLayout::TimeBased { code, start, end } => ParsedCodeFile::Time {
            entries: parse_time_rows(rows, code.as_deref(), &start, &end, filename),
        },
    })
}

/// Turn-based shape: every valid row contributes one turn to its code's set
fn parse_turn_rows(rows: &[TableRow], code_column: &str, turn_column: &str) -> Vec<TurnCodeEntry> {
    let mut accumulator = TurnAccumulator::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(code) = code_text(row, code_column) else {
            debug!("Skipping code row {}: empty code", index);
            continue;
        };
        let Some(turn) = turn_number(row, turn_column) else {
            debug!("Skipping code row {}: invalid turn number", index);
            continue;
        };
        accumulator.add(code, [turn]);
    }

    accumulator.into_entries()
}

/// Turn-range shape: every valid row expands to the inclusive range and is
/// merged into its code's set. Inverted ranges are dropped whole, and the
/// expansion ceiling is checked before any turns are materialized.
fn parse_range_rows(
    rows: &[TableRow],
    code_column: &str,
    start_column: &str,
    end_column: &str,
) -> Vec<TurnCodeEntry> {
    let mut accumulator = TurnAccumulator::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(code) = code_text(row, code_column) else {
            debug!("Skipping range row {}: empty code", index);
            continue;
        };
        let (Some(start), Some(end)) = (
            turn_number(row, start_column),
            turn_number(row, end_column),
        ) else {
            debug!("Skipping range row {}: unparseable bounds", index);
            continue;
        };
        if end < start {
            debug!("Dropping range row {}: end turn {} before start turn {}", index, end, start);
            continue;
        }
        if span(start, end) > MAX_RANGE_EXPANSION {
            warn!(
                "Dropping range row {}: {} turns exceeds the {} expansion ceiling",
                index,
                span(start, end),
                MAX_RANGE_EXPANSION
            );
            continue;
        }
        accumulator.add(code, start..=end);
    }

    accumulator.into_entries()
}

/// Time-based shape: both bounds must parse; zero-duration ranges are kept
/// and overlaps across codes are never deduplicated
fn parse_time_rows(
    rows: &[TableRow],
    code_column: Option<&str>,
    start_column: &str,
    end_column: &str,
    filename: &str,
) -> Vec<TimeCodeEntry> {
    let mut entries = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let code = match code_column {
            Some(column) => match code_text(row, column) {
                Some(code) => code,
                None => {
                    debug!("Skipping time row {}: empty code", index);
                    continue;
                }
            },
            None => default_code_name(filename),
        };
        let (Some(start_time), Some(end_time)) = (
            row.get(start_column).and_then(to_seconds),
            row.get(end_column).and_then(to_seconds),
        ) else {
            debug!("Skipping time row {}: missing time bound", index);
            continue;
        };
        if start_time > end_time {
            debug!("Dropping time row {}: inverted range", index);
            continue;
        }

        entries.push(TimeCodeEntry {
            code,
            start_time,
            end_time,
        });
    }

    entries
}

/// Per-code turn sets, preserving first-seen code order.
///
/// The BTreeSet gives each entry its sorted, deduplicated turn list for
/// free; the side vector keeps output order independent of map iteration.
struct TurnAccumulator {
    order: Vec<String>,
    turns: HashMap<String, BTreeSet<u32>>,
}

impl TurnAccumulator {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            turns: HashMap::new(),
        }
    }

    fn add(&mut self, code: String, turns: impl IntoIterator<Item = u32>) {
        if !self.turns.contains_key(&code) {
            self.order.push(code.clone());
        }
        self.turns.entry(code).or_default().extend(turns);
    }

    fn into_entries(self) -> Vec<TurnCodeEntry> {
        let mut turns_by_code = self.turns;
        self.order
            .into_iter()
            .map(|code| {
                let turns = turns_by_code.remove(&code).unwrap_or_default();
                TurnCodeEntry {
                    code,
                    turns: turns.into_iter().collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn row(cells: &[(&str, CellValue)]) -> TableRow {
        cells
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn turn_row(code: &str, turn: f64) -> TableRow {
        row(&[
            ("code", CellValue::from(code)),
            ("turn", CellValue::Number(turn)),
        ])
    }

    fn range_row(code: &str, start: f64, end: f64) -> TableRow {
        row(&[
            ("code", CellValue::from(code)),
            ("start turn", CellValue::Number(start)),
            ("end turn", CellValue::Number(end)),
        ])
    }

    fn time_row(code: Option<&str>, start: CellValue, end: CellValue) -> TableRow {
        let mut cells = vec![("start".to_string(), start), ("end".to_string(), end)];
        if let Some(code) = code {
            cells.push(("code".to_string(), CellValue::from(code)));
        }
        cells.into_iter().collect()
    }

    fn expect_turn_entries(parsed: ParsedCodeFile) -> Vec<TurnCodeEntry> {
        match parsed {
            ParsedCodeFile::Turn { entries } => entries,
            ParsedCodeFile::Time { .. } => panic!("expected turn entries"),
        }
    }

    fn expect_time_entries(parsed: ParsedCodeFile) -> Vec<TimeCodeEntry> {
        match parsed {
            ParsedCodeFile::Time { entries } => entries,
            ParsedCodeFile::Turn { .. } => panic!("expected time entries"),
        }
    }

    #[test]
    fn test_turn_based_dedup_and_sort() {
        let rows = vec![
            turn_row("question", 5.0),
            turn_row("question", 2.0),
            turn_row("question", 5.0),
            turn_row("answer", 3.0),
            turn_row("  ", 4.0),
            turn_row("question", 0.0),
        ];

        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "question");
        assert_eq!(entries[0].turns, vec![2, 5]);
        assert_eq!(entries[1].code, "answer");
        assert_eq!(entries[1].turns, vec![3]);
    }

    #[test]
    fn test_turn_based_trims_code_whitespace() {
        let rows = vec![turn_row("  deep  question ", 1.0)];
        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert_eq!(entries[0].code, "deep  question");
    }

    #[test]
    fn test_range_expansion_inclusive() {
        let rows = vec![range_row("theme", 1.0, 3.0)];
        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert_eq!(entries[0].turns, vec![1, 2, 3]);
    }

    #[test]
    fn test_range_rows_merge_per_code() {
        let rows = vec![
            range_row("theme", 1.0, 3.0),
            range_row("theme", 2.0, 4.0),
            range_row("other", 10.0, 10.0),
        ];

        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert_eq!(entries[0].turns, vec![1, 2, 3, 4]);
        assert_eq!(entries[1].turns, vec![10]);
    }

    #[test]
    fn test_inverted_range_dropped_not_reversed() {
        let rows = vec![range_row("theme", 5.0, 2.0)];
        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_oversized_range_dropped() {
        let rows = vec![
            range_row("theme", 1.0, 20_000.0),
            range_row("theme", 1.0, 2.0),
        ];

        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        // The malformed row vanished; the sane one survived
        assert_eq!(entries[0].turns, vec![1, 2]);
    }

    #[test]
    fn test_range_at_ceiling_is_kept() {
        let rows = vec![range_row("theme", 1.0, 10_000.0)];
        let entries = expect_turn_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert_eq!(entries[0].turns.len(), 10_000);
    }

    #[test]
    fn test_time_based_rows() {
        let rows = vec![
            time_row(Some("laughter"), CellValue::Number(1.0), CellValue::Number(4.5)),
            // Zero-duration is valid
            time_row(Some("laughter"), CellValue::Number(6.0), CellValue::Number(6.0)),
            // Overlapping range under a different code survives
            time_row(Some("pause"), CellValue::Number(2.0), CellValue::Number(3.0)),
            // Missing bound: dropped
            time_row(Some("pause"), CellValue::from(""), CellValue::Number(9.0)),
            // Inverted: dropped
            time_row(Some("pause"), CellValue::Number(9.0), CellValue::Number(8.0)),
        ];

        let entries = expect_time_entries(parse_code_file(&rows, "codes.csv").unwrap());

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].code, "laughter");
        assert_eq!(entries[1].duration(), 0.0);
        assert_eq!(entries[2].code, "pause");
    }

    #[test]
    fn test_time_based_clock_strings() {
        let rows = vec![time_row(
            Some("intro"),
            CellValue::from("00:10"),
            CellValue::from("00:10:00"),
        )];

        let entries = expect_time_entries(parse_code_file(&rows, "codes.csv").unwrap());
        assert_eq!(entries[0].start_time, 10.0);
        assert_eq!(entries[0].end_time, 600.0);
    }

    #[test]
    fn test_time_based_filename_code_fallback() {
        let rows = vec![
            time_row(None, CellValue::Number(0.0), CellValue::Number(2.0)),
            time_row(None, CellValue::Number(3.0), CellValue::Number(4.0)),
        ];

        let entries = expect_time_entries(parse_code_file(&rows, "Laughter Marks.csv").unwrap());
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.code == "laughter marks"));
    }

    #[test]
    fn test_unrecognized_headers_fail_hard() {
        let rows = vec![row(&[
            ("code", CellValue::from("orphan")),
            ("something", CellValue::Number(1.0)),
        ])];

        let error = parse_code_file(&rows, "codes.csv").unwrap_err();
        match error {
            CodeFileError::UnrecognizedFormat { headers } => {
                assert!(headers.contains(&"code".to_string()));
            }
        }
    }
}
