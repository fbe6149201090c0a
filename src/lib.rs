pub mod codes;
pub mod columns;
pub mod io;
pub mod models;
pub mod stats;
pub mod time;
pub mod transcript;

pub use codes::{detect_code_format, extract_code_names, parse_code_file, test_code_file};
pub use columns::{
    all_required_mapped, build_final_mapping, is_required, map_columns, remap_data,
    FUZZY_MATCH_THRESHOLD,
};
pub use io::{parse_rows_json, read_rows_file, read_text_lines};
pub use models::{
    CellValue, CodeFileError, CodeFormat, ColumnMatch, DetectedFormat, ParseResult, ParsedCodeFile,
    ParsedTurn, TableRow, TimeCodeEntry, TimingConfig, TimingMode, TranscriptStats, TranscriptWord,
    TurnCodeEntry,
};
pub use stats::calculate_transcript_stats;
pub use time::{seconds_from_str, to_seconds};
pub use transcript::timing::{estimate_duration, recompute_turn_times};
pub use transcript::{normalize_speaker, parse_csv_rows, parse_txt_lines};
