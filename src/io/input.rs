use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{CellValue, TableRow};

/// Read a rows file (a JSON array of objects, as emitted by the upstream
/// tokenizer) into table rows
pub fn read_rows_file(path: &Path) -> Result<Vec<TableRow>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_rows_json(&content)
}

/// Parse a JSON array of objects into table rows.
///
/// Keys are trimmed and lower-cased to match the header contract; string,
/// number, and boolean values become cells, while nulls and non-scalar
/// values become absent cells.
pub fn parse_rows_json(json: &str) -> Result<Vec<TableRow>> {
    let objects: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(json).context("Failed to parse rows JSON")?;
    Ok(objects.into_iter().map(row_from_object).collect())
}

/// Read a plain-text transcript file into lines
pub fn read_text_lines(path: &Path) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(content.lines().map(str::to_string).collect())
}

fn row_from_object(object: serde_json::Map<String, Value>) -> TableRow {
    let mut row = TableRow::new();
    for (key, value) in object {
        let cell = match value {
            Value::String(text) => CellValue::Text(text),
            Value::Number(number) => match number.as_f64() {
                Some(number) => CellValue::Number(number),
                None => continue,
            },
            Value::Bool(flag) => CellValue::Bool(flag),
            Value::Null => continue,
            _ => {
                debug!("Ignoring non-scalar cell under '{}'", key);
                continue;
            }
        };
        row.insert(key.trim().to_lowercase(), cell);
    }
    row
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_rows_json() {
        let json = r#"[
            {"Speaker": "Ana", "Content": "hello there", "Start": 0.5, "End": null},
            {"speaker": "Ben", "content": "hi", "flagged": true, "nested": {"x": 1}}
        ]"#;

        let rows = parse_rows_json(json).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("speaker"), Some(&CellValue::from("Ana")));
        assert_eq!(rows[0].get("start"), Some(&CellValue::Number(0.5)));
        // Nulls and non-scalars are absent, not present-but-empty
        assert!(!rows[0].contains_key("end"));
        assert!(!rows[1].contains_key("nested"));
        assert_eq!(rows[1].get("flagged"), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_parse_rows_json_rejects_non_arrays() {
        assert!(parse_rows_json("{\"speaker\": \"Ana\"}").is_err());
        assert!(parse_rows_json("not json").is_err());
    }

    #[test]
    fn test_read_rows_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"speaker": "Ana", "content": "hello"}}]"#).unwrap();

        let rows = read_rows_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("content"), Some(&CellValue::from("hello")));
    }

    #[test]
    fn test_read_text_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Ana: hello\nBen: hi").unwrap();

        let lines = read_text_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["Ana: hello".to_string(), "Ben: hi".to_string()]);
    }

    #[test]
    fn test_missing_file_error_context() {
        let error = read_rows_file(Path::new("/nonexistent/rows.json")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}
