use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single cell from a tabular input file.
///
/// The upstream reader produces rows keyed by lower-cased header; a missing
/// key is the "absent" value, so there is no explicit null variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Free text, kept exactly as read
    Text(String),
    /// Any numeric cell
    Number(f64),
    /// Boolean cell
    Bool(bool),
}

/// One row of tabular input: lower-cased header -> cell value
pub type TableRow = HashMap<String, CellValue>;

impl CellValue {
    /// Borrow the cell as text, if it is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Coerce any cell to its display text (numbers and booleans included)
    pub fn as_display_string(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => format!("{}", number),
            CellValue::Bool(flag) => flag.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(number: f64) -> Self {
        CellValue::Number(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string_coercion() {
        assert_eq!(CellValue::Text("hello".to_string()).as_display_string(), "hello");
        assert_eq!(CellValue::Number(2.0).as_display_string(), "2");
        assert_eq!(CellValue::Number(1.5).as_display_string(), "1.5");
        assert_eq!(CellValue::Bool(true).as_display_string(), "true");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::from("a").as_text(), Some("a"));
        assert_eq!(CellValue::Number(1.0).as_text(), None);
    }
}
