use crate::models::CellValue;

/// Convert a cell to seconds, or report "not a time".
///
/// Accepts a finite number (returned as-is), a numeric string, or a clock
/// string in `SS`, `MM:SS`, or `HH:MM:SS` form. Anything else is `None` —
/// this function never fails, so transcript and code-file parsing can probe
/// arbitrary cells with it.
pub fn to_seconds(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(number) if number.is_finite() => Some(*number),
        CellValue::Number(_) => None,
        CellValue::Text(text) => seconds_from_str(text),
        CellValue::Bool(_) => None,
    }
}

/// String half of [`to_seconds`]: numeric strings parse as seconds, clock
/// strings are decomposed into components
pub fn seconds_from_str(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(number) = text.parse::<f64>() {
        return number.is_finite().then_some(number);
    }
    clock_to_seconds(text)
}

/// Parse `SS`, `MM:SS`, or `HH:MM:SS` where every component is a
/// non-negative integer
fn clock_to_seconds(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut total = 0u64;
    for part in &parts {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        total = total * 60 + part.parse::<u64>().ok()?;
    }

    Some(total as f64)
}
