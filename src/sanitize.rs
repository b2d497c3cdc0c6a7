//! Normalisation of "no data" values before display.
//!
//! The data source represents missing descriptive data in several ways:
//! `null`, empty or whitespace-only strings, `"0"`/`"00"`, numeric zero,
//! `{}` and `[]`. All of them display as absent.

use serde_json::Value;

/// Display text for a loosely typed value, or `None` when it carries no data.
///
/// Non-empty objects and arrays render as their JSON text so a malformed
/// column never breaks rendering.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            match trimmed {
                "" | "0" | "00" => None,
                _ => Some(trimmed.to_string()),
            }
        }
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                None
            } else {
                Some(n.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

/// Whether a value has any content at all (numbers always count)
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) => true,
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
