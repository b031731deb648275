//! Text component normalization.
//!
//! Accepted shorthand forms: a string, one segment map, a list of segments
//! (one line), or a list containing at least one list (many lines).

use crate::item::arguments::ArgumentError;
use serde_json::{json, Value};

/// Lines of segment maps.
pub type TextLines = Vec<Vec<Value>>;

/// Expands a text component into lines of segment maps.
///
/// `parameter` names the argument in errors.
pub fn normalize(parameter: &str, value: &Value) -> Result<TextLines, ArgumentError> {
    match value {
        Value::String(text) => Ok(vec![vec![json!({ "text": text })]]),
        Value::Object(_) => Ok(vec![vec![value.clone()]]),
        Value::Array(items) if items.iter().any(Value::is_array) => items
            .iter()
            .map(|line| match line {
                Value::String(_) | Value::Object(_) => segment(parameter, line).map(|s| vec![s]),
                Value::Array(parts) => parts.iter().map(|part| segment(parameter, part)).collect(),
                _ => Err(ArgumentError::invalid(
                    parameter,
                    "every line must be a list, a map or a string",
                )),
            })
            .collect(),
        Value::Array(parts) => Ok(vec![parts
            .iter()
            .map(|part| segment(parameter, part))
            .collect::<Result<Vec<_>, _>>()?]),
        _ => Err(ArgumentError::invalid(
            parameter,
            "text must be a string, a map or a list",
        )),
    }
}

/// Normalizes a single-line text component, keeping only the first line.
pub fn first_line(parameter: &str, value: &Value) -> Result<Value, ArgumentError> {
    let lines = normalize(parameter, value)?;
    Ok(Value::Array(lines.into_iter().next().unwrap_or_default()))
}

/// Flattens a text component to plain text.
///
/// `translate` and `keybind` segments render as `<key>`; lines are joined
/// with `\n` when there is more than one.
pub fn plain_text(value: &Value) -> Result<String, ArgumentError> {
    let lines = normalize("text", value)?;
    let multiline = lines.len() > 1;
    let mut out = String::new();
    for line in &lines {
        for part in line {
            let Some(map) = part.as_object() else {
                continue;
            };
            for (key, value) in map {
                match (key.as_str(), value.as_str()) {
                    ("text", Some(text)) => out.push_str(text),
                    ("translate" | "keybind", Some(text)) => {
                        out.push('<');
                        out.push_str(text);
                        out.push('>');
                    }
                    _ => {}
                }
            }
        }
        if multiline {
            out.push('\n');
        }
    }
    Ok(out)
}

fn segment(parameter: &str, part: &Value) -> Result<Value, ArgumentError> {
    match part {
        Value::String(text) => Ok(json!({ "text": text })),
        Value::Object(_) => Ok(part.clone()),
        _ => Err(ArgumentError::invalid(
            parameter,
            "every segment must be a map or a string",
        )),
    }
}
