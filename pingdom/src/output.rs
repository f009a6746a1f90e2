//! Output formatting: plain `path: value` lines and JSON.

use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `dotted.path: value` line per leaf
    #[default]
    Plain,
    /// JSON (pretty-printed)
    Json,
}

/// Render a response body in the requested format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Plain => Ok(format_plain(value)),
        OutputFormat::Json => serde_json::to_string_pretty(value),
    }
}

/// Flatten `value` into `path: value` lines. Array items are addressed by index.
pub fn format_plain(value: &Value) -> String {
    let mut out = String::new();
    flatten(value, "", &mut out);
    out.trim_end().to_string()
}

fn flatten(v: &Value, path: &str, out: &mut String) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, val) in map {
                flatten(val, &join(path, k), out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, item) in arr.iter().enumerate() {
                flatten(item, &join(path, &i.to_string()), out);
            }
        }
        leaf => {
            let text = match leaf {
                Value::String(s) => s.replace('\n', " "),
                Value::Array(_) => "[]".to_string(),
                Value::Object(_) => "{}".to_string(),
                other => other.to_string(),
            };
            if path.is_empty() {
                let _ = writeln!(out, "{}", text);
            } else {
                let _ = writeln!(out, "{}: {}", path, text);
            }
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}
