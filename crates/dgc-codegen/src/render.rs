//! Rendering helpers for turning `serde_json::Value` config entries into
//! Python source literals.

use serde_json::Value;

/// Render a config value as a bare Python literal (used for numbers,
/// booleans, and anything already a valid Python expression).
pub fn py_literal(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::Bool(b)) => if *b { "True".to_string() } else { "False".to_string() },
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render a config value as a quoted Python string, falling back to
/// `default` (also quoted) when absent.
pub fn py_str(value: Option<&Value>, default: &str) -> String {
    let raw = match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => default.to_string(),
    };
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Render a value as a bare string (no surrounding quotes), falling back
/// to `default` when absent — used for triple-quoted prompt bodies.
pub fn plain_str(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => default.to_string(),
    }
}
