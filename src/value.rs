//! Cell value helpers: display strings and content sniffing.

use serde_json::Value;

/// Length above which a fetched full value is treated as big text.
pub const BIG_STRING_CHARS: usize = 10_000;

/// JavaScript-style truthiness.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain string form of a scalar, as a JavaScript `String(v)` would give.
pub fn plain_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => join_values(items, ","),
        other => other.to_string(),
    }
}

fn join_values(items: &[Value], sep: &str) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&plain_string(item));
    }
    out
}

/// Display string of a raw cell value.
///
/// Arrays render as `[a, b]`, aggregate objects as their `rollup`, and null as
/// the empty string.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("[{}]", join_values(items, ", ")),
        Value::Object(map) => match map.get("rollup") {
            Some(rollup) => plain_string(rollup),
            None => value.to_string(),
        },
        other => plain_string(other),
    }
}

fn first_trimmed_char(value: &Value) -> Option<char> {
    match value {
        Value::String(s) if !s.is_empty() => s.trim().chars().next(),
        _ => None,
    }
}

/// Strings starting with `{` or `[`, and any object or array.
pub fn is_json_like(value: &Value) -> bool {
    match value {
        Value::Array(_) | Value::Object(_) => true,
        _ => matches!(first_trimmed_char(value), Some('{' | '[')),
    }
}

pub fn is_xml_like(value: &Value) -> bool {
    first_trimmed_char(value) == Some('<')
}

/// Whether a fetched full value is too large for the regular editor.
pub fn is_big_string(full_value: &Value) -> bool {
    match full_value {
        Value::String(s) => s.chars().count() > BIG_STRING_CHARS,
        Value::Array(items) => join_values(items, ",").chars().count() > BIG_STRING_CHARS,
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_string() {
        assert_eq!(display_string(&json!(null)), "");
        assert_eq!(display_string(&json!("abc")), "abc");
        assert_eq!(display_string(&json!(12.5)), "12.5");
        assert_eq!(display_string(&json!([1, "b", null])), "[1, b, ]");
        assert_eq!(display_string(&json!({"rollup": 42, "n": 3})), "42");
    }

    #[test]
    fn test_json_and_xml_sniffing() {
        assert!(is_json_like(&json!("  {\"a\": 1}")));
        assert!(is_json_like(&json!("[1,2]")));
        assert!(is_json_like(&json!({"a": 1})));
        assert!(is_json_like(&json!([])));
        assert!(!is_json_like(&json!("plain")));
        assert!(!is_json_like(&json!("")));
        assert!(!is_json_like(&json!(null)));

        assert!(is_xml_like(&json!(" <root/>")));
        assert!(!is_xml_like(&json!("root")));
        assert!(!is_xml_like(&json!(5)));
    }

    #[test]
    fn test_big_string_threshold() {
        let exact = "x".repeat(BIG_STRING_CHARS);
        assert!(!is_big_string(&json!(exact)));
        let over = "x".repeat(BIG_STRING_CHARS + 1);
        assert!(is_big_string(&json!(over)));

        // 5001 one-char items joined with "," = 10001 chars
        let items: Vec<Value> = (0..5001).map(|_| json!("a")).collect();
        assert!(is_big_string(&Value::Array(items)));
        assert!(!is_big_string(&json!(123)));
    }
}
