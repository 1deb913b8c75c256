//! Named value formats for the reference grid.
//!
//! A column's `format` property is a short name with an optional precision:
//! - `text` (default): display string of the value
//! - `integer`: rounded, with thousands separators
//! - `fixed:N`: N decimals, no separators
//! - `thousands[:N]`: N decimals (default 2), with thousands separators
//! - `percent[:N]`: value × 100 with N decimals (default 0) and a `%` sign
//!
//! Non-numeric values and unknown names fall back to `text`.

use serde_json::Value;

use crate::value::display_string;

const MAX_DECIMALS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    #[default]
    Text,
    Integer,
    Fixed(usize),
    Thousands(usize),
    Percent(usize),
}

impl ValueFormat {
    pub fn parse(code: &str) -> Self {
        let (name, precision) = match code.split_once(':') {
            Some((name, digits)) => (name, digits.trim().parse::<usize>().ok()),
            None => (code, None),
        };
        let decimals = |default: usize| precision.unwrap_or(default).min(MAX_DECIMALS);
        match name.trim() {
            "integer" => Self::Integer,
            "fixed" => Self::Fixed(decimals(0)),
            "thousands" => Self::Thousands(decimals(2)),
            "percent" => Self::Percent(decimals(0)),
            _ => Self::Text,
        }
    }

    pub fn apply(self, value: &Value) -> String {
        let Some(number) = value.as_f64().filter(|n| n.is_finite()) else {
            return display_string(value);
        };
        match self {
            Self::Text => display_string(value),
            Self::Integer => with_thousands(number.round(), 0),
            Self::Fixed(decimals) => format!("{number:.decimals$}"),
            Self::Thousands(decimals) => with_thousands(number, decimals),
            Self::Percent(decimals) => format!("{:.decimals$}%", number * 100.0),
        }
    }
}

/// Format `value` for display; header rows always show the plain string.
pub fn format_value(format: Option<&Value>, value: &Value, is_header_row: bool) -> String {
    if is_header_row {
        return display_string(value);
    }
    format
        .and_then(Value::as_str)
        .map_or(ValueFormat::Text, ValueFormat::parse)
        .apply(value)
}

fn with_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", value.abs());
    let (int_part, dec_part) = match formatted.split_once('.') {
        Some((int_part, dec_part)) => (int_part, Some(dec_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(dec) = dec_part {
        grouped.push('.');
        grouped.push_str(dec);
    }
    grouped
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("text", ValueFormat::Text)]
    #[test_case("integer", ValueFormat::Integer)]
    #[test_case("fixed:3", ValueFormat::Fixed(3))]
    #[test_case("fixed", ValueFormat::Fixed(0))]
    #[test_case("thousands", ValueFormat::Thousands(2))]
    #[test_case("percent:1", ValueFormat::Percent(1))]
    #[test_case("fixed:99", ValueFormat::Fixed(10))]
    #[test_case("currency", ValueFormat::Text)]
    fn test_parse(code: &str, expected: ValueFormat) {
        assert_eq!(ValueFormat::parse(code), expected);
    }

    #[test_case("integer", json!(1234567.6), "1,234,568")]
    #[test_case("integer", json!(-999.2), "-999")]
    #[test_case("fixed:2", json!(3.14159), "3.14")]
    #[test_case("fixed:2", json!(1234.5), "1234.50")]
    #[test_case("thousands", json!(-1234.5), "-1,234.50")]
    #[test_case("thousands:0", json!(100), "100")]
    #[test_case("percent", json!(0.256), "26%")]
    #[test_case("percent:1", json!(0.256), "25.6%")]
    #[test_case("integer", json!("abc"), "abc")]
    #[test_case("integer", json!(null), "")]
    fn test_apply(code: &str, value: Value, expected: &str) {
        assert_eq!(format_value(Some(&json!(code)), &value, false), expected);
    }

    #[test]
    fn test_header_rows_stay_plain() {
        assert_eq!(format_value(Some(&json!("percent")), &json!(0.5), true), "0.5");
        assert_eq!(format_value(None, &json!(12), false), "12");
    }
}
