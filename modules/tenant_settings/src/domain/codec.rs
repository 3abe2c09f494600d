//! Text encoding of setting values
//!
//! Every value is persisted as text tagged with a [`SettingType`]. `cast` never
//! fails: malformed text decodes to the type's zero value.

use crate::contract::{CodecError, SettingType, SettingValue};

/// Encodes a logical value under `setting_type`
pub fn encode(setting_type: SettingType, value: &SettingValue) -> Result<String, CodecError> {
    let text = match setting_type {
        SettingType::String => value.to_text(),
        SettingType::Integer => value.as_i64().to_string(),
        SettingType::Float => value.as_f64().to_string(),
        SettingType::Boolean => String::from(if value.as_bool() { "1" } else { "0" }),
        SettingType::Json => serde_json::to_string(&value.to_json())?,
    };
    Ok(text)
}

/// Decodes stored text under `setting_type`
pub fn cast(setting_type: SettingType, text: &str) -> SettingValue {
    match setting_type {
        SettingType::String => SettingValue::String(text.to_string()),
        SettingType::Integer => SettingValue::Integer(parse_leading_integer(text)),
        SettingType::Float => SettingValue::Float(parse_float(text)),
        SettingType::Boolean => SettingValue::Boolean(parse_bool(text)),
        SettingType::Json => SettingValue::Json(
            serde_json::from_str(text).unwrap_or(serde_json::Value::Null),
        ),
    }
}

/// Parses an optional sign followed by digits, ignoring trailing text
///
/// `"42"` → 42, `"3.9"` → 3, `"12abc"` → 12, `"abc"` → 0. Out of range values
/// saturate.
pub fn parse_leading_integer(text: &str) -> i64 {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return 0;
    }
    let digits = &unsigned[..digits_len];
    let parsed = if negative {
        format!("-{}", digits).parse::<i64>()
    } else {
        digits.parse::<i64>()
    };
    parsed.unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

pub fn parse_float(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Permissive boolean: `1`, `true`, `yes`, `on` (any case) are true
pub fn parse_bool(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(setting_type: SettingType, value: SettingValue) -> SettingValue {
        let text = encode(setting_type, &value).unwrap();
        cast(setting_type, &text)
    }

    #[test]
    fn round_trips_each_type() {
        assert_eq!(
            round_trip(SettingType::String, SettingValue::String("Marktic".into())),
            SettingValue::String("Marktic".into())
        );
        assert_eq!(
            round_trip(SettingType::Integer, SettingValue::Integer(42)),
            SettingValue::Integer(42)
        );
        assert_eq!(
            round_trip(SettingType::Float, SettingValue::Float(0.2)),
            SettingValue::Float(0.2)
        );
        assert_eq!(
            round_trip(SettingType::Boolean, SettingValue::Boolean(true)),
            SettingValue::Boolean(true)
        );
        assert_eq!(
            round_trip(SettingType::Boolean, SettingValue::Boolean(false)),
            SettingValue::Boolean(false)
        );
        assert_eq!(
            round_trip(SettingType::Json, SettingValue::Json(json!({"a": 1}))),
            SettingValue::Json(json!({"a": 1}))
        );
    }

    #[test]
    fn encodes_canonical_forms() {
        assert_eq!(encode(SettingType::Integer, &SettingValue::Integer(42)).unwrap(), "42");
        assert_eq!(encode(SettingType::Boolean, &SettingValue::Boolean(true)).unwrap(), "1");
        assert_eq!(encode(SettingType::Boolean, &SettingValue::Boolean(false)).unwrap(), "0");
        assert_eq!(encode(SettingType::Float, &SettingValue::Float(10.0)).unwrap(), "10");
        assert_eq!(
            encode(SettingType::Json, &SettingValue::Json(json!({"a": 1}))).unwrap(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn integer_encoding_truncates() {
        assert_eq!(encode(SettingType::Integer, &SettingValue::Float(3.9)).unwrap(), "3");
        assert_eq!(encode(SettingType::Integer, &SettingValue::Float(-3.9)).unwrap(), "-3");
        assert_eq!(encode(SettingType::Integer, &SettingValue::Boolean(true)).unwrap(), "1");
    }

    #[test]
    fn malformed_text_casts_to_zero_values() {
        assert_eq!(cast(SettingType::Integer, "abc"), SettingValue::Integer(0));
        assert_eq!(cast(SettingType::Integer, "12abc"), SettingValue::Integer(12));
        assert_eq!(cast(SettingType::Integer, " -7 "), SettingValue::Integer(-7));
        assert_eq!(cast(SettingType::Float, "nope"), SettingValue::Float(0.0));
        assert_eq!(cast(SettingType::Boolean, ""), SettingValue::Boolean(false));
        assert_eq!(cast(SettingType::Boolean, "maybe"), SettingValue::Boolean(false));
        assert_eq!(
            cast(SettingType::Json, "{broken"),
            SettingValue::Json(serde_json::Value::Null)
        );
    }

    #[test]
    fn boolean_cast_is_permissive() {
        for text in ["1", "true", "TRUE", "yes", "On", " on "] {
            assert_eq!(cast(SettingType::Boolean, text), SettingValue::Boolean(true), "{text}");
        }
        for text in ["0", "false", "off", "no"] {
            assert_eq!(cast(SettingType::Boolean, text), SettingValue::Boolean(false), "{text}");
        }
    }

    #[test]
    fn integer_parse_saturates() {
        assert_eq!(parse_leading_integer("99999999999999999999"), i64::MAX);
        assert_eq!(parse_leading_integer("-99999999999999999999"), i64::MIN);
    }
}
