//! Conversion of MySQL cell values to JSON

use mysql_async::consts::ColumnType;
use serde_json::{Number, Value as JsonValue};

/// Convert a mysql_async value to JSON, using column type metadata to
/// interpret byte strings from the text protocol.
///
/// Integers and floating point columns become JSON numbers. Decimals stay
/// strings so no precision is lost. Temporal values are rendered as MySQL
/// prints them. Non-UTF-8 bytes are rendered as a `0x` hex literal.
pub fn mysql_value_to_json(value: mysql_async::Value, column_type: ColumnType) -> JsonValue {
    match value {
        mysql_async::Value::NULL => JsonValue::Null,
        mysql_async::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text_to_json(text, column_type),
            Err(e) => JsonValue::String(hex_literal(e.as_bytes())),
        },
        mysql_async::Value::Int(i) => JsonValue::from(i),
        mysql_async::Value::UInt(u) => JsonValue::from(u),
        mysql_async::Value::Float(f) => float_to_json(f64::from(f)),
        mysql_async::Value::Double(d) => float_to_json(d),
        mysql_async::Value::Date(year, month, day, hour, min, sec, micro) => {
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            let text = match (column_type, hour, min, sec, micro) {
                (ColumnType::MYSQL_TYPE_DATE, ..) | (_, 0, 0, 0, 0) => date,
                (_, _, _, _, 0) => format!("{} {:02}:{:02}:{:02}", date, hour, min, sec),
                _ => format!("{} {:02}:{:02}:{:02}.{:06}", date, hour, min, sec, micro),
            };
            JsonValue::String(text)
        }
        mysql_async::Value::Time(negative, days, hours, mins, secs, micros) => {
            let total_hours = days * 24 + u32::from(hours);
            let sign = if negative { "-" } else { "" };
            let text = if micros == 0 {
                format!("{}{:02}:{:02}:{:02}", sign, total_hours, mins, secs)
            } else {
                format!(
                    "{}{:02}:{:02}:{:02}.{:06}",
                    sign, total_hours, mins, secs, micros
                )
            };
            JsonValue::String(text)
        }
    }
}

fn text_to_json(text: String, column_type: ColumnType) -> JsonValue {
    match column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_YEAR => {
            if let Ok(i) = text.parse::<i64>() {
                JsonValue::from(i)
            } else if let Ok(u) = text.parse::<u64>() {
                JsonValue::from(u)
            } else {
                JsonValue::String(text)
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::String(text)),
        ColumnType::MYSQL_TYPE_JSON => {
            serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
        }
        _ => JsonValue::String(text),
    }
}

fn float_to_json(value: f64) -> JsonValue {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(value.to_string()))
}

fn hex_literal(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("0x{}", hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysql_async::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn text(s: &str) -> Value {
        Value::Bytes(s.as_bytes().to_vec())
    }

    #[test]
    fn test_null() {
        assert_eq!(
            mysql_value_to_json(Value::NULL, ColumnType::MYSQL_TYPE_LONG),
            JsonValue::Null
        );
    }

    #[test]
    fn test_text_protocol_integers() {
        assert_eq!(
            mysql_value_to_json(text("42"), ColumnType::MYSQL_TYPE_LONG),
            json!(42)
        );
        assert_eq!(
            mysql_value_to_json(text("-7"), ColumnType::MYSQL_TYPE_TINY),
            json!(-7)
        );
        assert_eq!(
            mysql_value_to_json(text("18446744073709551615"), ColumnType::MYSQL_TYPE_LONGLONG),
            json!(18446744073709551615u64)
        );
    }

    #[test]
    fn test_text_protocol_floats_and_decimals() {
        assert_eq!(
            mysql_value_to_json(text("1.5"), ColumnType::MYSQL_TYPE_DOUBLE),
            json!(1.5)
        );
        assert_eq!(
            mysql_value_to_json(text("12345678901234567890.12"), ColumnType::MYSQL_TYPE_NEWDECIMAL),
            json!("12345678901234567890.12")
        );
    }

    #[test]
    fn test_text_protocol_strings_and_json() {
        assert_eq!(
            mysql_value_to_json(text("alice"), ColumnType::MYSQL_TYPE_VAR_STRING),
            json!("alice")
        );
        assert_eq!(
            mysql_value_to_json(text(r#"{"a":[1,2]}"#), ColumnType::MYSQL_TYPE_JSON),
            json!({"a": [1, 2]})
        );
        assert_eq!(
            mysql_value_to_json(text("not json"), ColumnType::MYSQL_TYPE_JSON),
            json!("not json")
        );
    }

    #[test]
    fn test_binary_bytes_become_hex() {
        assert_eq!(
            mysql_value_to_json(Value::Bytes(vec![0xff, 0x00, 0x10]), ColumnType::MYSQL_TYPE_BLOB),
            json!("0xff0010")
        );
    }

    #[test]
    fn test_binary_protocol_numbers() {
        assert_eq!(
            mysql_value_to_json(Value::Int(-3), ColumnType::MYSQL_TYPE_LONG),
            json!(-3)
        );
        assert_eq!(
            mysql_value_to_json(Value::UInt(u64::MAX), ColumnType::MYSQL_TYPE_LONGLONG),
            json!(u64::MAX)
        );
        assert_eq!(
            mysql_value_to_json(Value::Double(f64::NAN), ColumnType::MYSQL_TYPE_DOUBLE),
            json!("NaN")
        );
    }

    #[test]
    fn test_temporal_values() {
        assert_eq!(
            mysql_value_to_json(Value::Date(2024, 2, 29, 0, 0, 0, 0), ColumnType::MYSQL_TYPE_DATE),
            json!("2024-02-29")
        );
        assert_eq!(
            mysql_value_to_json(
                Value::Date(2024, 2, 29, 13, 5, 9, 0),
                ColumnType::MYSQL_TYPE_DATETIME
            ),
            json!("2024-02-29 13:05:09")
        );
        assert_eq!(
            mysql_value_to_json(
                Value::Date(2024, 2, 29, 13, 5, 9, 120),
                ColumnType::MYSQL_TYPE_DATETIME
            ),
            json!("2024-02-29 13:05:09.000120")
        );
        assert_eq!(
            mysql_value_to_json(Value::Time(true, 1, 2, 3, 4, 0), ColumnType::MYSQL_TYPE_TIME),
            json!("-26:03:04")
        );
    }
}
