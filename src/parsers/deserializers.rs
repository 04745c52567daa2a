use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Lenient timestamp deserializer accepting integers (ms) and RFC3339 strings
///
/// A timestamp never decides whether a transcript line is usable, so anything
/// unparseable becomes `None` instead of an error.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        // Unix timestamp in milliseconds
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        timestamp: Option<DateTime<Utc>>,
    }

    fn parse(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Stamped>(json).unwrap().timestamp
    }

    #[test]
    fn test_timestamp_integer_millis() {
        let expected = DateTime::from_timestamp_millis(1762076480016).unwrap();
        assert_eq!(parse(r#"{"timestamp": 1762076480016}"#), Some(expected));
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let ts = parse(r#"{"timestamp": "2026-02-17T10:00:00.000Z"}"#).unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-02-17 10:00:00");
    }

    #[test]
    fn test_timestamp_invalid_or_missing_is_none() {
        assert_eq!(parse(r#"{"timestamp": "yesterday"}"#), None);
        assert_eq!(parse(r#"{"timestamp": null}"#), None);
        assert_eq!(parse(r#"{"timestamp": [1]}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }
}
