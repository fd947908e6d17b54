//! Completion text → ParsedIntent
//!
//! Two stages: the whole text as strict JSON, then the outermost
//! brace-delimited substring. Language models like to wrap their JSON in
//! prose or code fences, which the second stage tolerates.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::IntentParseError;
use crate::types::{clamp_confidence, ParsedIntent, SizePreference};

/// Used when the model omits `confidence`
pub const DEFAULT_INTENT_CONFIDENCE: f64 = 0.5;

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static JSON object regex"));

/// Wire shape of the model's answer
#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    feature_type: Option<String>,
    #[serde(default)]
    feature_name: Option<String>,
    #[serde(default)]
    size_preference: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Locate a JSON value in completion text
pub fn extract_json(text: &str) -> Result<Value, IntentParseError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    JSON_OBJECT
        .find(trimmed)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .ok_or(IntentParseError::NoJsonFound)
}

/// Parse completion text into an intent
pub fn parse_intent_response(text: &str) -> Result<ParsedIntent, IntentParseError> {
    let value = extract_json(text)?;
    let raw: RawIntent =
        serde_json::from_value(value).map_err(IntentParseError::InvalidSchema)?;

    Ok(ParsedIntent {
        body: non_null(raw.body).map(|b| b.to_lowercase()),
        feature_type: non_null(raw.feature_type).map(|t| t.to_lowercase()),
        feature_name: non_null(raw.feature_name),
        size_preference: non_null(raw.size_preference)
            .as_deref()
            .and_then(SizePreference::parse),
        confidence: clamp_confidence(raw.confidence.unwrap_or(DEFAULT_INTENT_CONFIDENCE)),
    })
}

/// Models sometimes answer with the literal string "null"
fn non_null(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json() {
        let intent = parse_intent_response(
            r#"{"body": "moon", "feature_type": "mountain", "feature_name": null,
                "size_preference": "large", "confidence": 0.9}"#,
        )
        .unwrap();

        assert_eq!(intent.body.as_deref(), Some("moon"));
        assert_eq!(intent.feature_type.as_deref(), Some("mountain"));
        assert_eq!(intent.feature_name, None);
        assert_eq!(intent.size_preference, Some(SizePreference::Large));
        assert_eq!(intent.confidence, 0.9);
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let text = "Sure! Here is the result:\n```json\n{\"body\": null, \"feature_type\": \"crater\", \"feature_name\": \"Tycho\", \"size_preference\": null, \"confidence\": 0.95}\n```";
        let intent = parse_intent_response(text).unwrap();
        assert_eq!(intent.body, None);
        assert_eq!(intent.feature_name.as_deref(), Some("Tycho"));
        assert_eq!(intent.confidence, 0.95);
    }

    #[test]
    fn test_string_null_and_defaults() {
        let intent =
            parse_intent_response(r#"{"body": "null", "size_preference": "huge"}"#).unwrap();
        assert_eq!(intent.body, None);
        assert_eq!(intent.size_preference, None);
        assert_eq!(intent.confidence, DEFAULT_INTENT_CONFIDENCE);
    }

    #[test]
    fn test_confidence_clamped() {
        let intent = parse_intent_response(r#"{"confidence": 7}"#).unwrap();
        assert_eq!(intent.confidence, 1.0);
    }

    #[test]
    fn test_no_json_found() {
        let err = parse_intent_response("I could not understand the query.").unwrap_err();
        assert!(matches!(err, IntentParseError::NoJsonFound));

        let err = parse_intent_response("{ broken").unwrap_err();
        assert!(matches!(err, IntentParseError::NoJsonFound));
    }

    #[test]
    fn test_invalid_schema() {
        let err = parse_intent_response(r#"["moon", "crater"]"#).unwrap_err();
        assert!(matches!(err, IntentParseError::InvalidSchema(_)));

        let err = parse_intent_response(r#"{"confidence": "high"}"#).unwrap_err();
        assert!(matches!(err, IntentParseError::InvalidSchema(_)));
    }
}
