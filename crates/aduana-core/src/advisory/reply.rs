//! Parsing of advisory replies.
//!
//! Language models wrap JSON in markdown fences and sometimes drop keys, so
//! replies are checked key by key before they are trusted.

use serde_json::{Map, Value};

use super::{CoherenceAssessment, DescriptionAssessment, Verdict};
use crate::error::AdvisoryError;

/// Keys a description reply must carry.
pub const DESCRIPTION_KEYS: [&str; 3] = ["valid", "reason", "suggestion"];

/// Keys a coherence reply must carry.
pub const COHERENCE_KEYS: [&str; 3] = ["coherent", "problems", "advisories"];

/// Remove a surrounding ```json ... ``` fence.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_object(text: &str, required: &[&str]) -> Result<Map<String, Value>, AdvisoryError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(AdvisoryError::MalformedResponse(
            "reply is not a JSON object".to_string(),
        ));
    };
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AdvisoryError::MissingKeys(missing));
    }
    Ok(map)
}

fn flag(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, AdvisoryError> {
    match &map[key] {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        other => Err(AdvisoryError::MalformedResponse(format!(
            "`{key}` must be a boolean or null, got {other}"
        ))),
    }
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    match &map[key] {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lines(map: &Map<String, Value>, key: &str) -> Result<Vec<String>, AdvisoryError> {
    match &map[key] {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(AdvisoryError::MalformedResponse(format!(
            "`{key}` must be a list, got {other}"
        ))),
    }
}

/// Parse a description-review reply.
pub fn parse_description(reply: &str) -> Result<DescriptionAssessment, AdvisoryError> {
    let map = parse_object(reply, &DESCRIPTION_KEYS)?;
    Ok(DescriptionAssessment {
        verdict: Verdict::from_flag(flag(&map, "valid")?),
        reason: text(&map, "reason"),
        suggestion: text(&map, "suggestion"),
        degraded: false,
    })
}

/// Parse a coherence-review reply.
pub fn parse_coherence(reply: &str) -> Result<CoherenceAssessment, AdvisoryError> {
    let map = parse_object(reply, &COHERENCE_KEYS)?;
    Ok(CoherenceAssessment {
        verdict: Verdict::from_flag(flag(&map, "coherent")?),
        problems: lines(&map, "problems")?,
        advisories: lines(&map, "advisories")?,
        degraded: false,
    })
}
