//! Structured model reply parsing.
//!
//! Parsing never fails: anything that does not decode into an [`Analysis`]
//! comes back as [`AnalysisResult::ParseFailed`] carrying the reply text.
//! Any JSON object decodes; field types are coerced leniently and no bounds
//! on list lengths are enforced. A structured reply must also carry at least
//! one analysis key, so an unrelated envelope is not mistaken for an empty
//! analysis.

use serde_json::Value;

use crate::client::reply;
use crate::models::{Analysis, AnalysisResult, RawModelOutput};

/// Parse a model reply into an analysis.
#[must_use]
pub fn parse(raw: impl Into<RawModelOutput>) -> AnalysisResult {
    match raw.into() {
        RawModelOutput::Text(text) => parse_text(text),
        RawModelOutput::Structured(value) => parse_value(value),
    }
}

fn parse_text(text: String) -> AnalysisResult {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => from_value(value).unwrap_or(AnalysisResult::ParseFailed { raw_text: text }),
        Err(e) => {
            tracing::debug!(error = %e, chars = text.len(), "Model reply is not JSON");
            AnalysisResult::ParseFailed { raw_text: text }
        }
    }
}

fn parse_value(value: Value) -> AnalysisResult {
    match reply::text_field(&value) {
        Some(Value::String(text)) => parse_text(text.clone()),
        Some(inner) => shape_checked(inner.clone()),
        None => match value {
            Value::String(text) => parse_text(text),
            other => shape_checked(other),
        },
    }
}

fn shape_checked(value: Value) -> AnalysisResult {
    let raw_text = value.to_string();

    if !has_analysis_key(&value) {
        tracing::debug!(chars = raw_text.len(), "Structured reply has no analysis keys");
        return AnalysisResult::ParseFailed { raw_text };
    }

    from_value(value).unwrap_or(AnalysisResult::ParseFailed { raw_text })
}

fn has_analysis_key(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| Analysis::KEYS.iter().any(|key| object.contains_key(*key)))
}

fn from_value(value: Value) -> Option<AnalysisResult> {
    if !value.is_object() {
        tracing::debug!("Model reply JSON is not an object");
        return None;
    }

    match serde_json::from_value::<Analysis>(value) {
        Ok(analysis) => Some(AnalysisResult::Analysis(analysis)),
        Err(e) => {
            tracing::debug!(error = %e, "Model reply JSON does not decode as an analysis");
            None
        }
    }
}
