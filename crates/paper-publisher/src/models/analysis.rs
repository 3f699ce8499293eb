//! Structured analysis returned by the text model.
//!
//! Decoding is lenient: scalar leaves of any JSON type become strings, a
//! single string stands in for a list, and entries of the wrong type are
//! skipped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::reply;

/// A research idea proposed by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Innovation {
    /// Short name of the idea.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,

    /// One or two sentence description.
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,

    /// How the idea would be validated experimentally.
    #[serde(
        alias = "validationPlan",
        alias = "validation plan",
        deserialize_with = "lenient_string"
    )]
    pub validation_plan: String,

    /// Metric used to evaluate it.
    #[serde(deserialize_with = "lenient_string")]
    pub metric: String,
}

/// Synthesis of the state of the art on a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    /// Three or four sentence synthesis.
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,

    /// Common limitations across the papers (up to 6 requested).
    #[serde(deserialize_with = "lenient_list")]
    pub limitations: Vec<String>,

    /// Proposed research ideas (3 requested).
    #[serde(deserialize_with = "lenient_innovations")]
    pub innovations: Vec<Innovation>,
}

impl Analysis {
    /// Keys of which at least one must be present in an analysis object.
    pub const KEYS: &'static [&'static str] = &["summary", "limitations", "innovations"];
}

/// Scalar as text; `null` is empty and nested values keep their JSON form.
fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_text)
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text],
        _ => Vec::new(),
    })
}

fn lenient_innovations<'de, D>(deserializer: D) -> Result<Vec<Innovation>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Outcome of parsing a model reply.
///
/// Malformed output is an expected condition, so it is a variant rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    /// The reply decoded into an analysis.
    Analysis(Analysis),

    /// The reply could not be decoded; the text is kept for diagnosis.
    ParseFailed {
        /// Reply text exactly as received.
        raw_text: String,
    },
}

impl AnalysisResult {
    /// Get the analysis if parsing succeeded.
    #[must_use]
    pub const fn analysis(&self) -> Option<&Analysis> {
        match self {
            Self::Analysis(analysis) => Some(analysis),
            Self::ParseFailed { .. } => None,
        }
    }

    /// Whether parsing failed.
    #[must_use]
    pub const fn is_parse_failed(&self) -> bool {
        matches!(self, Self::ParseFailed { .. })
    }
}

/// Raw reply from the text model: plain text or an already structured value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawModelOutput {
    /// Plain text body.
    Text(String),

    /// JSON body, possibly wrapping the text under `text`/`outputText`.
    Structured(Value),
}

impl RawModelOutput {
    /// Flatten to text, unwrapping a `text`/`outputText` field when present.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Structured(value) => match reply::text_field(&value) {
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            },
        }
    }
}

impl From<String> for RawModelOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawModelOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for RawModelOutput {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}
