//! Defensive unwrapping of loosely specified service replies.
//!
//! Upstream models disagree on field names, so each reply is probed with an
//! ordered list of candidate keys and the first present one wins.

use serde_json::Value;

/// Candidate keys holding an embedding vector.
pub const EMBEDDING_KEYS: &[&str] = &["embeddings", "embedding", "vector"];

/// Candidate keys holding generated text.
pub const TEXT_KEYS: &[&str] = &["text", "outputText"];

/// Return the value of the first candidate key present in an object.
///
/// Keys whose value is `null` count as absent. Non-objects never match.
#[must_use]
pub fn lookup_first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    keys.iter().find_map(|key| object.get(*key).filter(|v| !v.is_null()))
}

/// Extract an embedding vector from a reply.
///
/// A nested `[[..]]` (batch-shaped reply) yields its first row.
#[must_use]
pub fn embedding_vector(value: &Value) -> Option<Vec<f64>> {
    let found = lookup_first(value, EMBEDDING_KEYS)?.as_array()?;

    let row = match found.first() {
        Some(Value::Array(inner)) => inner,
        _ => found,
    };

    row.iter().map(Value::as_f64).collect()
}

/// Extract generated text from a reply.
#[must_use]
pub fn text_field(value: &Value) -> Option<&Value> {
    lookup_first(value, TEXT_KEYS)
}
