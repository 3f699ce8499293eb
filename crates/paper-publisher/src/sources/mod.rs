//! Bibliographic paper sources.
//!
//! Every source returns the same normalized [`PaperRecord`] shape: papers
//! without an abstract are dropped and author lists are capped. Sources are
//! never merged here; combining them is up to the caller.

mod arxiv;
mod semantic_scholar;

pub use arxiv::{ArxivSource, parse_feed};
pub use semantic_scholar::SemanticScholarSource;

use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::models::PaperRecord;

/// Common interface for all bibliographic sources.
#[async_trait::async_trait]
pub trait PaperSource: Send + Sync {
    /// Tag stored in [`PaperRecord::source`].
    fn name(&self) -> &'static str;

    /// Search for up to `limit` papers on `topic`.
    async fn fetch(&self, topic: &str, limit: usize) -> SourceResult<Vec<PaperRecord>>;
}

/// Validate search input, returning the trimmed topic.
pub fn validate_query(topic: &str, limit: usize) -> SourceResult<&str> {
    let topic = topic.trim();

    if topic.is_empty() {
        return Err(SourceError::validation("topic", "Topic cannot be empty."));
    }
    if limit == 0 {
        return Err(SourceError::validation("limit", "Limit must be at least 1."));
    }

    Ok(topic)
}

/// Wait after a completed search.
async fn politeness_pause(delay: Duration) {
    if !delay.is_zero() {
        tracing::trace!(?delay, "Politeness delay");
        tokio::time::sleep(delay).await;
    }
}
