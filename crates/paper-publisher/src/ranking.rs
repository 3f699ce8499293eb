//! Relevance ranking by embedding similarity.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;

use crate::client::Embedder;
use crate::error::RankError;
use crate::models::PaperRecord;

/// Abstracts are cut to this many characters before embedding.
pub const MAX_EMBED_CHARS: usize = 2000;

/// A paper with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPaper {
    /// The paper, unchanged.
    pub paper: PaperRecord,

    /// Cosine similarity to the query, in [-1, 1].
    pub score: f64,
}

/// Cosine similarity of two vectors.
///
/// # Errors
///
/// [`RankError::DimensionMismatch`] for vectors of different lengths and
/// [`RankError::DegenerateVector`] when either vector is all zeros or has a
/// non-finite component.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, RankError> {
    if a.len() != b.len() {
        return Err(RankError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (Some(a), Some(b)) = (scaled(a), scaled(b)) else {
        return Err(degenerate("vector"));
    };

    let dot: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();

    // Rounding can push parallel vectors a hair past 1.
    let score = (dot / (norm_sq(&a) * norm_sq(&b)).sqrt()).clamp(-1.0, 1.0);
    if !score.is_finite() {
        return Err(degenerate("vector"));
    }

    // Adding zero folds -0.0 into 0.0 so ties compare equal under total_cmp.
    Ok(score + 0.0)
}

/// Divide by the largest absolute component so squares cannot overflow.
///
/// `None` for all-zero vectors and vectors with NaN or infinite components.
fn scaled(v: &[f64]) -> Option<Vec<f64>> {
    if !v.iter().all(|x| x.is_finite()) {
        return None;
    }
    let max = v.iter().fold(0.0_f64, |max, x| max.max(x.abs()));
    if max == 0.0 {
        return None;
    }
    Some(v.iter().map(|x| x / max).collect())
}

fn norm_sq(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

fn degenerate(subject: &str) -> RankError {
    RankError::DegenerateVector {
        subject: subject.to_string(),
    }
}

/// Truncate to at most `max` characters on a character boundary.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Orders papers by similarity of their abstracts to a query.
#[derive(Clone)]
pub struct Ranker {
    embedder: Arc<dyn Embedder>,
}

impl Ranker {
    /// Create a ranker over an embedding service.
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Rank `papers` by descending similarity to `query`.
    ///
    /// The output is a permutation of the input; equal scores keep their
    /// input order. Any embedding failure aborts the whole ranking.
    pub async fn rank(
        &self,
        query: &str,
        papers: Vec<PaperRecord>,
    ) -> Result<Vec<RankedPaper>, RankError> {
        if papers.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self.embed(query).await?;
        if scaled(&query_vec).is_none() {
            return Err(degenerate("query"));
        }

        let paper_vecs = try_join_all(
            papers.iter().map(|p| self.embed(truncate_chars(&p.r#abstract, MAX_EMBED_CHARS))),
        )
        .await?;

        let mut ranked = Vec::with_capacity(papers.len());
        for (paper, vec) in papers.into_iter().zip(paper_vecs) {
            let score = cosine_similarity(&query_vec, &vec).map_err(|e| match e {
                RankError::DegenerateVector { .. } => degenerate(&paper.title),
                other => other,
            })?;
            ranked.push(RankedPaper { paper, score });
        }

        // Vec::sort_by is stable, so ties keep input order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            query,
            papers = ranked.len(),
            top_score = ranked.first().map(|r| r.score),
            "Ranked papers"
        );

        Ok(ranked)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>, RankError> {
        self.embedder.embed(text).await.map_err(RankError::EmbeddingUnavailable)
    }
}

impl std::fmt::Debug for Ranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ranker").finish()
    }
}

/// Strip scores, keeping ranked order.
#[must_use]
pub fn into_papers(ranked: Vec<RankedPaper>) -> Vec<PaperRecord> {
    ranked.into_iter().map(|r| r.paper).collect()
}
