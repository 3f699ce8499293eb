//! Request and response bodies for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalysisResult, PaperRecord};
use crate::config::generation;
use crate::prompt::DEFAULT_TOP_K;

/// Input for drafting an IEEE-style paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    /// Research topic.
    pub prompt: String,
}

/// Input for a structured topic analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Research topic.
    pub topic: String,

    /// Papers to fetch from Semantic Scholar.
    #[serde(default = "default_analysis_limit")]
    pub limit: usize,

    /// Papers passed to the model after ranking.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Rank papers by embedding similarity before prompting.
    #[serde(default = "default_true")]
    pub rank: bool,
}

impl AnalyzeRequest {
    /// Request with default limits for a topic.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            limit: default_analysis_limit(),
            top_k: default_top_k(),
            rank: true,
        }
    }
}

fn default_analysis_limit() -> usize {
    generation::ANALYSIS_PAPER_LIMIT
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_true() -> bool {
    true
}

/// Result of drafting a paper.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    /// Trimmed topic.
    pub topic: String,

    /// Number of papers used (including a placeholder).
    pub papers_found: usize,

    /// Papers used for the draft.
    pub papers: Vec<PaperRecord>,

    /// Retrieval URL of the uploaded PDF.
    pub s3_url: String,

    /// Generation time.
    pub generated_at: DateTime<Utc>,

    /// PDF file name.
    pub filename: String,

    /// Model draft text.
    pub ai_text: String,
}

/// Result of a structured analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Trimmed topic.
    pub topic: String,

    /// Papers in ranked order, as passed to the model.
    pub papers: Vec<PaperRecord>,

    /// Parsed model output.
    pub analysis: AnalysisResult,

    /// Retrieval URL of the uploaded report, when the analysis parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_url: Option<String>,

    /// Report file name, when the analysis parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

/// One generated PDF in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// Object key.
    pub file_name: String,

    /// Last modification time.
    pub last_modified: DateTime<Utc>,

    /// Public URL of the object.
    pub url: String,
}

/// Listing of generated PDFs, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    /// Stored files.
    pub files: Vec<HistoryEntry>,
}
