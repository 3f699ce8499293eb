//! Publishing flows: paper drafts, topic analyses, and history.
//!
//! Each flow is a sequential chain of upstream calls scoped to one request.
//! Every collaborator is injected, so tests can swap in doubles.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use regex::Regex;

use crate::client::{BedrockClient, TextGenerator};
use crate::config::{Config, generation};
use crate::error::{PipelineError, PipelineResult, StorageError};
use crate::models::{
    AnalysisReport, AnalysisResult, AnalyzeRequest, HistoryEntry, HistoryReport, PaperRecord,
    ResearchReport,
};
use crate::parser;
use crate::prompt::{PromptMode, build_prompt};
use crate::ranking::{self, Ranker};
use crate::render;
use crate::sources::{ArxivSource, PaperSource, SemanticScholarSource};
use crate::storage::{PaperStore, S3Store};

/// Key prefix for drafted papers.
pub const DRAFT_PREFIX: &str = "generated/";

/// Key prefix for analysis reports.
pub const ANALYSIS_PREFIX: &str = "analysis/";

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w ]").expect("valid filename regex"));

/// File-name-safe version of a topic.
///
/// Word characters, spaces and underscores survive; everything else becomes
/// `_`, then spaces become `_`.
#[must_use]
pub fn safe_title(topic: &str) -> String {
    UNSAFE_CHARS.replace_all(topic, "_").trim().replace(' ', "_")
}

/// Unique PDF file name for a topic.
#[must_use]
pub fn pdf_filename(topic: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}.pdf", safe_title(topic), &id[..8])
}

/// Collaborators of the publishing flows.
pub struct Publisher {
    /// Source used for drafts.
    draft_source: Arc<dyn PaperSource>,

    /// Source used for analyses.
    analysis_source: Arc<dyn PaperSource>,

    /// Relevance ranker.
    ranker: Ranker,

    /// Text model.
    generator: Arc<dyn TextGenerator>,

    /// Document storage.
    store: Arc<dyn PaperStore>,
}

impl Publisher {
    /// Create a publisher from explicit collaborators.
    #[must_use]
    pub fn new(
        draft_source: Arc<dyn PaperSource>,
        analysis_source: Arc<dyn PaperSource>,
        ranker: Ranker,
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn PaperStore>,
    ) -> Self {
        Self {
            draft_source,
            analysis_source,
            ranker,
            generator,
            store,
        }
    }

    /// Wire arXiv, Semantic Scholar, Bedrock and S3 from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if any client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let bedrock = Arc::new(BedrockClient::new(config)?);

        Ok(Self::new(
            Arc::new(ArxivSource::new(config)?),
            Arc::new(SemanticScholarSource::new(config)?),
            Ranker::new(bedrock.clone()),
            bedrock,
            Arc::new(S3Store::new(config)?),
        ))
    }

    /// Draft an IEEE-style paper on a topic and publish it as a PDF.
    ///
    /// When the search finds nothing, a placeholder paper named after the
    /// topic keeps the prompt well-formed.
    pub async fn research(&self, prompt: &str) -> PipelineResult<ResearchReport> {
        let topic = prompt.trim();
        if topic.is_empty() {
            return Err(PipelineError::validation("prompt", "Prompt cannot be empty."));
        }

        let mut papers = self.draft_source.fetch(topic, generation::DRAFT_PAPER_LIMIT).await?;
        if papers.is_empty() {
            tracing::info!(
                topic,
                source = self.draft_source.name(),
                "No papers found, using placeholder"
            );
            papers.push(PaperRecord::placeholder(topic));
        }

        let prompt = build_prompt(topic, &papers, PromptMode::Draft);
        let ai_text = self
            .generator
            .generate(&prompt, generation::DRAFT_MAX_TOKENS, generation::TEMPERATURE)
            .await
            .map_err(PipelineError::Inference)?
            .into_text();

        let filename = pdf_filename(topic);
        let pdf = render::render_draft(topic, &ai_text)?;
        let s3_url = self.store.upload(pdf, &format!("{DRAFT_PREFIX}{filename}")).await?;

        tracing::info!(topic, papers = papers.len(), %filename, "Draft published");

        Ok(ResearchReport {
            topic: topic.to_string(),
            papers_found: papers.len(),
            papers,
            s3_url,
            generated_at: Utc::now(),
            filename,
            ai_text,
        })
    }

    /// Analyze a topic: fetch, optionally rank, prompt for JSON, and parse.
    ///
    /// A reply that does not parse is returned as such, not as an error; only
    /// parsed analyses get a PDF report.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> PipelineResult<AnalysisReport> {
        let topic = request.topic.trim();
        if request.top_k == 0 {
            return Err(PipelineError::validation("top_k", "top_k must be at least 1."));
        }

        let papers = self.analysis_source.fetch(topic, request.limit).await?;
        let papers = if request.rank {
            ranking::into_papers(self.ranker.rank(topic, papers).await?)
        } else {
            papers
        };

        let prompt = build_prompt(
            topic,
            &papers,
            PromptMode::Analysis {
                top_k: request.top_k,
            },
        );
        let raw = self
            .generator
            .generate(&prompt, generation::ANALYSIS_MAX_TOKENS, generation::TEMPERATURE)
            .await
            .map_err(PipelineError::Inference)?;

        let analysis = parser::parse(raw);
        let generated_at = Utc::now();

        let (s3_url, filename) = match &analysis {
            AnalysisResult::Analysis(parsed) => {
                let filename = pdf_filename(topic);
                let pdf = render::render_analysis(topic, parsed, generated_at)?;
                let url = self.store.upload(pdf, &format!("{ANALYSIS_PREFIX}{filename}")).await?;
                (Some(url), Some(filename))
            }
            AnalysisResult::ParseFailed { raw_text } => {
                tracing::warn!(
                    topic,
                    chars = raw_text.len(),
                    "Model reply did not parse as analysis"
                );
                (None, None)
            }
        };

        let mut papers = papers;
        papers.truncate(request.top_k);

        Ok(AnalysisReport {
            topic: topic.to_string(),
            papers,
            analysis,
            s3_url,
            filename,
            generated_at,
        })
    }

    /// List drafted papers, newest first.
    pub async fn history(&self) -> Result<HistoryReport, StorageError> {
        let mut objects = self.store.list(DRAFT_PREFIX).await?;
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        let files = objects
            .into_iter()
            .map(|o| HistoryEntry {
                file_name: o.key,
                last_modified: o.last_modified,
                url: o.url,
            })
            .collect();

        Ok(HistoryReport { files })
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("draft_source", &self.draft_source.name())
            .field("analysis_source", &self.analysis_source.name())
            .finish()
    }
}
