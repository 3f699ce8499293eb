//! Instruction documents for the text model.
//!
//! Prompts are pure functions of their inputs: the same topic, papers and
//! mode always give byte-identical text.

use std::fmt;

use crate::models::PaperRecord;

/// Papers interpolated into an analysis prompt by default.
pub const DEFAULT_TOP_K: usize = 5;

/// Section headers the draft must reproduce, in order.
pub const DRAFT_SECTIONS: &[&str] = &[
    "Abstract",
    "Keywords",
    "Introduction",
    "Literature Review",
    "Methodology",
    "Results and Discussion",
    "Conclusion",
    "References",
];

/// Kind of document to ask the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Free-form IEEE-style paper draft.
    Draft,

    /// JSON analysis over the first `top_k` papers.
    Analysis {
        /// Maximum papers interpolated.
        top_k: usize,
    },
}

impl PromptMode {
    /// Analysis mode with the default `top_k`.
    #[must_use]
    pub const fn analysis() -> Self {
        Self::Analysis {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A complete prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptDocument(String);

impl PromptDocument {
    /// Prompt text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the prompt text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PromptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PromptDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the prompt for `topic` over `papers` (already in ranked order).
///
/// An empty `papers` slice still yields a well-formed prompt with an empty
/// papers section.
#[must_use]
pub fn build_prompt(topic: &str, papers: &[PaperRecord], mode: PromptMode) -> PromptDocument {
    let text = match mode {
        PromptMode::Draft => draft_prompt(topic, papers),
        PromptMode::Analysis { top_k } => {
            analysis_prompt(topic, &papers[..papers.len().min(top_k)])
        }
    };

    PromptDocument(text)
}

fn draft_prompt(topic: &str, papers: &[PaperRecord]) -> String {
    let docs = papers
        .iter()
        .map(|p| {
            format!(
                "Title: {}\nAbstract: {}\nURL: {}",
                p.title,
                p.r#abstract,
                p.url_or_empty()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"
You are an expert academic writer. Using the papers below about "{topic}", generate a well-structured IEEE-style research paper draft.
Follow these sections strictly and label each section clearly:
Abstract (100-200 words), Keywords (4-6 words), Introduction, Literature Review, Methodology, Results and Discussion, Conclusion, References.

Papers:
{docs}

Important:
- Use an academic tone and coherent paragraphs.
- Highlight limitations and future work.
- If references are not exact, include plausible citation placeholders in References.
Return only the paper text (with clear section headers).
"#
    )
}

fn analysis_prompt(topic: &str, papers: &[PaperRecord]) -> String {
    let docs = papers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Paper {} Title: {}\nAbstract: {}\nURL: {}\n",
                i + 1,
                p.title,
                p.r#abstract,
                p.url_or_empty()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"
You are an expert academic research assistant.

TASK: Using the papers below about "{topic}", produce JSON with these fields:
- summary: a concise 3-4 sentence synthesis of the current state-of-the-art.
- limitations: an array of up to 6 bullet items (each 1-sentence) describing common limitations, open gaps, or weaknesses across these papers.
- innovations: an array of exactly 3 proposed novel research ideas (each must include: title, summary (1-2 sentences), validation_plan (a short experimental validation plan, 1 sentence), and metric (one metric to evaluate)).

Output EXACTLY valid JSON with these keys: summary, limitations, innovations. Do not add extra commentary.

PAPERS:
{docs}

Return only JSON.
"#
    )
}
