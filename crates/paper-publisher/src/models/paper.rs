//! Normalized paper record and the raw search reply it is built from.

use serde::{Deserialize, Serialize};

/// Maximum number of authors kept per paper.
pub const MAX_AUTHORS: usize = 5;

/// A paper normalized from any bibliographic source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Paper title.
    pub title: String,

    /// Paper abstract.
    pub r#abstract: String,

    /// Landing page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Publication year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// First authors, in byline order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Tag of the source the record came from.
    pub source: String,
}

impl PaperRecord {
    /// Build a record, keeping at most [`MAX_AUTHORS`] authors.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        r#abstract: impl Into<String>,
        url: Option<String>,
        year: Option<i32>,
        authors: impl IntoIterator<Item = String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            r#abstract: r#abstract.into(),
            url,
            year,
            authors: authors.into_iter().take(MAX_AUTHORS).collect(),
            source: source.into(),
        }
    }

    /// Placeholder used when a search finds nothing, so a draft can still be written.
    #[must_use]
    pub fn placeholder(topic: &str) -> Self {
        Self::new(topic, "", None, None, Vec::new(), "none")
    }

    /// Whether the record has a usable abstract.
    #[must_use]
    pub fn has_abstract(&self) -> bool {
        !self.r#abstract.trim().is_empty()
    }

    /// URL or empty string, for prompt interpolation.
    #[must_use]
    pub fn url_or_empty(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }
}

/// Semantic Scholar `/paper/search` reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchReply {
    /// Matching papers.
    #[serde(default)]
    pub data: Vec<SearchHit>,
}

/// One hit from a Semantic Scholar search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Semantic Scholar landing page.
    #[serde(default)]
    pub url: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Authors.
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
}

/// Author reference inside a search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchHit {
    /// Convert to a record tagged with `source`; hits without an abstract are dropped.
    #[must_use]
    pub fn into_record(self, source: &str) -> Option<PaperRecord> {
        let r#abstract = self.r#abstract.filter(|a| !a.trim().is_empty())?;
        let authors = self.authors.into_iter().filter_map(|a| a.name);

        Some(PaperRecord::new(
            self.title.unwrap_or_else(|| "Untitled".to_string()),
            r#abstract,
            self.url,
            self.year,
            authors,
            source,
        ))
    }
}
