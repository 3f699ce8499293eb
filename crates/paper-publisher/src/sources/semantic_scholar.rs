//! Semantic Scholar Graph API search.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use super::{PaperSource, politeness_pause, validate_query};
use crate::client::{build_http_client, check_status};
use crate::config::Config;
use crate::error::{ClientResult, SourceError, SourceResult};
use crate::models::{PaperRecord, SearchReply};

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &[&str] = &["title", "abstract", "url", "year", "authors"];

/// Semantic Scholar paper search.
#[derive(Clone)]
pub struct SemanticScholarSource {
    /// HTTP client.
    client: Client,

    /// Graph API base URL.
    graph_api_url: String,

    /// Delay after each search.
    politeness_delay: Duration,

    /// Whether an API key is sent.
    has_api_key: bool,
}

impl SemanticScholarSource {
    /// Source tag.
    pub const NAME: &'static str = "Semantic Scholar";

    /// Create a new source with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref key) = config.semantic_scholar_api_key {
            let mut value: HeaderValue = key.parse()?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        Ok(Self {
            client: build_http_client(config, headers)?,
            graph_api_url: config.graph_api_url.trim_end_matches('/').to_string(),
            politeness_delay: config.politeness_delay,
            has_api_key: config.semantic_scholar_api_key.is_some(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    async fn search(&self, query: &str, limit: usize) -> ClientResult<SearchReply> {
        let url = format!("{}/paper/search", self.graph_api_url);

        let params = [
            ("query", query.to_string()),
            ("limit", limit.to_string()),
            ("fields", SEARCH_FIELDS.join(",")),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl PaperSource for SemanticScholarSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self, topic: &str, limit: usize) -> SourceResult<Vec<PaperRecord>> {
        let topic = validate_query(topic, limit)?;

        tracing::debug!(topic, limit, "Searching Semantic Scholar");

        let reply = self
            .search(topic, limit)
            .await
            .map_err(|e| SourceError::unavailable(Self::NAME, e))?;

        let total = reply.data.len();
        let papers: Vec<PaperRecord> =
            reply.data.into_iter().filter_map(|hit| hit.into_record(Self::NAME)).collect();

        tracing::info!(
            topic,
            returned = total,
            with_abstract = papers.len(),
            "Semantic Scholar search complete"
        );

        politeness_pause(self.politeness_delay).await;
        Ok(papers)
    }
}

impl std::fmt::Debug for SemanticScholarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarSource")
            .field("graph_api_url", &self.graph_api_url)
            .field("has_api_key", &self.has_api_key)
            .finish()
    }
}
