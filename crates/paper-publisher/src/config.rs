//! Configuration for the paper publisher.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// arXiv export API endpoint.
    pub const ARXIV_API: &str = "http://export.arxiv.org/api";

    /// Default AWS region.
    pub const DEFAULT_REGION: &str = "us-east-1";

    /// Default bucket for generated PDFs.
    pub const DEFAULT_BUCKET: &str = "my-research-papers";

    /// Presigned URL lifetime (24 hours).
    pub const PRESIGN_EXPIRY: Duration = Duration::from_secs(86_400);

    /// Text generation model.
    pub const DRAFT_MODEL_ID: &str = "mistral.mistral-7b-instruct-v0:2";

    /// Embedding model.
    pub const EMBEDDING_MODEL_ID: &str = "amazon.titan-embed-text-v1";

    /// Request timeout (model inference on long prompts is slow).
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay after each bibliographic search, to stay polite to the APIs.
    pub const POLITENESS_DELAY: Duration = Duration::from_millis(500);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Bedrock runtime endpoint for a region.
    #[must_use]
    pub fn bedrock_runtime_url(region: &str) -> String {
        format!("https://bedrock-runtime.{region}.amazonaws.com")
    }
}

/// Generation limits used by the two publishing flows.
pub mod generation {
    /// Papers fetched from arXiv for a draft.
    pub const DRAFT_PAPER_LIMIT: usize = 3;

    /// Papers fetched from Semantic Scholar for an analysis.
    pub const ANALYSIS_PAPER_LIMIT: usize = 8;

    /// Token budget for a paper draft.
    pub const DRAFT_MAX_TOKENS: u32 = 900;

    /// Token budget for a structured analysis.
    pub const ANALYSIS_MAX_TOKENS: u32 = 1200;

    /// Sampling temperature for both flows.
    pub const TEMPERATURE: f32 = 0.2;
}

/// Publisher configuration.
#[derive(Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub semantic_scholar_api_key: Option<String>,

    /// Bedrock API key, sent as a bearer token (optional).
    pub bedrock_api_key: Option<String>,

    /// AWS region for Bedrock and S3.
    pub region: String,

    /// Base URL for Semantic Scholar Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Base URL for the arXiv API (for testing with mock servers).
    pub arxiv_api_url: String,

    /// Base URL for the Bedrock runtime (for testing with mock servers).
    pub bedrock_runtime_url: String,

    /// Text generation model ID.
    pub draft_model_id: String,

    /// Embedding model ID.
    pub embedding_model_id: String,

    /// Bucket receiving generated PDFs.
    pub s3_bucket: String,

    /// Presigned URL lifetime.
    pub presign_expiry: Duration,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay after each bibliographic search.
    pub politeness_delay: Duration,
}

impl Config {
    /// Create a configuration for a region with default endpoints and models.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            semantic_scholar_api_key: None,
            bedrock_api_key: None,
            graph_api_url: api::GRAPH_API.to_string(),
            arxiv_api_url: api::ARXIV_API.to_string(),
            bedrock_runtime_url: api::bedrock_runtime_url(&region),
            draft_model_id: api::DRAFT_MODEL_ID.to_string(),
            embedding_model_id: api::EMBEDDING_MODEL_ID.to_string(),
            s3_bucket: api::DEFAULT_BUCKET.to_string(),
            presign_expiry: api::PRESIGN_EXPIRY,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            politeness_delay: api::POLITENESS_DELAY,
            region,
        }
    }

    /// Create a test configuration with every upstream pointed at one mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            semantic_scholar_api_key: None,
            bedrock_api_key: None,
            region: api::DEFAULT_REGION.to_string(),
            graph_api_url: format!("{}/graph/v1", base_url),
            arxiv_api_url: format!("{}/arxiv", base_url),
            bedrock_runtime_url: format!("{}/bedrock", base_url),
            draft_model_id: "test-draft-model".to_string(),
            embedding_model_id: "test-embed-model".to_string(),
            s3_bucket: "test-bucket".to_string(),
            presign_expiry: Duration::from_secs(60),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            politeness_delay: Duration::from_millis(0), // No delay in tests
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Loads a `.env` file first when one is present.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let region =
            std::env::var("AWS_REGION").unwrap_or_else(|_| api::DEFAULT_REGION.to_string());
        let mut config = Self::new(region);

        config.semantic_scholar_api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
        config.bedrock_api_key = std::env::var("AWS_BEARER_TOKEN_BEDROCK").ok();

        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            config.s3_bucket = bucket;
        }
        if let Ok(expiry) = std::env::var("S3_PRESIGN_EXPIRY") {
            let seconds: u64 = expiry
                .parse()
                .map_err(|e| anyhow::anyhow!("S3_PRESIGN_EXPIRY must be seconds: {e}"))?;
            config.presign_expiry = Duration::from_secs(seconds);
        }
        if let Ok(url) = std::env::var("BEDROCK_RUNTIME_URL") {
            url::Url::parse(&url)
                .map_err(|e| anyhow::anyhow!("BEDROCK_RUNTIME_URL is not a valid URL: {e}"))?;
            config.bedrock_runtime_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("DRAFT_MODEL_ID") {
            config.draft_model_id = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL_ID") {
            config.embedding_model_id = model;
        }

        Ok(config)
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_semantic_scholar_key(&self) -> bool {
        self.semantic_scholar_api_key.is_some()
    }

    /// Check if a Bedrock API key is configured.
    #[must_use]
    pub const fn has_bedrock_key(&self) -> bool {
        self.bedrock_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(api::DEFAULT_REGION)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("graph_api_url", &self.graph_api_url)
            .field("arxiv_api_url", &self.arxiv_api_url)
            .field("bedrock_runtime_url", &self.bedrock_runtime_url)
            .field("draft_model_id", &self.draft_model_id)
            .field("embedding_model_id", &self.embedding_model_id)
            .field("s3_bucket", &self.s3_bucket)
            .field("has_semantic_scholar_key", &self.has_semantic_scholar_key())
            .field("has_bedrock_key", &self.has_bedrock_key())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bedrock_runtime_url, "https://bedrock-runtime.us-east-1.amazonaws.com");
        assert_eq!(config.politeness_delay, Duration::from_millis(500));
        assert!(!config.has_bedrock_key());
    }

    #[test]
    fn test_config_region_drives_runtime_url() {
        let config = Config::new("eu-west-1");
        assert_eq!(config.bedrock_runtime_url, "https://bedrock-runtime.eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_config_for_testing_has_no_delay() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.politeness_delay, Duration::ZERO);
        assert_eq!(config.graph_api_url, "http://127.0.0.1:9999/graph/v1");
    }

    #[test]
    fn test_debug_hides_keys() {
        let mut config = Config::default();
        config.bedrock_api_key = Some("super-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("has_bedrock_key: true"));
    }
}
