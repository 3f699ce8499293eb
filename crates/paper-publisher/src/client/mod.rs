//! Upstream service clients.
//!
//! Provides:
//! - The [`Embedder`] and [`TextGenerator`] seams the pipeline depends on
//! - A Bedrock runtime implementation of both
//! - Shared HTTP client construction and status handling
//! - Candidate-key reply unwrapping shared by every adapter

mod bedrock;
pub mod reply;

pub use bedrock::BedrockClient;

use reqwest::Client;
use reqwest::header::HeaderMap;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::RawModelOutput;
use crate::prompt::PromptDocument;

/// Embedding service: one fixed-length vector per text.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> ClientResult<Vec<f64>>;
}

/// Generative inference service.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run the model on a prompt. The reply shape is not fixed upstream.
    async fn generate(
        &self,
        prompt: &PromptDocument,
        max_tokens: u32,
        temperature: f32,
    ) -> ClientResult<RawModelOutput>;
}

/// Build a pooled HTTP client with the configured timeouts.
///
/// # Errors
///
/// Returns error if HTTP client initialization fails.
pub fn build_http_client(config: &Config, headers: HeaderMap) -> anyhow::Result<Client> {
    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    Ok(client)
}

/// Map non-success status codes to [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        return Err(ClientError::rate_limited(retry_after));
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::status(status.as_u16(), text))
}
