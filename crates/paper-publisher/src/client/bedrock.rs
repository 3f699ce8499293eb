//! Amazon Bedrock runtime client.
//!
//! Talks to `POST {runtime}/model/{model_id}/invoke` with a bearer API key.
//! One client serves both the embedding model and the text model.

use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use super::reply::{self, TEXT_KEYS};
use super::{Embedder, TextGenerator, build_http_client, check_status};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::RawModelOutput;
use crate::prompt::PromptDocument;

/// Bedrock runtime client.
#[derive(Clone)]
pub struct BedrockClient {
    /// HTTP client carrying the authorization header.
    client: Client,

    /// Runtime base URL.
    runtime_url: String,

    /// Text generation model.
    draft_model_id: String,

    /// Embedding model.
    embedding_model_id: String,

    /// Whether requests are authenticated.
    has_api_key: bool,
}

impl BedrockClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref key) = config.bedrock_api_key {
            let mut value: HeaderValue = format!("Bearer {key}").parse()?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(Self {
            client: build_http_client(config, headers)?,
            runtime_url: config.bedrock_runtime_url.trim_end_matches('/').to_string(),
            draft_model_id: config.draft_model_id.clone(),
            embedding_model_id: config.embedding_model_id.clone(),
            has_api_key: config.bedrock_api_key.is_some(),
        })
    }

    /// Check if requests carry an API key.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// Invoke a model and return the raw reply body.
    async fn invoke(&self, model_id: &str, body: &Value) -> ClientResult<String> {
        let url = format!("{}/model/{}/invoke", self.runtime_url, model_id);

        let response = self.client.post(&url).json(body).send().await?;
        let response = check_status(response).await?;

        Ok(response.text().await?)
    }
}

/// Normalize a text model reply.
///
/// `outputs[*]` (Mistral style) is flattened to text; any other JSON is
/// handed on as a structured value; non-JSON bodies are plain text.
fn normalize_reply(raw: String) -> RawModelOutput {
    let Ok(parsed) = serde_json::from_str::<Value>(&raw) else {
        return RawModelOutput::Text(raw);
    };

    if let Some(outputs) = parsed.get("outputs").and_then(Value::as_array) {
        let text = outputs
            .iter()
            .map(|output| {
                reply::lookup_first(output, TEXT_KEYS).and_then(Value::as_str).unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return RawModelOutput::Text(text);
    }

    RawModelOutput::Structured(parsed)
}

#[async_trait::async_trait]
impl Embedder for BedrockClient {
    async fn embed(&self, text: &str) -> ClientResult<Vec<f64>> {
        let body = json!({ "inputText": text });
        let raw = self.invoke(&self.embedding_model_id, &body).await?;
        let value: Value = serde_json::from_str(&raw)?;

        reply::embedding_vector(&value).ok_or_else(|| {
            ClientError::malformed(format!(
                "no numeric vector under any of {:?}",
                reply::EMBEDDING_KEYS
            ))
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for BedrockClient {
    async fn generate(
        &self,
        prompt: &PromptDocument,
        max_tokens: u32,
        temperature: f32,
    ) -> ClientResult<RawModelOutput> {
        tracing::debug!(
            model = %self.draft_model_id,
            prompt_chars = prompt.as_str().len(),
            max_tokens,
            "Invoking text model"
        );

        let body = json!({
            "prompt": prompt.as_str(),
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let raw = self.invoke(&self.draft_model_id, &body).await?;
        Ok(normalize_reply(raw))
    }
}

impl std::fmt::Debug for BedrockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BedrockClient")
            .field("runtime_url", &self.runtime_url)
            .field("draft_model_id", &self.draft_model_id)
            .field("embedding_model_id", &self.embedding_model_id)
            .field("has_api_key", &self.has_api_key)
            .finish()
    }
}
