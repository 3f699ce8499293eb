//! Hand-written test doubles for the publishing pipeline.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use paper_publisher::client::{Embedder, TextGenerator};
use paper_publisher::error::{ClientError, ClientResult, SourceError, SourceResult, StorageError};
use paper_publisher::models::{PaperRecord, RawModelOutput};
use paper_publisher::pipeline::Publisher;
use paper_publisher::prompt::PromptDocument;
use paper_publisher::ranking::Ranker;
use paper_publisher::sources::{PaperSource, validate_query};
use paper_publisher::storage::{PaperStore, StoredObject};

/// Build a paper with a given title and abstract.
pub fn paper(title: &str, r#abstract: &str) -> PaperRecord {
    PaperRecord::new(
        title,
        r#abstract,
        Some(format!("https://example.org/{}", title.to_lowercase().replace(' ', "-"))),
        Some(2024),
        vec!["Ada Lovelace".to_string()],
        "Semantic Scholar",
    )
}

/// Source returning a fixed list of papers.
pub struct StaticSource {
    pub papers: Vec<PaperRecord>,
    pub calls: Mutex<Vec<(String, usize)>>,
}

impl StaticSource {
    pub fn new(papers: Vec<PaperRecord>) -> Arc<Self> {
        Arc::new(Self {
            papers,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PaperSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, topic: &str, limit: usize) -> SourceResult<Vec<PaperRecord>> {
        let topic = validate_query(topic, limit)?;
        self.calls.lock().unwrap().push((topic.to_string(), limit));
        Ok(self.papers.iter().take(limit).cloned().collect())
    }
}

/// Source that is always down.
pub struct DownSource;

#[async_trait::async_trait]
impl PaperSource for DownSource {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn fetch(&self, topic: &str, limit: usize) -> SourceResult<Vec<PaperRecord>> {
        validate_query(topic, limit)?;
        Err(SourceError::unavailable("down", ClientError::status(503, "Service Unavailable")))
    }
}

/// Embedder mapping known texts to fixed vectors.
pub struct MapEmbedder {
    vectors: HashMap<String, Vec<f64>>,
    fallback: Vec<f64>,
    pub calls: Mutex<Vec<String>>,
}

impl MapEmbedder {
    pub fn new(entries: &[(&str, Vec<f64>)]) -> Arc<Self> {
        Arc::new(Self {
            vectors: entries.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect(),
            fallback: vec![1.0, 0.0],
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Embedder for MapEmbedder {
    async fn embed(&self, text: &str) -> ClientResult<Vec<f64>> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Embedder that fails for one specific text.
pub struct FailingEmbedder {
    pub fail_on: String,
}

#[async_trait::async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, text: &str) -> ClientResult<Vec<f64>> {
        if text == self.fail_on {
            return Err(ClientError::status(500, "embedding backend down"));
        }
        Ok(vec![1.0, 1.0])
    }
}

/// Generator returning a canned reply and recording prompts.
pub struct CannedGenerator {
    reply: RawModelOutput,
    pub prompts: Mutex<Vec<(String, u32)>>,
}

impl CannedGenerator {
    pub fn new(reply: impl Into<RawModelOutput>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().map(|(p, _)| p.clone()).unwrap_or_default()
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        self.prompts.lock().unwrap().last().map(|(_, t)| *t)
    }
}

#[async_trait::async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(
        &self,
        prompt: &PromptDocument,
        max_tokens: u32,
        _temperature: f32,
    ) -> ClientResult<RawModelOutput> {
        self.prompts.lock().unwrap().push((prompt.as_str().to_string(), max_tokens));
        Ok(self.reply.clone())
    }
}

/// In-memory object store.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<(String, Vec<u8>, DateTime<Utc>)>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed an object with a fixed modification time.
    pub fn seed(&self, key: &str, minute: u32) {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap();
        self.objects.lock().unwrap().push((key.to_string(), Vec::new(), at));
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().iter().map(|(k, _, _)| k.clone()).collect()
    }

    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().iter().find(|(k, _, _)| k == key).map(|(_, b, _)| b.clone())
    }
}

#[async_trait::async_trait]
impl PaperStore for MemoryStore {
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String, StorageError> {
        self.objects.lock().unwrap().push((key.to_string(), bytes, Utc::now()));
        Ok(format!("https://memory.test/{key}?signed=1"))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _, _)| k.starts_with(prefix))
            .map(|(k, _, at)| StoredObject {
                key: k.clone(),
                last_modified: *at,
                url: format!("https://memory.test/{k}"),
            })
            .collect())
    }
}

/// Publisher wired entirely to test doubles.
pub fn publisher(
    source: Arc<dyn PaperSource>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn PaperStore>,
) -> Publisher {
    Publisher::new(source.clone(), source, Ranker::new(embedder), generator, store)
}
