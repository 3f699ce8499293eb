//! Object storage for generated PDFs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{ObjectStore, PutPayload};
use reqwest::Method;

use crate::config::Config;
use crate::error::StorageError;

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key.
    pub key: String,

    /// Last modification time.
    pub last_modified: DateTime<Utc>,

    /// Public URL of the object.
    pub url: String,
}

/// Durable storage for generated documents.
#[async_trait::async_trait]
pub trait PaperStore: Send + Sync {
    /// Store `bytes` under `key` and return a retrieval URL.
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String, StorageError>;

    /// List objects whose key starts with `prefix`, in no particular order.
    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;
}

/// S3 bucket store handing out presigned GET URLs.
#[derive(Debug)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
    region: String,
    presign_expiry: Duration,
}

impl S3Store {
    /// Create a store for the configured bucket.
    ///
    /// Credentials come from the standard `AWS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if the S3 client cannot be built.
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let store = AmazonS3Builder::from_env()
            .with_region(&config.region)
            .with_bucket_name(&config.s3_bucket)
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            store,
            bucket: config.s3_bucket.clone(),
            region: config.region.clone(),
            presign_expiry: config.presign_expiry,
        })
    }

    /// Virtual-hosted style URL of an object.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key)
    }
}

#[async_trait::async_trait]
impl PaperStore for S3Store {
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String, StorageError> {
        let path = Path::from(key);
        let size = bytes.len();

        self.store.put(&path, PutPayload::from(bytes)).await?;
        tracing::info!(bucket = %self.bucket, key, size, "Uploaded object");

        let url = self.store.signed_url(Method::GET, &path, self.presign_expiry).await?;
        Ok(url.to_string())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let prefix = Path::from(prefix);
        let metas: Vec<_> = self.store.list(Some(&prefix)).try_collect().await?;

        Ok(metas
            .into_iter()
            .map(|meta| {
                let key = meta.location.to_string();
                StoredObject {
                    url: self.public_url(&key),
                    key,
                    last_modified: meta.last_modified,
                }
            })
            .collect())
    }
}
