//! Error types for the paper publisher.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Malformed model output is a value ([`crate::models::AnalysisResult`]),
//! not an error.

use std::time::Duration;

/// Errors from the HTTP client layer shared by every upstream adapter.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the upstream service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Non-success HTTP status
    #[error("Unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reply decoded but did not have the expected shape
    #[error("Malformed reply: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited {
            retry_after: Duration::from_secs(seconds),
        }
    }

    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a malformed reply error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from bibliographic paper sources.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// Input validation failed before any request was made
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Transport failure or non-success status from the search service
    #[error("{source_name} unavailable: {cause}")]
    Unavailable {
        /// Human readable name of the source
        source_name: &'static str,
        /// Underlying transport error
        #[source]
        cause: ClientError,
    },
}

impl SourceError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(source_name: &'static str, cause: impl Into<ClientError>) -> Self {
        Self::Unavailable {
            source_name,
            cause: cause.into(),
        }
    }
}

/// Errors from relevance ranking.
#[derive(thiserror::Error, Debug)]
pub enum RankError {
    /// Embedding call failed or returned a malformed reply
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(#[source] ClientError),

    /// A zero-norm vector makes cosine similarity undefined
    #[error("Degenerate embedding vector for {subject}")]
    DegenerateVector {
        /// What the vector was computed for ("query" or a paper title)
        subject: String,
    },

    /// Query and paper vectors came back with different lengths
    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the query vector
        left: usize,
        /// Length of the paper vector
        right: usize,
    },
}

/// Errors from PDF rendering.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Content stream or document serialization failed
    #[error("Failed to encode PDF: {0}")]
    Encode(String),
}

/// Errors from object storage.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Error from the object store backend
    #[error("Object store error: {0}")]
    Store(#[from] object_store::Error),

    /// Storage handle could not be configured
    #[error("Storage configuration error: {0}")]
    Config(String),
}

/// Errors surfaced by the publishing pipeline and the HTTP API.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Request validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Paper source failure
    #[error(transparent)]
    Source(SourceError),

    /// Ranking failure
    #[error("Ranking failed: {0}")]
    Rank(#[from] RankError),

    /// Model inference failure
    #[error("Inference unavailable: {0}")]
    Inference(#[source] ClientError),

    /// PDF rendering failure
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Object storage failure
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Validation { field, message } => Self::Validation { field, message },
            other => Self::Source(other),
        }
    }
}

impl PipelineError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Source(_) | Self::Rank(_) | Self::Inference(_) | Self::Storage(_) => 502,
            Self::Render(_) => 500,
        }
    }

    /// Convert to a user-friendly error message for API responses.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Source(SourceError::Unavailable {
                source_name,
                cause: ClientError::RateLimited { retry_after },
            }) => {
                format!(
                    "Rate limited by {source_name}. Please wait {:?} before retrying.",
                    retry_after
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
