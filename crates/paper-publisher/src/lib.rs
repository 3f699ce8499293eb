//! Research Paper Publisher
//!
//! Fetches academic papers on a topic from arXiv or Semantic Scholar, asks a
//! hosted Bedrock model to draft an IEEE-style paper or a structured JSON
//! analysis, renders the result to PDF, and publishes it to S3.
//!
//! # Pipeline
//!
//! - **Sources**: [`sources::PaperSource`] adapters return normalized
//!   [`models::PaperRecord`]s.
//! - **Ranking**: [`ranking::Ranker`] orders papers by embedding similarity.
//! - **Prompting**: [`prompt::build_prompt`] builds a deterministic
//!   instruction document.
//! - **Parsing**: [`parser::parse`] turns an untrusted model reply into an
//!   [`models::AnalysisResult`].
//!
//! # Example
//!
//! ```no_run
//! use paper_publisher::{AnalyzeRequest, Config, Publisher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let publisher = Publisher::from_config(&config)?;
//!
//!     let report = publisher.analyze(&AnalyzeRequest::new("graph neural networks")).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod ranking;
pub mod render;
pub mod server;
pub mod sources;
pub mod storage;

pub use config::Config;
pub use error::{ClientError, PipelineError, RankError, SourceError};
pub use models::{AnalysisResult, AnalyzeRequest, PaperRecord};
pub use pipeline::Publisher;
