//! Data models for papers, model output and API bodies.
//!
//! Upstream reply types use `#[serde(default)]` for optional fields so a
//! sparse reply never fails to decode.

mod analysis;
mod inputs;
mod paper;

pub use analysis::{Analysis, AnalysisResult, Innovation, RawModelOutput};
pub use inputs::*;
pub use paper::{AuthorRef, MAX_AUTHORS, PaperRecord, SearchHit, SearchReply};
