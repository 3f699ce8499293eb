//! Fuzzing library for paper-publisher.
//!
//! Targets cover the untrusted inputs: model replies, arXiv Atom feeds and
//! Semantic Scholar search replies.
//!
//! # Usage
//!
//! ```bash
//! cd crates/publisher-fuzz
//! cargo +nightly fuzz run fuzz_reply_parse -- -max_total_time=60
//! ```

pub use paper_publisher::{models, parser, sources};
