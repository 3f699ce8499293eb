//! arXiv export API search (Atom XML).

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use super::{PaperSource, politeness_pause, validate_query};
use crate::client::{build_http_client, check_status};
use crate::config::Config;
use crate::error::{ClientError, ClientResult, SourceError, SourceResult};
use crate::models::PaperRecord;

/// arXiv paper search.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    /// HTTP client.
    client: Client,

    /// API base URL.
    api_url: String,

    /// Delay after each search.
    politeness_delay: Duration,
}

impl ArxivSource {
    /// Source tag.
    pub const NAME: &'static str = "arXiv";

    /// Create a new source with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/atom+xml"));

        Ok(Self {
            client: build_http_client(config, headers)?,
            api_url: config.arxiv_api_url.trim_end_matches('/').to_string(),
            politeness_delay: config.politeness_delay,
        })
    }

    async fn query(&self, topic: &str, limit: usize) -> ClientResult<String> {
        let url = format!("{}/query", self.api_url);

        let params = [
            ("search_query", format!("all:{topic}")),
            ("start", "0".to_string()),
            ("max_results", limit.to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let response = check_status(response).await?;

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl PaperSource for ArxivSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch(&self, topic: &str, limit: usize) -> SourceResult<Vec<PaperRecord>> {
        let topic = validate_query(topic, limit)?;

        tracing::debug!(topic, limit, "Searching arXiv");

        let body = self
            .query(topic, limit)
            .await
            .map_err(|e| SourceError::unavailable(Self::NAME, e))?;
        let papers = parse_feed(&body).map_err(|e| SourceError::unavailable(Self::NAME, e))?;

        tracing::info!(topic, with_abstract = papers.len(), "arXiv search complete");

        politeness_pause(self.politeness_delay).await;
        Ok(papers)
    }
}

/// Fields collected for the entry being read.
#[derive(Default)]
struct EntryAccum {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
}

impl EntryAccum {
    fn push_text(&mut self, tag: &[u8], text: &str, in_author: bool) {
        match tag {
            b"id" => self.id.push_str(text),
            b"title" => self.title.push_str(text),
            b"summary" => self.summary.push_str(text),
            b"published" => self.published.push_str(text),
            b"name" if in_author => self.authors.push(text.trim().to_string()),
            _ => {}
        }
    }

    fn into_record(self) -> Option<PaperRecord> {
        let summary = collapse_whitespace(&self.summary);
        if summary.is_empty() {
            return None;
        }

        let title = collapse_whitespace(&self.title);
        let id = self.id.trim();
        let year = self.published.get(..4).and_then(|y| y.parse().ok());

        Some(PaperRecord::new(
            if title.is_empty() { "Untitled".to_string() } else { title },
            summary,
            (!id.is_empty()).then(|| id.to_string()),
            year,
            self.authors,
            ArxivSource::NAME,
        ))
    }
}

/// Atom feed state machine.
#[derive(Default)]
struct FeedParser {
    papers: Vec<PaperRecord>,
    accum: EntryAccum,
    current_tag: Vec<u8>,
    in_entry: bool,
    in_author: bool,
}

impl FeedParser {
    fn handle_start(&mut self, e: &BytesStart<'_>) {
        let name = e.name();
        match name.as_ref() {
            b"entry" => {
                self.in_entry = true;
                self.accum = EntryAccum::default();
            }
            b"author" if self.in_entry => self.in_author = true,
            tag if self.in_entry => self.current_tag = tag.to_vec(),
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_entry {
            self.accum.push_text(&self.current_tag, text, self.in_author);
        }
    }

    fn handle_end(&mut self, tag: &[u8]) {
        match tag {
            b"entry" => {
                let finished = std::mem::take(&mut self.accum);
                if let Some(paper) = finished.into_record() {
                    self.papers.push(paper);
                }
                self.in_entry = false;
                self.current_tag.clear();
            }
            b"author" => self.in_author = false,
            _ => self.current_tag.clear(),
        }
    }
}

/// Parse an arXiv Atom feed into records, dropping entries without an abstract.
///
/// # Errors
///
/// Returns [`ClientError::Malformed`] when the XML cannot be read.
pub fn parse_feed(xml: &str) -> ClientResult<Vec<PaperRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut parser = FeedParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.handle_start(e),
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| ClientError::malformed(format!("arXiv feed: {err}")))?;
                parser.handle_text(&text);
            }
            Ok(Event::CData(e)) => {
                let bytes = e.into_inner();
                parser.handle_text(&String::from_utf8_lossy(&bytes));
            }
            Ok(Event::End(ref e)) => parser.handle_end(e.name().as_ref()),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ClientError::malformed(format!(
                    "arXiv feed at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
        }
    }

    Ok(parser.papers)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:gnn</title>
  <entry>
    <id>http://arxiv.org/abs/2101.00001v1</id>
    <published>2021-01-01T00:00:00Z</published>
    <title>Graph Neural
      Networks &amp; Friends</title>
    <summary>  We study message
      passing.  </summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/pdf/2101.00001v1" rel="related" title="pdf"
          type="application/pdf"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2101.00002v1</id>
    <title>No abstract here</title>
    <summary>   </summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed_normalizes_entries() {
        let papers = parse_feed(FEED).unwrap();
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.title, "Graph Neural Networks & Friends");
        assert_eq!(paper.r#abstract, "We study message passing.");
        assert_eq!(paper.url.as_deref(), Some("http://arxiv.org/abs/2101.00001v1"));
        assert_eq!(paper.year, Some(2021));
        assert_eq!(paper.authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(paper.source, "arXiv");
    }

    #[test]
    fn test_parse_feed_ignores_feed_title() {
        let papers = parse_feed(FEED).unwrap();
        assert!(papers.iter().all(|p| !p.title.contains("ArXiv Query")));
    }

    #[test]
    fn test_parse_feed_caps_authors() {
        let authors: String =
            (1..=7).map(|i| format!("<author><name>Author {i}</name></author>")).collect();
        let xml = format!(
            "<feed><entry><id>x</id><title>T</title><summary>S</summary>{authors}</entry></feed>"
        );
        let papers = parse_feed(&xml).unwrap();
        assert_eq!(papers[0].authors.len(), 5);
    }

    #[test]
    fn test_parse_feed_empty() {
        assert!(parse_feed("<feed></feed>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_malformed() {
        let err = parse_feed("<feed><entry><title>T</summary></entry></feed>").unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }
}
