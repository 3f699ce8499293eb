//! Plain-text PDF rendering.
//!
//! Produces A4 pages of wrapped Helvetica text: a title, paragraphs and
//! automatic page breaks.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::error::RenderError;
use crate::models::Analysis;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;

/// Wrap width for draft bodies.
const DRAFT_COLUMNS: usize = 90;

/// Wrap width for analysis reports.
const REPORT_COLUMNS: usize = 100;

#[derive(Debug, Clone, Copy)]
enum Face {
    Regular,
    Bold,
}

impl Face {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Accumulates text lines into pages.
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn line(&mut self, face: Face, size: i64, leading: i64, text: &str) {
        if self.y - leading < MARGIN {
            self.break_page();
        }

        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![face.resource().into(), size.into()]),
            Operation::new("Td", vec![MARGIN.into(), self.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(pdf_safe(text))]),
            Operation::new("ET", vec![]),
        ]);
        self.y -= leading;
    }

    fn wrapped(&mut self, face: Face, size: i64, leading: i64, columns: usize, text: &str) {
        for line in textwrap::wrap(text, columns) {
            self.line(face, size, leading, &line);
        }
    }

    fn gap(&mut self, points: i64) {
        self.y -= points;
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(mut self, title: &str) -> Result<Vec<u8>, RenderError> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        assemble(title, self.pages)
    }
}

/// Render a model draft: the topic as title, then the draft paragraphs.
pub fn render_draft(title: &str, body: &str) -> Result<Vec<u8>, RenderError> {
    let mut writer = PageWriter::new();
    writer.wrapped(Face::Bold, 16, 28, 60, title);

    for paragraph in body.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        for line in paragraph.lines() {
            writer.wrapped(Face::Regular, 11, 15, DRAFT_COLUMNS, line.trim());
        }
        writer.gap(8);
    }

    writer.finish(title)
}

/// Render an analysis report with abstract, limitations and innovations.
pub fn render_analysis(
    title: &str,
    analysis: &Analysis,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut writer = PageWriter::new();
    writer.wrapped(Face::Bold, 16, 28, 60, title);
    writer.line(
        Face::Regular,
        10,
        20,
        &format!("Generated: {} UTC", generated_at.format("%Y-%m-%dT%H:%M:%S")),
    );

    writer.line(Face::Bold, 12, 18, "Abstract:");
    writer.wrapped(Face::Regular, 10, 14, REPORT_COLUMNS, &analysis.summary);
    writer.gap(8);

    writer.line(Face::Bold, 12, 16, "Limitations:");
    for limitation in &analysis.limitations {
        writer.wrapped(Face::Regular, 10, 14, REPORT_COLUMNS, &format!("- {limitation}"));
        writer.gap(4);
    }
    writer.gap(8);

    writer.line(Face::Bold, 12, 16, "Proposed Innovations:");
    for innovation in &analysis.innovations {
        writer.line(Face::Regular, 10, 14, &format!("* {}", innovation.title));
        writer.wrapped(
            Face::Regular,
            10,
            12,
            REPORT_COLUMNS,
            &format!("   {}", innovation.summary),
        );
        if !innovation.validation_plan.is_empty() {
            writer.wrapped(
                Face::Regular,
                10,
                12,
                REPORT_COLUMNS,
                &format!("   Validation: {}", innovation.validation_plan),
            );
        }
        if !innovation.metric.is_empty() {
            writer.wrapped(
                Face::Regular,
                10,
                12,
                REPORT_COLUMNS,
                &format!("   Metric: {}", innovation.metric),
            );
        }
        writer.gap(6);
    }

    writer.finish(title)
}

fn assemble(title: &str, pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content.encode().map_err(|e| RenderError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(pdf_safe(title)),
        "Producer" => Object::string_literal("paper-publisher"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Map text onto the ASCII range the base-14 fonts render reliably.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2022}' => '*',
            '\t' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}
