//! # ielts-ingest-pdf: PDF Decoder
//!
//! This crate provides the production `PdfDecoder` for the ingestion pipeline,
//! built on the pure-Rust `pdf` crate. It walks each page's content stream and
//! collects the strings drawn by text operators.

use ielts_ingest::ingest::pdf::{DecodedPage, PdfDecodeError, PdfDecoder};
use pdf::content::{Op, TextDrawAdjusted};
use pdf::file::FileOptions;
use tracing::{debug, warn};

/// `TJ` adjustments more negative than this (in thousandths of an em) are
/// wide enough to be a word gap.
const WORD_GAP_ADJUSTMENT: f32 = -200.0;

/// Decodes PDFs with the `pdf` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfCrateDecoder;

impl PdfCrateDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl PdfDecoder for PdfCrateDecoder {
    fn decode(&self, data: &[u8]) -> Result<Vec<DecodedPage>, PdfDecodeError> {
        let file = FileOptions::cached()
            .load(data)
            .map_err(|e| PdfDecodeError::Parse(e.to_string()))?;
        let resolver = file.resolver();
        let num_pages = file.num_pages();
        debug!(num_pages, "Loaded PDF document.");

        let mut pages = Vec::with_capacity(num_pages as usize);
        for page_index in 0..num_pages {
            let page_number = page_index + 1;
            let page = file.get_page(page_index).map_err(|e| PdfDecodeError::Page {
                page: page_number,
                reason: e.to_string(),
            })?;

            let mut text = String::new();
            match &page.contents {
                Some(content) => {
                    let operations =
                        content
                            .operations(&resolver)
                            .map_err(|e| PdfDecodeError::Page {
                                page: page_number,
                                reason: e.to_string(),
                            })?;
                    collect_text(&operations, &mut text);
                }
                None => warn!(page = page_number, "Page has no content stream."),
            }

            pages.push(DecodedPage::new(text, Some(page_number)));
        }

        Ok(pages)
    }
}

/// Appends the text drawn by `operations` to `out`, breaking lines on text
/// positioning operators.
fn collect_text(operations: &[Op], out: &mut String) {
    for op in operations {
        match op {
            Op::TextDraw { text } => out.push_str(&text.to_string_lossy()),
            Op::TextDrawAdjusted { array } => {
                for item in array {
                    match item {
                        TextDrawAdjusted::Text(text) => out.push_str(&text.to_string_lossy()),
                        TextDrawAdjusted::Spacing(gap) if *gap < WORD_GAP_ADJUSTMENT => {
                            push_separator(out, ' ')
                        }
                        TextDrawAdjusted::Spacing(_) => {}
                    }
                }
            }
            Op::TextNewline | Op::MoveTextPosition { .. } | Op::EndText => {
                push_separator(out, '\n')
            }
            _ => {}
        }
    }
}

fn push_separator(out: &mut String, separator: char) {
    if out.chars().last().is_some_and(|c| !c.is_whitespace()) {
        out.push(separator);
    }
}
