//! PDF page decoding using lopdf and pdf-extract.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::tables::{detect_tables, split_line_into_spans};
use super::{DocumentDecoder, RawPage, Result};
use crate::error::DecodeError;

/// PDF decoder producing per-page text and whitespace-aligned tables.
#[derive(Debug, Clone, Default)]
pub struct PdfDecoder;

impl PdfDecoder {
    /// Create a new PDF decoder.
    pub fn new() -> Self {
        Self
    }

    fn load(&self, data: &[u8]) -> Result<(Document, Vec<u8>)> {
        let mut doc = Document::load_mem(data).map_err(|e| DecodeError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DecodeError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| DecodeError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        if doc.get_pages().is_empty() {
            return Err(DecodeError::NoPages);
        }

        Ok((doc, raw_data))
    }
}

impl DocumentDecoder for PdfDecoder {
    fn decode(&self, data: &[u8]) -> Result<Vec<RawPage>> {
        let (doc, raw_data) = self.load(data)?;
        let pages = doc.get_pages();

        let laid_out = laid_out_pages(&raw_data).filter(|split| split.len() == pages.len());

        let mut out = Vec::with_capacity(pages.len());
        for (index, (page_no, page_id)) in pages.iter().enumerate() {
            // Best scoring candidate wins, earlier ones on ties
            let candidates = [
                page_content_text(&doc, *page_id),
                laid_out.as_ref().and_then(|split| split.get(index).cloned()),
                doc.extract_text(&[*page_no]).ok(),
            ];
            let text = choose_best_text(candidates);

            let tables = text.as_deref().map(detect_tables).unwrap_or_default();
            trace!(
                "Page {}: {} chars, {} candidate tables",
                page_no,
                text.as_ref().map_or(0, String::len),
                tables.len()
            );

            out.push(RawPage { text, tables });
        }

        debug!("Decoded PDF with {} pages", out.len());
        Ok(out)
    }
}

/// Whole-document text from pdf-extract, split on form feeds.
fn laid_out_pages(data: &[u8]) -> Option<Vec<String>> {
    // pdf-extract can panic on malformed fonts
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(data)
    }));

    match result {
        Ok(Ok(text)) => Some(split_text_into_pages(&text)),
        Ok(Err(e)) => {
            debug!("pdf-extract failed: {}", e);
            None
        }
        Err(_) => {
            warn!("pdf-extract panicked, using content streams only");
            None
        }
    }
}

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw_text.split('\u{000C}').map(str::to_string).collect();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

/// Page text rebuilt from the content stream, one line per text positioning
/// operator. Spacing inside each shown string is kept as written.
fn page_content_text(doc: &Document, page_id: ObjectId) -> Option<String> {
    let content = Content::decode(&doc.get_page_content(page_id).ok()?).ok()?;
    let encodings: BTreeMap<Vec<u8>, _> = doc
        .get_page_fonts(page_id)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, font)| font.get_font_encoding(doc).ok().map(|enc| (name, enc)))
        .collect();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut encoding = None;

    for operation in &content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|op| op.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tj" | "TJ" | "'" | "\"" => {
                collect_strings(&mut current, &operation.operands, &|bytes| {
                    encoding
                        .and_then(|enc| Document::decode_text(enc, bytes).ok())
                        .unwrap_or_else(|| bytes.iter().map(|&b| b as char).collect())
                });
            }
            "T*" | "Td" | "TD" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            _ => {}
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn collect_strings(text: &mut String, operands: &[Object], decode: &dyn Fn(&[u8]) -> String) {
    for operand in operands {
        match operand {
            Object::String(bytes, _) => text.push_str(&decode(bytes)),
            Object::Array(items) => collect_strings(text, items, decode),
            // Large negative kerning in TJ arrays is a visual gap
            Object::Integer(offset) if *offset < -100 => text.push(' '),
            _ => {}
        }
    }
}

/// Pick the candidate with the most table-like lines; earlier wins ties.
fn choose_best_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    let mut best: Option<(i64, String)> = None;
    for text in candidates.into_iter().flatten() {
        if text.trim().is_empty() {
            continue;
        }
        let score = text_score(&text);
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            best = Some((score, text));
        }
    }
    best.map(|(_, text)| text)
}

fn text_score(text: &str) -> i64 {
    let mut score = 0;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        score += 1;
        if split_line_into_spans(line).len() >= 2 {
            score += 50;
        }
    }
    score
}
