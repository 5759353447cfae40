//! Document decoding: bytes to pages of text and candidate tables.

mod extractor;
mod tables;

pub use extractor::PdfDecoder;
pub use tables::{detect_tables, split_line_into_spans, CellSpan};

#[cfg(test)]
pub(crate) use extractor::test_support;

use crate::error::DecodeError;

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A rectangular-ish grid of optional cells; row 0 is the candidate header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }
}

/// One decoded page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    /// Extracted plain text, `None` when the page has no extractable text.
    pub text: Option<String>,
    /// Candidate tables in reading order.
    pub tables: Vec<RawTable>,
}

/// Trait for document decoders.
pub trait DocumentDecoder {
    /// Decode document bytes into pages, in document order.
    fn decode(&self, data: &[u8]) -> Result<Vec<RawPage>>;
}
