//! Error types for the dtex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the dtex library.
#[derive(Error, Debug)]
pub enum DtexError {
    /// The batch source could not be opened; nothing was processed.
    #[error("input error: {0}")]
    Source(#[from] SourceError),

    /// Export of the consolidated dataset failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while enumerating a batch of documents.
///
/// Opening a source fails fast; errors for individual entries are yielded
/// alongside the documents and only skip that entry.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The folder path does not point to a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The archive or folder does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The archive bytes are not a readable ZIP archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),

    /// An archive entry exceeds the configured size limit.
    #[error("entry '{name}' is too large ({size} bytes, max {max} bytes)")]
    EntryTooLarge { name: String, size: u64, max: u64 },

    /// I/O error while listing or reading entries.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single batch entry could not be read; only that entry is skipped.
#[derive(Error, Debug)]
#[error("{name}: {source}")]
pub struct EntryError {
    pub name: String,
    pub source: SourceError,
}

/// Errors related to decoding document bytes into pages.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// A document was skipped; the batch continues without it.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The decoder rejected the document bytes.
    #[error("could not decode document: {0}")]
    Decode(#[from] DecodeError),

    /// The first page has no extractable text.
    #[error("first page has no extractable text")]
    MissingText,

    /// A mandatory header field did not match its pattern.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors raised while serializing the consolidated dataset.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Spreadsheet writer error.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The CSV delimiter is not a single ASCII character.
    #[error("invalid csv delimiter: {0:?}")]
    InvalidDelimiter(char),

    /// The dataset has more columns or rows than the format allows.
    #[error("dataset too large for {format}: {reason}")]
    TooLarge { format: &'static str, reason: String },

    /// I/O error while flushing the writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the dtex library.
pub type Result<T> = std::result::Result<T, DtexError>;
