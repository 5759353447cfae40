//! DTE header field extraction.

mod header;
pub mod rules;

pub use header::HeaderExtractor;

use crate::error::DocumentError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
