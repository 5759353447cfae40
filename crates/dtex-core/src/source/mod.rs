//! Batch sources: where the documents of one run come from.

mod archive;
mod directory;

pub use archive::ArchiveSource;
pub use directory::DirectorySource;

use crate::error::EntryError;

/// One document of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File or archive entry name, used in warnings.
    pub name: String,
    pub data: Vec<u8>,
}

/// Trait for batch sources.
///
/// Opening a source validates its location; entries are read lazily, one per
/// call, so each document's bytes are dropped before the next is read.
pub trait BatchSource {
    /// Human-readable location for logs.
    fn location(&self) -> String;

    /// Number of documents this source will yield.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Next document, or `None` when exhausted.
    fn next_document(&mut self) -> Option<Result<SourceDocument, EntryError>>;
}

/// Case-insensitive suffix match on a file or entry name.
fn has_suffix(name: &str, suffix: &str) -> bool {
    name.to_lowercase().ends_with(&suffix.to_lowercase())
}
