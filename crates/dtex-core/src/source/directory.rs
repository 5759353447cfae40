//! Documents from a filesystem directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{has_suffix, BatchSource, SourceDocument};
use crate::error::{EntryError, SourceError};
use crate::models::config::SourceConfig;

/// Every regular file in one directory whose name ends with the document
/// suffix, in file-name order. Subdirectories are not searched.
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    total: usize,
    entries: std::vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    /// List the directory; fails if it does not exist or is not a directory.
    pub fn open(path: impl AsRef<Path>, config: &SourceConfig) -> Result<Self, SourceError> {
        let root = path.as_ref().to_path_buf();

        if !root.exists() {
            return Err(SourceError::NotFound(root));
        }
        if !root.is_dir() {
            return Err(SourceError::NotADirectory(root));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| has_suffix(n, &config.document_suffix));

            if matches && path.is_file() {
                entries.push(path);
            }
        }
        entries.sort();

        debug!("Found {} documents in {}", entries.len(), root.display());

        Ok(Self {
            root,
            total: entries.len(),
            entries: entries.into_iter(),
        })
    }
}

impl BatchSource for DirectorySource {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn len(&self) -> usize {
        self.total
    }

    fn next_document(&mut self) -> Option<Result<SourceDocument, EntryError>> {
        let path = self.entries.next()?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Some(match fs::read(&path) {
            Ok(data) => Ok(SourceDocument { name, data }),
            Err(e) => Err(EntryError {
                name,
                source: e.into(),
            }),
        })
    }
}
