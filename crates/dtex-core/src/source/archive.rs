//! Documents from a ZIP archive.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use super::{has_suffix, BatchSource, SourceDocument};
use crate::error::{EntryError, SourceError};
use crate::models::config::SourceConfig;

/// Every file entry of a ZIP archive whose name ends with the document
/// suffix, in archive order.
pub struct ArchiveSource {
    label: String,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    entries: Vec<(usize, String)>,
    next: usize,
    max_entry_size: u64,
}

impl ArchiveSource {
    /// Read an archive from disk.
    pub fn open(path: impl AsRef<Path>, config: &SourceConfig) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SourceError::NotFound(path.to_path_buf()));
        }
        let data = fs::read(path)?;
        Self::build(path.display().to_string(), data, config)
    }

    /// Use archive bytes already in memory, e.g. an upload.
    pub fn from_bytes(data: Vec<u8>, config: &SourceConfig) -> Result<Self, SourceError> {
        Self::build("<archive>".to_string(), data, config)
    }

    fn build(label: String, data: Vec<u8>, config: &SourceConfig) -> Result<Self, SourceError> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let entry = match archive.by_index_raw(i) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable archive entry #{}: {}", i, e);
                    continue;
                }
            };

            if !entry.is_dir() && has_suffix(entry.name(), &config.document_suffix) {
                entries.push((i, entry.name().to_string()));
            }
        }

        debug!("Found {} documents in {}", entries.len(), label);

        Ok(Self {
            label,
            archive,
            entries,
            next: 0,
            max_entry_size: config.max_entry_size,
        })
    }

    fn read_entry(&mut self, index: usize, name: &str) -> Result<Vec<u8>, SourceError> {
        let mut file = self.archive.by_index(index)?;

        let size = file.size();
        if size > self.max_entry_size {
            return Err(SourceError::EntryTooLarge {
                name: name.to_string(),
                size,
                max: self.max_entry_size,
            });
        }

        let mut data = Vec::with_capacity(size as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl BatchSource for ArchiveSource {
    fn location(&self) -> String {
        self.label.clone()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn next_document(&mut self) -> Option<Result<SourceDocument, EntryError>> {
        let (index, name) = self.entries.get(self.next).cloned()?;
        self.next += 1;

        Some(match self.read_entry(index, &name) {
            Ok(data) => Ok(SourceDocument { name, data }),
            Err(source) => Err(EntryError { name, source }),
        })
    }
}
