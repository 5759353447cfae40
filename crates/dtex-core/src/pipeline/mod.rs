//! Batch processing pipeline.
//!
//! One pipeline serves every trigger: open a [`BatchSource`], run each
//! document through the [`DocumentProcessor`] and let the
//! [`BatchAggregator`] consolidate the results into a [`ProcessingReport`].

mod aggregator;
mod processor;

pub use aggregator::{BatchAggregator, BatchEvent};
pub use processor::DocumentProcessor;

use std::path::Path;

use crate::error::Result;
use crate::models::config::DtexConfig;
use crate::models::report::ProcessingReport;
use crate::pdf::PdfDecoder;
use crate::source::{ArchiveSource, BatchSource, DirectorySource};

/// Process an already opened source with the PDF decoder.
pub fn process_source<F>(source: &mut dyn BatchSource, config: &DtexConfig, on_event: F) -> ProcessingReport
where
    F: FnMut(&BatchEvent<'_>),
{
    let processor = DocumentProcessor::from_config(PdfDecoder::new(), config);
    BatchAggregator::new(processor).run_with_progress(source, on_event)
}

/// Process every PDF in a folder.
pub fn process_folder(path: impl AsRef<Path>, config: &DtexConfig) -> Result<ProcessingReport> {
    let mut source = DirectorySource::open(path, &config.source)?;
    Ok(process_source(&mut source, config, |_| {}))
}

/// Process every PDF entry of a ZIP archive on disk.
pub fn process_archive(path: impl AsRef<Path>, config: &DtexConfig) -> Result<ProcessingReport> {
    let mut source = ArchiveSource::open(path, &config.source)?;
    Ok(process_source(&mut source, config, |_| {}))
}

/// Process every PDF entry of ZIP archive bytes held in memory.
pub fn process_archive_bytes(data: Vec<u8>, config: &DtexConfig) -> Result<ProcessingReport> {
    let mut source = ArchiveSource::from_bytes(data, &config.source)?;
    Ok(process_source(&mut source, config, |_| {}))
}
