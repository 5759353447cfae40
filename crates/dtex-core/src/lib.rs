//! Core library for Guatemalan DTE invoice consolidation.
//!
//! This crate provides:
//! - PDF decoding into page text and whitespace-aligned tables
//! - DTE header extraction (issuer, authorization, series, number, date)
//! - Line-item table normalization into a fixed schema
//! - Batch sources for folders and ZIP archives
//! - Consolidation into one dataset with xlsx, csv and json export

pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod source;
pub mod table;

pub use error::{DocumentError, DtexError, ExportError, Result, SourceError};
pub use export::{export_dataset, write_dataset, ExportFormat, TabularExport};
pub use invoice::HeaderExtractor;
pub use models::{
    CellValue, Column, ConsolidatedDataset, DocumentWarning, DtexConfig, HeaderInfo, LineItemRow,
    ProcessingReport, RecordSet,
};
pub use pdf::{DocumentDecoder, PdfDecoder, RawPage, RawTable};
pub use pipeline::{
    process_archive, process_archive_bytes, process_folder, process_source, BatchAggregator,
    BatchEvent, DocumentProcessor,
};
pub use source::{ArchiveSource, BatchSource, DirectorySource, SourceDocument};
pub use table::TableNormalizer;
