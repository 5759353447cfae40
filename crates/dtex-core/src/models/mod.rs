//! Data models shared by the extraction pipeline.

pub mod config;
pub mod dataset;
pub mod invoice;
pub mod report;

pub use config::DtexConfig;
pub use dataset::{CellValue, Column, ConsolidatedDataset, LineItemRow, RecordSet};
pub use invoice::HeaderInfo;
pub use report::{DocumentWarning, ProcessingReport};
