//! Tabular export of the consolidated dataset.

mod csv;
mod xlsx;

pub use self::csv::CsvExporter;
pub use self::xlsx::XlsxExporter;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::dataset::ConsolidatedDataset;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Trait for dataset serializers.
///
/// The header row is the dataset's column order; one row per line item in
/// accumulation order.
pub trait TabularExport {
    fn export(&self, dataset: &ConsolidatedDataset) -> Result<Vec<u8>>;
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Serializer for this format.
    pub fn exporter(self, config: &ExportConfig) -> Box<dyn TabularExport> {
        match self {
            ExportFormat::Xlsx => Box::new(XlsxExporter::new(config.sheet_name.clone())),
            ExportFormat::Csv => Box::new(CsvExporter::new().with_delimiter(config.csv_delimiter)),
            ExportFormat::Json => Box::new(JsonExporter),
        }
    }

    /// Default output file name, e.g. `facturas_consolidadas.xlsx`.
    pub fn default_file_name(self, config: &ExportConfig) -> String {
        format!("{}.{}", config.file_stem, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Array of objects keyed by column label; missing cells are `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl TabularExport for JsonExporter {
    fn export(&self, dataset: &ConsolidatedDataset) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(dataset)?)
    }
}

/// Serialize `dataset` in `format`.
pub fn export_dataset(
    dataset: &ConsolidatedDataset,
    format: ExportFormat,
    config: &ExportConfig,
) -> Result<Vec<u8>> {
    format.exporter(config).export(dataset)
}

/// Serialize `dataset` and write it to `path`, creating parent directories.
pub fn write_dataset(
    dataset: &ConsolidatedDataset,
    format: ExportFormat,
    config: &ExportConfig,
    path: &Path,
) -> crate::error::Result<()> {
    let bytes = export_dataset(dataset, format, config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;

    debug!("Wrote {} export to {} ({} bytes)", format, path.display(), bytes.len());
    Ok(())
}
