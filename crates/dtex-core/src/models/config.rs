//! Configuration structures for the consolidation pipeline.

use serde::{Deserialize, Serialize};

use super::dataset::Column;
use super::invoice::{DTE_NUMBER_NOT_FOUND, UNIDENTIFIED_ISSUER};
use crate::error::{DtexError, Result};
use crate::export::ExportFormat;

/// Main configuration for the dtex pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtexConfig {
    /// Header extraction configuration.
    pub extraction: ExtractionConfig,

    /// Table reconciliation rules.
    pub tables: TableRules,

    /// Batch source configuration.
    pub source: SourceConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Header extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line marker whose preceding line holds the issuer name.
    pub issuer_marker: String,

    /// Issuer name used when the marker is not found.
    pub unidentified_issuer: String,

    /// DTE number used when the document carries none.
    pub missing_dte_number: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            issuer_marker: "Nit Emisor:".to_string(),
            unidentified_issuer: UNIDENTIFIED_ISSUER.to_string(),
            missing_dte_number: DTE_NUMBER_NOT_FOUND.to_string(),
        }
    }
}

/// Renames a raw column, identified by its synthesized or printed name, to a
/// canonical column.
///
/// Templates that leave the tax-amount header blank produce `Col_8` for the
/// ninth raw column; other templates can supply their own mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalRename {
    pub source: String,
    pub target: Column,
}

/// Rules that recognize and reconcile line-item tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// A table is a line-item table only if some column name contains this.
    pub signature: String,

    /// Lowercase keywords identifying the unit-price column.
    pub unit_price_keywords: Vec<String>,

    /// Columns coerced to numbers.
    pub numeric_columns: Vec<Column>,

    /// Applied after header fields are prepended.
    pub positional_renames: Vec<PositionalRename>,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            signature: "Cantidad".to_string(),
            unit_price_keywords: vec![
                "unitario".to_string(),
                "valor".to_string(),
                "precio".to_string(),
            ],
            numeric_columns: vec![Column::PrecioUnitario, Column::Descuentos],
            positional_renames: vec![PositionalRename {
                source: "Col_8".to_string(),
                target: Column::MontoIva,
            }],
        }
    }
}

/// Batch source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Case-insensitive file name suffix of documents.
    pub document_suffix: String,

    /// Archive entries larger than this are skipped.
    pub max_entry_size: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            document_suffix: ".pdf".to_string(),
            max_entry_size: 100_000_000,
        }
    }
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    pub format: ExportFormat,

    /// Output file stem used when none is given.
    pub file_stem: String,

    /// Worksheet name in the xlsx export.
    pub sheet_name: String,

    /// Field delimiter of the csv export; must be ASCII.
    pub csv_delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            file_stem: "facturas_consolidadas".to_string(),
            sheet_name: "Facturas".to_string(),
            csv_delimiter: ',',
        }
    }
}

impl DtexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| DtexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DtexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
