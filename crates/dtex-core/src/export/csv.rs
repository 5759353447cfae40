//! Comma-separated export.

use ::csv::WriterBuilder;

use super::{Result, TabularExport};
use crate::error::ExportError;
use crate::models::dataset::ConsolidatedDataset;

/// CSV with a header row; missing cells are empty fields.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: char,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularExport for CsvExporter {
    fn export(&self, dataset: &ConsolidatedDataset) -> Result<Vec<u8>> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or(ExportError::InvalidDelimiter(self.delimiter))?;

        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::<u8>::new());

        writer.write_record(dataset.columns().iter().map(|c| c.label()))?;
        for row in dataset.rows() {
            writer.write_record(
                row.cells()
                    .map(|(_, value)| value.map(|v| v.to_string()).unwrap_or_default()),
            )?;
        }
        writer.flush()?;

        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}
