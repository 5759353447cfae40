//! Excel workbook export.

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use super::{Result, TabularExport};
use crate::error::ExportError;
use crate::models::dataset::{CellValue, ConsolidatedDataset};

// Worksheet limits of the xlsx format, header row included.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Single-sheet workbook with a bold header row.
///
/// Numbers are written as numeric cells, text as strings and missing
/// cells are left empty.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new("Facturas")
    }
}

impl TabularExport for XlsxExporter {
    fn export(&self, dataset: &ConsolidatedDataset) -> Result<Vec<u8>> {
        if dataset.len() + 1 > MAX_ROWS {
            return Err(ExportError::TooLarge {
                format: "xlsx",
                reason: format!("{} rows exceed the sheet limit of {}", dataset.len(), MAX_ROWS - 1),
            });
        }
        if dataset.columns().len() > MAX_COLUMNS {
            return Err(ExportError::TooLarge {
                format: "xlsx",
                reason: format!("{} columns", dataset.columns().len()),
            });
        }

        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, column) in dataset.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column.label(), &bold)?;
        }

        for (i, row) in dataset.rows().enumerate() {
            let r = (i + 1) as u32;
            for (col, (_, value)) in row.cells().enumerate() {
                match value {
                    Some(CellValue::Number(n)) => {
                        worksheet.write_number(r, col as u16, *n)?;
                    }
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string(r, col as u16, s)?;
                    }
                    None => {}
                }
            }
        }

        let buffer = workbook.save_to_buffer()?;
        debug!("Wrote xlsx workbook: {} rows, {} bytes", dataset.len(), buffer.len());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::sample_dataset;

    #[test]
    fn test_produces_zip_container() {
        let bytes = XlsxExporter::default().export(&sample_dataset()).unwrap();
        // xlsx files are ZIP packages
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let err = XlsxExporter::new("bad/name").export(&sample_dataset()).unwrap_err();
        assert!(matches!(err, ExportError::Xlsx(_)));
    }
}
