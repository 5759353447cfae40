//! Working representation of a table while it is being reconciled.

use crate::models::dataset::CellValue;

/// A table with free-form column names.
///
/// Every row has exactly `columns.len()` cells; missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Frame {
    /// Build a frame from data rows against a cleaned header.
    ///
    /// Short rows are padded and long rows truncated to the header width.
    /// Cells that are empty after trimming become missing; other cells keep
    /// their text as printed.
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<Option<String>>]) -> Self {
        let width = columns.len();
        let rows = rows
            .iter()
            .map(|row| {
                (0..width)
                    .map(|i| {
                        row.get(i)
                            .and_then(Option::as_deref)
                            .filter(|s| !s.trim().is_empty())
                            .map(CellValue::text)
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in the column called `name`; absent columns read as missing.
    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Drop rows where every cell is missing.
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| row.iter().any(Option::is_some));
    }

    /// Drop columns where every cell is missing.
    pub fn drop_empty_columns(&mut self) {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|i| self.rows.iter().any(|row| row[i].is_some()))
            .collect();

        let mut flags = keep.iter();
        self.columns.retain(|_| *flags.next().unwrap_or(&false));

        for row in &mut self.rows {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&false));
        }
    }

    /// Keep only rows for which `keep(frame, row_index)` holds.
    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: Fn(&Frame, usize) -> bool,
    {
        let flags: Vec<bool> = (0..self.rows.len()).map(|i| keep(self, i)).collect();
        let mut flags = flags.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(false));
    }

    /// Rename the column at `index`.
    pub fn rename(&mut self, index: usize, name: impl Into<String>) {
        if let Some(column) = self.columns.get_mut(index) {
            *column = name.into();
        }
    }

    /// Insert a column holding `value` in every row.
    pub fn insert_constant(&mut self, index: usize, name: impl Into<String>, value: CellValue) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, name.into());
        for row in &mut self.rows {
            row.insert(index, Some(value.clone()));
        }
    }

    /// Apply `f` to every cell of the column called `name`, if present.
    pub fn map_column<F>(&mut self, name: &str, f: F)
    where
        F: Fn(Option<CellValue>) -> Option<CellValue>,
    {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            row[idx] = f(row[idx].take());
        }
    }
}
