//! Canonical schema, record sets and the consolidated dataset.

use std::collections::BTreeSet;
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// A column of the canonical output schema.
///
/// Variant order is the canonical column order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "Empresa")]
    Empresa,
    #[serde(rename = "Autorización")]
    Autorizacion,
    #[serde(rename = "Serie")]
    Serie,
    #[serde(rename = "Numero-DTE")]
    NumeroDte,
    #[serde(rename = "Fecha Emisión")]
    FechaEmision,
    #[serde(rename = "#No.")]
    Numero,
    #[serde(rename = "Cantidad")]
    Cantidad,
    #[serde(rename = "Descripcion")]
    Descripcion,
    #[serde(rename = "P. Unitario con IVA (Q)")]
    PrecioUnitario,
    #[serde(rename = "Descuentos (Q)")]
    Descuentos,
    #[serde(rename = "Total (Q)")]
    Total,
    #[serde(rename = "Impuestos")]
    Impuestos,
    #[serde(rename = "Monto IVA")]
    MontoIva,
}

impl Column {
    /// Every canonical column, in export order.
    pub const ALL: [Column; 13] = [
        Column::Empresa,
        Column::Autorizacion,
        Column::Serie,
        Column::NumeroDte,
        Column::FechaEmision,
        Column::Numero,
        Column::Cantidad,
        Column::Descripcion,
        Column::PrecioUnitario,
        Column::Descuentos,
        Column::Total,
        Column::Impuestos,
        Column::MontoIva,
    ];

    /// The document header columns prepended to every line item.
    pub const HEADER: [Column; 5] = [
        Column::Empresa,
        Column::Autorizacion,
        Column::Serie,
        Column::NumeroDte,
        Column::FechaEmision,
    ];

    /// Column label as it appears in source tables and in the export.
    pub fn label(self) -> &'static str {
        match self {
            Column::Empresa => "Empresa",
            Column::Autorizacion => "Autorización",
            Column::Serie => "Serie",
            Column::NumeroDte => "Numero-DTE",
            Column::FechaEmision => "Fecha Emisión",
            Column::Numero => "#No.",
            Column::Cantidad => "Cantidad",
            Column::Descripcion => "Descripcion",
            Column::PrecioUnitario => "P. Unitario con IVA (Q)",
            Column::Descuentos => "Descuentos (Q)",
            Column::Total => "Total (Q)",
            Column::Impuestos => "Impuestos",
            Column::MontoIva => "Monto IVA",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-missing cell value. Missing cells are `None` wherever cells are stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Line items from one table, restricted to canonical columns.
///
/// `columns` is strictly increasing in canonical order and every row has
/// exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Cell at `row` for `column`, `None` when missing or the column is absent.
    pub fn get(&self, row: usize, column: Column) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }
}

/// All line items of a batch sharing one column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedDataset {
    columns: Vec<Column>,
    rows: Vec<Vec<Option<CellValue>>>,
}

impl ConsolidatedDataset {
    /// Concatenate record sets in order.
    ///
    /// The resulting columns are the union of every record set's columns in
    /// canonical order; cells for columns a record set lacks are missing.
    /// Returns `None` when there are no rows at all.
    pub fn concat(record_sets: Vec<RecordSet>) -> Option<Self> {
        let columns: Vec<Column> = record_sets
            .iter()
            .filter(|rs| !rs.is_empty())
            .flat_map(|rs| rs.columns.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut rows = Vec::new();
        for record_set in record_sets {
            let mapping: Vec<Option<usize>> = columns
                .iter()
                .map(|c| record_set.column_index(*c))
                .collect();

            for mut row in record_set.rows {
                let out = mapping
                    .iter()
                    .map(|idx| idx.and_then(|i| row.get_mut(i).and_then(Option::take)))
                    .collect();
                rows.push(out);
            }
        }

        if rows.is_empty() {
            None
        } else {
            Some(Self { columns, rows })
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = LineItemRow<'_>> {
        self.rows.iter().map(|values| LineItemRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<LineItemRow<'_>> {
        self.rows.get(index).map(|values| LineItemRow {
            columns: &self.columns,
            values,
        })
    }
}

impl Serialize for ConsolidatedDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

/// A borrowed view of one consolidated row.
#[derive(Debug, Clone, Copy)]
pub struct LineItemRow<'a> {
    columns: &'a [Column],
    values: &'a [Option<CellValue>],
}

impl<'a> LineItemRow<'a> {
    pub fn get(&self, column: Column) -> Option<&'a CellValue> {
        let idx = self.columns.iter().position(|c| *c == column)?;
        self.values.get(idx)?.as_ref()
    }

    /// Cells paired with their columns, in dataset column order.
    pub fn cells(&self) -> impl Iterator<Item = (Column, Option<&'a CellValue>)> + 'a {
        self.columns
            .iter()
            .copied()
            .zip(self.values.iter().map(Option::as_ref))
    }
}

impl Serialize for LineItemRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.cells() {
            map.serialize_entry(column.label(), &value)?;
        }
        map.end()
    }
}
