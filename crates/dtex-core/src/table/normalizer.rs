//! Line-item table detection and reconciliation.

use tracing::{debug, trace};

use crate::models::config::TableRules;
use crate::models::dataset::{Column, RecordSet};
use crate::models::invoice::HeaderInfo;
use crate::pdf::RawTable;

use super::frame::Frame;
use super::numeric::clean_numeric_columns;

/// Turns raw extracted tables into canonical line-item record sets.
#[derive(Debug, Clone, Default)]
pub struct TableNormalizer {
    rules: TableRules,
}

impl TableNormalizer {
    /// Create a normalizer with the standard DTE template rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: TableRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    /// Normalize one table, stamping `header` onto every surviving row.
    ///
    /// Returns `None` when the table is not a line-item table or has no rows
    /// left after cleaning.
    pub fn normalize(&self, table: &RawTable, header: &HeaderInfo) -> Option<RecordSet> {
        let (header_row, data_rows) = table.rows.split_first()?;
        if data_rows.is_empty() {
            return None;
        }

        let mut frame = Frame::from_rows(clean_header_row(header_row), data_rows);
        frame.drop_empty_rows();
        frame.drop_empty_columns();

        if !frame.columns.iter().any(|c| c.contains(self.rules.signature.as_str())) {
            trace!("Rejecting table without {:?} column: {:?}", self.rules.signature, frame.columns);
            return None;
        }

        for column in &mut frame.columns {
            *column = column.trim().to_string();
        }

        self.reconcile_unit_price(&mut frame);

        let quantity = Column::Cantidad.label();
        let description = Column::Descripcion.label();
        let unit_price = Column::PrecioUnitario.label();
        frame.retain_rows(|f, row| {
            f.cell(row, quantity).is_some()
                || f.cell(row, description).is_some()
                || f.cell(row, unit_price).is_some()
        });

        let numeric: Vec<&str> = self.rules.numeric_columns.iter().map(|c| c.label()).collect();
        clean_numeric_columns(&mut frame, &numeric);

        if frame.is_empty() {
            return None;
        }

        for (i, (column, value)) in header.cells().into_iter().enumerate() {
            frame.insert_constant(i, column.label(), value);
        }

        self.apply_positional_renames(&mut frame);

        let record_set = restrict_to_schema(frame);
        debug!(
            "Normalized table: {} rows, columns {:?}",
            record_set.len(),
            record_set.columns
        );
        Some(record_set)
    }

    /// Give the first price-like column the canonical unit-price name, unless
    /// the table already has one.
    fn reconcile_unit_price(&self, frame: &mut Frame) {
        let canonical = Column::PrecioUnitario.label();
        if frame.has_column(canonical) {
            return;
        }

        let found = frame.columns.iter().position(|c| {
            let lower = c.to_lowercase();
            self.rules
                .unit_price_keywords
                .iter()
                .any(|k| lower.contains(k.as_str()))
        });

        if let Some(idx) = found {
            trace!("Renaming {:?} to {:?}", frame.columns[idx], canonical);
            frame.rename(idx, canonical);
        }
    }

    fn apply_positional_renames(&self, frame: &mut Frame) {
        for rule in &self.rules.positional_renames {
            let target = rule.target.label();
            if frame.has_column(target) {
                continue;
            }
            if let Some(idx) = frame.column_index(&rule.source) {
                frame.rename(idx, target);
            }
        }
    }
}

/// Clean a raw header row into unique column names.
///
/// Blank cells become `Col_<index>`; other cells have whitespace runs
/// collapsed. Repeated names keep the first occurrence and get `_<index>`
/// appended on later ones.
pub fn clean_header_row(cells: &[Option<String>]) -> Vec<String> {
    let cleaned: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.split_whitespace().collect::<Vec<_>>().join(" "),
            _ => format!("Col_{}", i),
        })
        .collect();

    let mut names: Vec<String> = Vec::with_capacity(cleaned.len());
    for (i, name) in cleaned.into_iter().enumerate() {
        let mut unique = name;
        while names.contains(&unique) {
            unique = format!("{}_{}", unique, i);
        }
        names.push(unique);
    }
    names
}

/// Keep canonical columns only, in canonical order.
fn restrict_to_schema(frame: Frame) -> RecordSet {
    let selected: Vec<(Column, usize)> = Column::ALL
        .into_iter()
        .filter_map(|c| frame.column_index(c.label()).map(|idx| (c, idx)))
        .collect();

    let rows = frame
        .rows
        .into_iter()
        .map(|mut row| selected.iter().map(|(_, idx)| row[*idx].take()).collect())
        .collect();

    RecordSet {
        columns: selected.into_iter().map(|(c, _)| c).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::PositionalRename;
    use crate::models::dataset::CellValue;
    use pretty_assertions::assert_eq;

    fn header() -> HeaderInfo {
        HeaderInfo {
            empresa: "ACME, S.A.".to_string(),
            autorizacion: "1A2B3C4D-1234-5678-9ABC-DEF012345678".to_string(),
            serie: "1A2B3C4D".to_string(),
            numero_dte: "42".to_string(),
            fecha_emision: "05-Ene-2024 10:32:11".to_string(),
        }
    }

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                        .collect()
                })
                .collect(),
        )
    }

    fn t(v: &str) -> Option<CellValue> {
        Some(CellValue::text(v))
    }

    #[test]
    fn test_clean_header_row_deduplicates() {
        let cells = vec![Some("Total".into()), Some("Total".into()), Some("Col2".into())];
        assert_eq!(clean_header_row(&cells), vec!["Total", "Total_1", "Col2"]);
    }

    #[test]
    fn test_clean_header_row_suffix_does_not_collide() {
        let cells = vec![Some("A".into()), Some("A".into()), Some("A_1".into())];
        assert_eq!(clean_header_row(&cells), vec!["A", "A_1", "A_1_2"]);

        let cells = vec![Some("Col_1".into()), None, Some("Col_1".into())];
        assert_eq!(clean_header_row(&cells), vec!["Col_1", "Col_1_1", "Col_1_2"]);
    }

    #[test]
    fn test_clean_header_row_blanks_and_whitespace() {
        let cells = vec![
            None,
            Some("  P. Unitario\ncon IVA   (Q) ".into()),
            Some("   ".into()),
            Some("Cantidad".into()),
        ];
        assert_eq!(
            clean_header_row(&cells),
            vec!["Col_0", "P. Unitario con IVA (Q)", "Col_2", "Cantidad"]
        );
    }

    #[test]
    fn test_rejects_table_without_quantity_column() {
        let raw = table(&[&["Descripcion", "Total (Q)"], &["Café", "10.00"]]);
        assert_eq!(TableNormalizer::new().normalize(&raw, &header()), None);
    }

    #[test]
    fn test_rejects_header_only_table() {
        let raw = table(&[&["Cantidad", "Descripcion"]]);
        assert_eq!(TableNormalizer::new().normalize(&raw, &header()), None);
    }

    #[test]
    fn test_rejects_quantity_column_that_is_entirely_blank() {
        let raw = table(&[&["Cantidad", "Descripcion"], &["", "Café"]]);
        assert_eq!(TableNormalizer::new().normalize(&raw, &header()), None);
    }

    #[test]
    fn test_normalizes_line_items() {
        let raw = table(&[
            &["#No.", "Cantidad", "Descripcion", "Precio Unitario", "Descuentos (Q)", "Total (Q)"],
            &["1", "2", "Café molido", "Q 1,234.50", "Q 0.00", "2,469.00"],
            &["", "", "", "", "", ""],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        assert_eq!(
            rs.columns,
            vec![
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
            ]
        );
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(0, Column::Empresa), Some(&CellValue::text("ACME, S.A.")));
        assert_eq!(rs.get(0, Column::PrecioUnitario), Some(&CellValue::Number(1234.5)));
        assert_eq!(rs.get(0, Column::Descuentos), Some(&CellValue::Number(0.0)));
        assert_eq!(rs.get(0, Column::Total), Some(&CellValue::text("2,469.00")));
    }

    #[test]
    fn test_row_filter_requires_all_three_missing() {
        let raw = table(&[
            &["Cantidad", "Descripcion", "P. Unitario con IVA (Q)", "Total (Q)"],
            &["", "", "", "Subtotal 10.00"],
            &["3", "", "5.00", "15.00"],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(0, Column::Cantidad), Some(&CellValue::text("3")));
        assert_eq!(rs.get(0, Column::Descripcion), None);
        assert_eq!(rs.get(0, Column::PrecioUnitario), Some(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_missing_description_column_counts_as_missing() {
        let raw = table(&[
            &["Cantidad", "Valor", "Otro"],
            &["", "", "nota"],
            &["1", "", "x"],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        assert_eq!(rs.len(), 1);
        assert_eq!(rs.get(0, Column::Cantidad), Some(&CellValue::text("1")));
    }

    #[test]
    fn test_existing_unit_price_column_is_not_replaced() {
        let raw = table(&[
            &["Cantidad", "Valor Neto", "P. Unitario con IVA (Q)"],
            &["1", "8.93", "10.00"],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        assert_eq!(rs.get(0, Column::PrecioUnitario), Some(&CellValue::Number(10.0)));
    }

    #[test]
    fn test_positional_tax_column() {
        let raw = table(&[
            &["#No.", "B/S", "Cantidad", "Descripcion", "P. Unitario con IVA (Q)",
              "Descuentos (Q)", "Otros Descuentos (Q)", "Total (Q)", "", "Impuestos"],
            &["1", "B", "1", "Agua", "5.00", "0.00", "0.00", "5.00", "0.54", "IVA"],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        assert_eq!(rs.get(0, Column::MontoIva), Some(&CellValue::text("0.54")));
        assert_eq!(rs.get(0, Column::Impuestos), Some(&CellValue::text("IVA")));
        assert_eq!(rs.columns.last(), Some(&Column::MontoIva));
    }

    #[test]
    fn test_custom_positional_rule() {
        let rules = TableRules {
            positional_renames: vec![PositionalRename {
                source: "Col_3".to_string(),
                target: Column::MontoIva,
            }],
            ..TableRules::default()
        };
        let raw = table(&[
            &["Cantidad", "Descripcion", "P. Unitario con IVA (Q)", ""],
            &["1", "Agua", "5.00", "0.54"],
        ]);

        let rs = TableNormalizer::with_rules(rules).normalize(&raw, &header()).unwrap();

        assert_eq!(rs.get(0, Column::MontoIva), Some(&CellValue::text("0.54")));
    }

    #[test]
    fn test_header_is_stamped_on_every_row() {
        let raw = table(&[
            &["Cantidad", "Descripcion"],
            &["1", "Agua"],
            &["2", "Pan"],
        ]);

        let rs = TableNormalizer::new().normalize(&raw, &header()).unwrap();

        for row in 0..rs.len() {
            assert_eq!(rs.get(row, Column::Serie), Some(&CellValue::text("1A2B3C4D")));
            assert_eq!(rs.get(row, Column::NumeroDte), Some(&CellValue::text("42")));
        }
        assert_eq!(rs.rows[1][Column::HEADER.len()], t("2"));
    }
}
