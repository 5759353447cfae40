//! Numeric coercion of designated table columns.

use crate::invoice::rules::amounts::clean_amount;
use crate::models::dataset::CellValue;

use super::frame::Frame;

/// Coerce every value of the named columns to a number.
///
/// Values are rendered as text and cleaned with [`clean_amount`]; values that
/// do not parse become missing. Absent columns are ignored. Applying this
/// twice gives the same result as applying it once.
pub fn clean_numeric_columns<S: AsRef<str>>(frame: &mut Frame, columns: &[S]) {
    for name in columns {
        frame.map_column(name.as_ref(), |value| {
            value
                .and_then(|v| clean_amount(&v.to_string()))
                .map(CellValue::Number)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame() -> Frame {
        Frame::from_rows(
            vec!["Descripcion".into(), "Precio".into(), "Descuentos (Q)".into()],
            &[
                vec![Some("Café 1,000 g".into()), Some("Q 1,234.50".into()), Some("0.00".into())],
                vec![Some("Azúcar".into()), Some("abc".into()), None],
            ],
        )
    }

    #[test]
    fn test_cleans_only_target_columns() {
        let mut frame = frame();
        clean_numeric_columns(&mut frame, &["Precio", "Descuentos (Q)", "Ausente"]);

        assert_eq!(frame.cell(0, "Precio"), Some(&CellValue::Number(1234.5)));
        assert_eq!(frame.cell(0, "Descuentos (Q)"), Some(&CellValue::Number(0.0)));
        assert_eq!(frame.cell(1, "Precio"), None);
        assert_eq!(frame.cell(1, "Descuentos (Q)"), None);
        assert_eq!(
            frame.cell(0, "Descripcion"),
            Some(&CellValue::text("Café 1,000 g"))
        );
    }

    #[test]
    fn test_idempotent() {
        let mut once = frame();
        clean_numeric_columns(&mut once, &["Precio", "Descuentos (Q)"]);

        let mut twice = once.clone();
        clean_numeric_columns(&mut twice, &["Precio", "Descuentos (Q)"]);

        assert_eq!(once, twice);
    }
}
