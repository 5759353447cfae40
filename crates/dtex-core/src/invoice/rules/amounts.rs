//! Amount cleaning for noisy table cells.

/// Parse an amount printed with currency marks and thousands separators.
///
/// Only digits and `.` survive; `,` is a thousands separator and everything
/// else is noise. `"Q 1,234.50"` gives `1234.5`; anything without a
/// parseable number gives `None`.
pub fn clean_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned.parse::<f64>().ok()
}
