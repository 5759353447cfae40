//! Emission timestamp parsing for DTE headers.

use chrono::{NaiveDate, NaiveDateTime};

use super::patterns::EMISSION_PARTS;

/// Parse a `DD-Mon-YYYY HH:MM:SS` timestamp.
///
/// Month abbreviations may be Spanish (`Ene`, `Abr`, `Ago`, `Dic`, ...) or
/// English, in any case.
pub fn parse_emission_timestamp(s: &str) -> Option<NaiveDateTime> {
    let caps = EMISSION_PARTS.captures(s.trim())?;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_to_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps[6].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn month_to_number(month: &str) -> Option<u32> {
    let n = match month.to_lowercase().as_str() {
        "ene" | "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "abr" | "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" | "aug" => 8,
        "sep" | "set" => 9,
        "oct" => 10,
        "nov" => 11,
        "dic" | "dec" => 12,
        _ => return None,
    };
    Some(n)
}
