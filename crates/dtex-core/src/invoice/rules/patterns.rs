//! Regex patterns for DTE header extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // SAT authorization code: 8-char block, hyphen, 27 chars of blocks and hyphens
    pub static ref AUTHORIZATION: Regex = Regex::new(
        r"([A-Z0-9]{8}-[A-Z0-9\-]{27})"
    ).unwrap();

    pub static ref SERIES: Regex = Regex::new(
        r"Serie:\s+([A-Z0-9]+)"
    ).unwrap();

    pub static ref DTE_NUMBER: Regex = Regex::new(
        r"Número de DTE:\s+(\d+)"
    ).unwrap();

    // 05-Ene-2024 10:32:11
    pub static ref EMISSION_TIMESTAMP: Regex = Regex::new(
        r"(\d{2}-[a-zA-Z]{3}-\d{4} \d{2}:\d{2}:\d{2})"
    ).unwrap();

    // Trailing authorization label printed on the issuer line by some templates
    pub static ref AUTHORIZATION_SUFFIX: Regex = Regex::new(
        r"(?i)NÚMERO DE AUTORIZACIÓN:.*"
    ).unwrap();

    pub static ref EMISSION_PARTS: Regex = Regex::new(
        r"^(\d{2})-([a-zA-Z]{3})-(\d{4}) (\d{2}):(\d{2}):(\d{2})$"
    ).unwrap();
}
