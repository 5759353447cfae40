//! DTE header extraction from first-page text.

use tracing::debug;

use crate::error::DocumentError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::HeaderInfo;

use super::rules::patterns::{
    AUTHORIZATION, AUTHORIZATION_SUFFIX, DTE_NUMBER, EMISSION_TIMESTAMP, SERIES,
};
use super::Result;

/// Extracts [`HeaderInfo`] from the text of a document's first page.
#[derive(Debug, Clone)]
pub struct HeaderExtractor {
    issuer_marker: String,
    unidentified_issuer: String,
    missing_dte_number: String,
}

impl HeaderExtractor {
    /// Create an extractor with the standard DTE markers and sentinels.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            issuer_marker: config.issuer_marker.clone(),
            unidentified_issuer: config.unidentified_issuer.clone(),
            missing_dte_number: config.missing_dte_number.clone(),
        }
    }

    /// Set the line marker that follows the issuer name.
    pub fn with_issuer_marker(mut self, marker: impl Into<String>) -> Self {
        self.issuer_marker = marker.into();
        self
    }

    /// Extract the header, failing when the authorization code or series is
    /// missing or when there is no text at all.
    pub fn extract(&self, text: Option<&str>) -> Result<HeaderInfo> {
        let text = text.ok_or(DocumentError::MissingText)?;

        let empresa = self
            .issuer_name(text)
            .unwrap_or_else(|| self.unidentified_issuer.clone());

        let autorizacion = AUTHORIZATION
            .captures(text)
            .map(|c| c[1].to_string())
            .ok_or(DocumentError::MissingField("autorización"))?;

        let serie = SERIES
            .captures(text)
            .map(|c| c[1].to_string())
            .ok_or(DocumentError::MissingField("serie"))?;

        let numero_dte = DTE_NUMBER
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| self.missing_dte_number.clone());

        let fecha_emision = EMISSION_TIMESTAMP
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        debug!(
            "Extracted header: issuer={:?} series={} dte={}",
            empresa, serie, numero_dte
        );

        Ok(HeaderInfo {
            empresa,
            autorizacion,
            serie,
            numero_dte,
            fecha_emision,
        })
    }

    /// The issuer is printed on the line right above the first marker line
    /// that is not the very first line.
    fn issuer_name(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.split('\n').collect();

        let (i, _) = lines
            .iter()
            .enumerate()
            .find(|(i, line)| *i > 0 && line.contains(self.issuer_marker.as_str()))?;

        let previous = lines[i - 1].trim();
        Some(AUTHORIZATION_SUFFIX.replace(previous, "").trim().to_string())
    }
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new()
    }
}
