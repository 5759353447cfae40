//! Per-document DTE header data.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dataset::{CellValue, Column};
use crate::invoice::rules::dates::parse_emission_timestamp;

/// Issuer placeholder when no "Nit Emisor:" line is found.
pub const UNIDENTIFIED_ISSUER: &str = "Empresa no identificada";

/// DTE number placeholder when the document carries none.
pub const DTE_NUMBER_NOT_FOUND: &str = "No encontrado";

/// Header fields of one DTE, stamped onto each of its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Issuer name (or [`UNIDENTIFIED_ISSUER`]).
    pub empresa: String,

    /// SAT authorization code, e.g. `1A2B3C4D-1234-5678-9ABC-DEF012345678`.
    pub autorizacion: String,

    /// Document series.
    pub serie: String,

    /// DTE number (or [`DTE_NUMBER_NOT_FOUND`]).
    pub numero_dte: String,

    /// Emission timestamp as printed, e.g. `05-Ene-2024 10:32:11`; empty if absent.
    pub fecha_emision: String,
}

impl HeaderInfo {
    /// Header cells in [`Column::HEADER`] order.
    pub fn cells(&self) -> [(Column, CellValue); 5] {
        [
            (Column::Empresa, CellValue::text(&self.empresa)),
            (Column::Autorizacion, CellValue::text(&self.autorizacion)),
            (Column::Serie, CellValue::text(&self.serie)),
            (Column::NumeroDte, CellValue::text(&self.numero_dte)),
            (Column::FechaEmision, CellValue::text(&self.fecha_emision)),
        ]
    }

    /// Parsed emission timestamp, if present and well formed.
    pub fn emitted_at(&self) -> Option<NaiveDateTime> {
        parse_emission_timestamp(&self.fecha_emision)
    }
}
