//! Outcome of one batch run.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use super::dataset::{Column, ConsolidatedDataset};
use crate::invoice::rules::dates::parse_emission_timestamp;

/// A document that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentWarning {
    pub document: String,
    pub reason: String,
}

/// Counters and (optionally) the consolidated dataset of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    /// Documents attempted, including skipped ones.
    pub documents_seen: usize,

    /// Wall-clock time of the whole run.
    #[serde(rename = "elapsed_seconds", serialize_with = "serialize_seconds")]
    pub elapsed: Duration,

    /// When the run started.
    pub started_at: DateTime<Local>,

    /// `None` when no document contributed a single row.
    #[serde(skip)]
    pub dataset: Option<ConsolidatedDataset>,

    /// One entry per skipped document.
    pub warnings: Vec<DocumentWarning>,
}

impl ProcessingReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn row_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, ConsolidatedDataset::len)
    }

    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }

    /// Earliest and latest parseable emission timestamps in the dataset.
    pub fn emission_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let dataset = self.dataset.as_ref()?;
        let mut stamps = dataset
            .rows()
            .filter_map(|row| row.get(Column::FechaEmision))
            .filter_map(|v| parse_emission_timestamp(&v.to_string()));

        let first = stamps.next()?;
        Some(stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }
}

fn serialize_seconds<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((d.as_secs_f64() * 100.0).round() / 100.0)
}
