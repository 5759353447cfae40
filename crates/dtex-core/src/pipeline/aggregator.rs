//! Batch aggregation across all documents of a source.

use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::models::dataset::ConsolidatedDataset;
use crate::models::report::{DocumentWarning, ProcessingReport};
use crate::pdf::DocumentDecoder;
use crate::source::BatchSource;

use super::processor::DocumentProcessor;

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent<'a> {
    /// The run is about to start.
    Started { total: usize },
    /// A document contributed `rows` rows (possibly zero).
    Processed { document: &'a str, rows: usize },
    /// A document was skipped.
    Skipped { document: &'a str, reason: &'a str },
}

/// Drives a [`DocumentProcessor`] over a batch source and consolidates the
/// results.
pub struct BatchAggregator<D> {
    processor: DocumentProcessor<D>,
}

impl<D: DocumentDecoder> BatchAggregator<D> {
    pub fn new(processor: DocumentProcessor<D>) -> Self {
        Self { processor }
    }

    /// Process every document of `source`.
    pub fn run(&self, source: &mut dyn BatchSource) -> ProcessingReport {
        self.run_with_progress(source, |_| {})
    }

    /// Process every document of `source`, reporting each one to `on_event`.
    ///
    /// Documents that fail are recorded as warnings and still counted; the
    /// run always completes.
    pub fn run_with_progress<F>(&self, source: &mut dyn BatchSource, mut on_event: F) -> ProcessingReport
    where
        F: FnMut(&BatchEvent<'_>),
    {
        let started_at = Local::now();
        let start = Instant::now();

        info!("Processing {} documents from {}", source.len(), source.location());
        on_event(&BatchEvent::Started { total: source.len() });

        let mut record_sets = Vec::new();
        let mut warnings = Vec::new();
        let mut documents_seen = 0;

        while let Some(next) = source.next_document() {
            documents_seen += 1;

            let outcome = next
                .map_err(|e| (e.name, e.source.to_string()))
                .and_then(|document| match self.processor.process(&document) {
                    Ok(sets) => Ok((document.name, sets)),
                    Err(e) => Err((document.name, e.to_string())),
                });

            match outcome {
                Ok((name, sets)) => {
                    let rows = sets.iter().map(|rs| rs.len()).sum();
                    on_event(&BatchEvent::Processed { document: &name, rows });
                    record_sets.extend(sets);
                }
                Err((name, reason)) => {
                    warn!("Skipping {}: {}", name, reason);
                    on_event(&BatchEvent::Skipped {
                        document: &name,
                        reason: &reason,
                    });
                    warnings.push(DocumentWarning {
                        document: name,
                        reason,
                    });
                }
            }
        }

        let dataset = ConsolidatedDataset::concat(record_sets);
        let elapsed = start.elapsed();

        info!(
            "Processed {} documents in {:.2}s: {} rows, {} skipped",
            documents_seen,
            elapsed.as_secs_f64(),
            dataset.as_ref().map_or(0, ConsolidatedDataset::len),
            warnings.len()
        );

        ProcessingReport {
            documents_seen,
            elapsed,
            started_at,
            dataset,
            warnings,
        }
    }
}
