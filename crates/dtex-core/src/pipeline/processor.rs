//! Per-document processing: header, tables, numeric cleanup.

use tracing::debug;

use crate::error::DocumentError;
use crate::invoice::HeaderExtractor;
use crate::models::config::DtexConfig;
use crate::models::dataset::RecordSet;
use crate::pdf::DocumentDecoder;
use crate::source::SourceDocument;
use crate::table::TableNormalizer;

/// Runs header extraction and table normalization over one document.
pub struct DocumentProcessor<D> {
    decoder: D,
    header: HeaderExtractor,
    tables: TableNormalizer,
}

impl<D: DocumentDecoder> DocumentProcessor<D> {
    /// Create a processor with default extraction rules.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            header: HeaderExtractor::new(),
            tables: TableNormalizer::new(),
        }
    }

    pub fn from_config(decoder: D, config: &DtexConfig) -> Self {
        Self {
            decoder,
            header: HeaderExtractor::from_config(&config.extraction),
            tables: TableNormalizer::with_rules(config.tables.clone()),
        }
    }

    /// Record sets contributed by `document`, in page then table order.
    ///
    /// Fails when the document cannot be decoded or its header cannot be
    /// extracted; tables that are not line-item tables are skipped silently.
    pub fn process(&self, document: &SourceDocument) -> Result<Vec<RecordSet>, DocumentError> {
        let pages = self.decoder.decode(&document.data)?;

        let first_text = pages.first().and_then(|p| p.text.as_deref());
        let header = self.header.extract(first_text)?;

        let mut record_sets = Vec::new();
        for (page_no, page) in pages.iter().enumerate() {
            for table in &page.tables {
                if let Some(record_set) = self.tables.normalize(table, &header) {
                    record_sets.push(record_set);
                }
            }
            debug!(
                "{}: page {} -> {} record sets so far",
                document.name,
                page_no + 1,
                record_sets.len()
            );
        }

        Ok(record_sets)
    }
}
