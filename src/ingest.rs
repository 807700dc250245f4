//! Synchronous pipeline: documents in, finalized corpus and report out.

use crate::corpus::linker::LinkStats;
use crate::corpus::{Corpus, CorpusBuilder};
use crate::sources::{adapter_for, ExtractWarning, SourceAdapter};
use crate::types::{SourceDocument, SourceKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub source: SourceKind,
    pub documents_read: usize,
    pub documents_skipped: usize,
    pub sections_extracted: usize,
    pub sections_replaced: usize,
    pub sections: usize,
    pub chapters: usize,
    pub titles: usize,
    pub links: LinkStats,
    pub warnings: Vec<ExtractWarning>,
}

impl IngestReport {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            documents_read: 0,
            documents_skipped: 0,
            sections_extracted: 0,
            sections_replaced: 0,
            sections: 0,
            chapters: 0,
            titles: 0,
            links: LinkStats::default(),
            warnings: Vec::new(),
        }
    }

    pub fn unparseable_labels(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, ExtractWarning::UnparseableLabel { .. }))
            .count()
    }

    pub fn missing_titles(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, ExtractWarning::MissingTitle { .. }))
            .count()
    }

    pub fn malformed_documents(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, ExtractWarning::MalformedDocument { .. }))
            .count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} documents ({} skipped), {} sections ({} replaced), {} chapters, {} titles, {} links ({} suppressed), {} warnings",
            self.source.as_str(),
            self.documents_read,
            self.documents_skipped,
            self.sections,
            self.sections_replaced,
            self.chapters,
            self.titles,
            self.links.linked,
            self.links.suppressed,
            self.warnings.len()
        )
    }
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub corpus: Corpus,
    pub report: IngestReport,
}

/// Runs every accepted document through the adapter into `builder`.
/// Documents are merged in the given order, so a later document wins on
/// duplicate section ids.
pub fn accumulate(
    builder: &mut CorpusBuilder,
    adapter: &dyn SourceAdapter,
    documents: &[SourceDocument],
    report: &mut IngestReport,
) {
    for document in documents {
        if !adapter.accepts(&document.path) {
            report.documents_skipped += 1;
            continue;
        }
        report.documents_read += 1;

        let mut extract = adapter.extract(document);
        report.sections_extracted += extract.sections.len();
        for warning in &extract.warnings {
            tracing::warn!("[Ingest] {}", warning);
        }
        report.warnings.append(&mut extract.warnings);
        report.sections_replaced += builder.add_extract(extract);
    }
}

/// Finalizes `builder` and fills in the corpus-level report counts.
pub fn finalize(builder: CorpusBuilder, mut report: IngestReport) -> IngestOutcome {
    let corpus = builder.build();
    report.sections = corpus.sections().len();
    report.chapters = corpus.chapters().len();
    report.titles = corpus.titles().len();
    report.links = corpus.link_stats();
    tracing::info!("[Ingest] {}", report.summary());
    IngestOutcome { corpus, report }
}

pub fn ingest_documents(source: SourceKind, documents: &[SourceDocument]) -> IngestOutcome {
    let adapter = adapter_for(source);
    let mut builder = CorpusBuilder::new(source);
    let mut report = IngestReport::new(source);
    accumulate(&mut builder, adapter, documents, &mut report);
    finalize(builder, report)
}
