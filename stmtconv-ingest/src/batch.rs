//! Runs the document walker over every statement, in order, fail-fast.

use std::path::{Path, PathBuf};

use stmtconv_core::{Result, StatementDate, Transaction};
use tracing::{debug, info};

use crate::backend::TextBackend;
use crate::classify::{ClassTally, LineClassifier};
use crate::scan::scan_statements;
use crate::walk::{DocumentOutcome, DocumentWalker, SkippedLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub date: StatementDate,
    pub pages: usize,
    pub transactions: usize,
    pub tally: ClassTally,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// All records, in document-then-line order
    pub transactions: Vec<Transaction>,
    pub skipped_files: Vec<String>,
    pub skipped_lines: Vec<SkippedLine>,
    pub documents: Vec<DocumentSummary>,
}

impl BatchOutcome {
    pub fn tally(&self) -> ClassTally {
        let mut total = ClassTally::default();
        for doc in &self.documents {
            total.merge(&doc.tally);
        }
        total
    }
}

pub struct Batch<'a> {
    backend: &'a dyn TextBackend,
    classifier: &'a LineClassifier,
}

impl<'a> Batch<'a> {
    pub fn new(backend: &'a dyn TextBackend, classifier: &'a LineClassifier) -> Self {
        Self { backend, classifier }
    }

    /// Scan `root` and convert every statement found there.
    pub fn run_dir(&self, root: &Path) -> Result<BatchOutcome> {
        let scan = scan_statements(root, self.classifier.patterns())?;
        let mut outcome = self.run(&scan.statements)?;
        outcome.skipped_files = scan.skipped_files;
        Ok(outcome)
    }

    /// Convert `paths` in the given order. Any failure aborts the whole batch.
    pub fn run(&self, paths: &[PathBuf]) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for path in paths {
            let date = StatementDate::from_path(path)?;
            let (doc, summary) = self.run_document(path, date)?;
            outcome.transactions.extend(doc.transactions);
            outcome.skipped_lines.extend(doc.skipped_lines);
            outcome.documents.push(summary);
        }

        info!(
            documents = outcome.documents.len(),
            transactions = outcome.transactions.len(),
            skipped_lines = outcome.skipped_lines.len(),
            "Finished processing statements"
        );
        Ok(outcome)
    }

    pub fn run_document(
        &self,
        path: &Path,
        date: StatementDate,
    ) -> Result<(DocumentOutcome, DocumentSummary)> {
        info!("Processing file: {}", path.display());
        let document = self.backend.open(path)?;
        let pages = document.page_count();
        debug!("Going through {pages} pages");

        let mut walker = DocumentWalker::new(self.classifier, path, date);
        for index in 0..pages {
            debug!("Processing page {index}");
            walker.feed_page(document.page_text(index)?)?;
        }
        let outcome = walker.finish();

        let summary = DocumentSummary {
            path: path.to_path_buf(),
            date,
            pages,
            transactions: outcome.transactions.len(),
            tally: outcome.tally,
        };
        Ok((outcome, summary))
    }
}
