//! Walks the lines of one statement, page after page, as a single stream.

use std::path::{Path, PathBuf};

use stmtconv_core::{Result, StatementDate, Transaction};
use tracing::{debug, trace};

use crate::builder::TransactionBuilder;
use crate::classify::{ClassTally, LineClass, LineClassifier, LineFormat};
use crate::context::{ScanPhase, StatementContext};
use crate::extract::extract_fields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Excluded(LineFormat),
    PossiblyRelevant,
}

/// A line kept out of the transaction list but worth an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub document: PathBuf,
    /// Trimmed line text
    pub line: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped_lines: Vec<SkippedLine>,
    pub tally: ClassTally,
}

/// State machine for one document. Create one per statement, feed it every
/// page in order and call [`DocumentWalker::finish`].
pub struct DocumentWalker<'c> {
    classifier: &'c LineClassifier,
    path: PathBuf,
    ctx: StatementContext,
    outcome: DocumentOutcome,
}

impl<'c> DocumentWalker<'c> {
    pub fn new(classifier: &'c LineClassifier, path: &Path, date: StatementDate) -> Self {
        let gate = classifier.patterns().section_gate;
        Self {
            classifier,
            path: path.to_path_buf(),
            ctx: StatementContext::new(date, gate),
            outcome: DocumentOutcome::default(),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.ctx.phase()
    }

    /// Consume one line and return how it was classified.
    pub fn feed_line(&mut self, line: &str) -> Result<LineClass> {
        let class = self.classifier.classify(line, &self.ctx);
        trace!("[{}] {line}", class.label());

        match &class {
            LineClass::SuffixMarker(last_four) => {
                debug!("Extracted last four value: {last_four}");
            }
            LineClass::PreSection { title: true } => {
                debug!("Found transaction section title ({} so far)", self.ctx.section_hits() + 1);
            }
            LineClass::Matched(format) => {
                let ref_num_size = self.classifier.patterns().ref_num_size;
                let fields = extract_fields(line, *format, ref_num_size)?;
                let txn = TransactionBuilder::new(&self.ctx).fields(fields).build()?;
                debug!(?txn, "Line matched {format} format");
                self.outcome.transactions.push(txn);
            }
            LineClass::Excluded(format) => {
                debug!("Line matched {format} format but is excluded, skipping");
                self.skip(line, SkipReason::Excluded(*format));
            }
            LineClass::PossiblyRelevant => {
                debug!("Line didn't match but is possibly relevant, skipping");
                self.skip(line, SkipReason::PossiblyRelevant);
            }
            LineClass::PreSection { title: false } | LineClass::Irrelevant => {}
        }

        self.outcome.tally.record(&class);
        self.ctx = self.ctx.observe(&class);
        Ok(class)
    }

    pub fn feed_page(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            self.feed_line(line)?;
        }
        Ok(())
    }

    pub fn finish(self) -> DocumentOutcome {
        debug!(
            path = %self.path.display(),
            transactions = self.outcome.transactions.len(),
            skipped = self.outcome.skipped_lines.len(),
            "Finished document"
        );
        self.outcome
    }

    fn skip(&mut self, line: &str, reason: SkipReason) {
        self.outcome.skipped_lines.push(SkippedLine {
            document: self.path.clone(),
            line: line.trim().to_string(),
            reason,
        });
    }
}

/// Walk an already-materialized list of page texts.
pub fn walk_pages<S: AsRef<str>>(
    classifier: &LineClassifier,
    path: &Path,
    date: StatementDate,
    pages: &[S],
) -> Result<DocumentOutcome> {
    let mut walker = DocumentWalker::new(classifier, path, date);
    for page in pages {
        walker.feed_page(page.as_ref())?;
    }
    Ok(walker.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternConfig;
    use chrono::NaiveDate;
    use stmtconv_core::ConvertError;

    fn classifier() -> LineClassifier {
        LineClassifier::new(PatternConfig::default().compile().unwrap())
    }

    const PAGE_1: &str = "\
WELLS FARGO
Account ending in 5678
Transaction Details
  1234   12/28   ABC1234567   HOLIDAY MARKET           45.67
";

    const PAGE_2: &str = "\
Page 2 of 2
  1234   01/03   DEF7654321   ONLINE PAYMENT        -1,200.00
  1234   01/10   TOT0000000   TOTAL PURCHASES          45.67
  01/11 MYSTERY CREDIT 3.00
   01/12   INTEREST CHARGE ON PURCHASES        12.34
";

    #[test]
    fn test_state_persists_across_pages() {
        let c = classifier();
        let date = StatementDate { month: 1, day: 15, year: 2024 };
        let out = walk_pages(&c, Path::new("in/011524.pdf"), date, &[PAGE_1, PAGE_2]).unwrap();

        assert_eq!(out.transactions.len(), 3);
        let first = &out.transactions[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2023, 12, 28).unwrap());
        assert_eq!(first.last_four(), "5678");

        let second = &out.transactions[1];
        assert_eq!(second.date(), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(second.name(), "ONLINE PAYMENT");
        assert!(second.is_credit());

        let interest = &out.transactions[2];
        assert!(interest.is_interest_charge());
        assert_eq!(interest.last_four(), "5678");

        assert_eq!(out.skipped_lines.len(), 2);
        assert_eq!(out.skipped_lines[0].reason, SkipReason::Excluded(LineFormat::New));
        assert_eq!(
            out.skipped_lines[0].line,
            "1234   01/10   TOT0000000   TOTAL PURCHASES          45.67"
        );
        assert_eq!(out.skipped_lines[1].reason, SkipReason::PossiblyRelevant);
        assert_eq!(out.skipped_lines[1].line, "01/11 MYSTERY CREDIT 3.00");

        let total_lines = PAGE_1.lines().count() + PAGE_2.lines().count();
        assert_eq!(out.tally.total(), total_lines);
    }

    #[test]
    fn test_phase_never_goes_back() {
        let c = classifier();
        let date = StatementDate { month: 3, day: 1, year: 2024 };
        let mut walker = DocumentWalker::new(&c, Path::new("030124.pdf"), date);
        let mut last = walker.phase();
        for line in PAGE_1.lines().chain(PAGE_2.lines()) {
            walker.feed_line(line).unwrap();
            assert!(walker.phase() >= last);
            last = walker.phase();
        }
        assert_eq!(last, ScanPhase::InSection);
    }

    #[test]
    fn test_nothing_parsed_without_section_title() {
        let c = classifier();
        let date = StatementDate { month: 3, day: 1, year: 2024 };
        let out = walk_pages(&c, Path::new("030124.pdf"), date, &[PAGE_2]).unwrap();
        assert!(out.transactions.is_empty());
        assert!(out.skipped_lines.is_empty());
        assert_eq!(out.tally.pre_section, PAGE_2.lines().count());
    }

    #[test]
    fn test_bad_matched_line_aborts_document() {
        // 02/31 has the right shape but is not a calendar day
        let c = classifier();
        let date = StatementDate { month: 3, day: 1, year: 2024 };
        let page = "Transaction Details\n   02/31   ABC1234567   X   1.00\n";
        let err = walk_pages(&c, Path::new("030124.pdf"), date, &[page]).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedDate { .. }));
    }
}
