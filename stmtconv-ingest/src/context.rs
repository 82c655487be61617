//! Per-document scan state, threaded by value through the walker.

use stmtconv_core::StatementDate;

use crate::classify::LineClass;

/// Where the walker is within one statement.
///
/// Phases only ever move forward inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScanPhase {
    AwaitingSuffix,
    AwaitingSection,
    InSection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementContext {
    date: StatementDate,
    last_four: Option<String>,
    section_hits: usize,
    section_gate: usize,
}

impl StatementContext {
    pub fn new(date: StatementDate, section_gate: usize) -> Self {
        Self {
            date,
            last_four: None,
            section_hits: 0,
            section_gate,
        }
    }

    pub fn date(&self) -> StatementDate {
        self.date
    }

    pub fn last_four(&self) -> Option<&str> {
        self.last_four.as_deref()
    }

    pub fn section_hits(&self) -> usize {
        self.section_hits
    }

    /// True once the section title has been seen `section_gate` times.
    pub fn in_section(&self) -> bool {
        self.section_hits >= self.section_gate
    }

    pub fn phase(&self) -> ScanPhase {
        if self.in_section() {
            ScanPhase::InSection
        } else if self.last_four.is_some() {
            ScanPhase::AwaitingSection
        } else {
            ScanPhase::AwaitingSuffix
        }
    }

    /// Context after a line with classification `class` has been consumed.
    pub fn observe(&self, class: &LineClass) -> Self {
        let mut next = self.clone();
        match class {
            LineClass::SuffixMarker(last_four) => next.last_four = Some(last_four.clone()),
            LineClass::PreSection { title: true } => next.section_hits += 1,
            _ => {}
        }
        next
    }
}
