//! Per-line classification.
//!
//! Rules run in a fixed priority order and the first one that applies wins:
//! account suffix marker, section gate, transaction formats (new, interest
//! charge, old) with an exclusion sub-test, then the possibly-relevant
//! catch-all. Every line lands in exactly one [`LineClass`].

use std::fmt;

use crate::context::StatementContext;
use crate::patterns::Patterns;

/// Historical transaction line layouts, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineFormat {
    /// `SSSS MM/DD REFERENCE NAME AMOUNT` (leading account column)
    New,
    /// `MM/DD INTEREST CHARGE ... AMOUNT` (no reference number)
    InterestCharge,
    /// `MM/DD REFERENCE NAME AMOUNT`
    Old,
}

impl LineFormat {
    pub const PRIORITY: [LineFormat; 3] =
        [LineFormat::New, LineFormat::InterestCharge, LineFormat::Old];

    pub fn has_reference(self) -> bool {
        !matches!(self, LineFormat::InterestCharge)
    }

    /// Whether a leading account-suffix column may precede the date.
    pub fn has_account_column(self) -> bool {
        !matches!(self, LineFormat::InterestCharge)
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LineFormat::New => "new",
            LineFormat::InterestCharge => "interest",
            LineFormat::Old => "old",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Account suffix marker; carries the extracted last four
    SuffixMarker(String),
    /// Before the transaction section; `title` is set on a section-title line
    PreSection { title: bool },
    Matched(LineFormat),
    /// Transaction-shaped boilerplate (audit logged)
    Excluded(LineFormat),
    /// Looked financial but matched no format (audit logged)
    PossiblyRelevant,
    Irrelevant,
}

impl LineClass {
    pub fn label(&self) -> &'static str {
        match self {
            LineClass::SuffixMarker(_) => "suffix",
            LineClass::PreSection { title: true } => "title",
            LineClass::PreSection { title: false } => "pre-section",
            LineClass::Matched(_) => "matched",
            LineClass::Excluded(_) => "excluded",
            LineClass::PossiblyRelevant => "relevant?",
            LineClass::Irrelevant => "irrelevant",
        }
    }
}

pub struct LineClassifier {
    patterns: Patterns,
}

impl LineClassifier {
    pub fn new(patterns: Patterns) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn classify(&self, line: &str, ctx: &StatementContext) -> LineClass {
        let p = &self.patterns;

        if ctx.last_four().is_none() && p.account_suffix.is_match(line) {
            return LineClass::SuffixMarker(last_four_of(line));
        }

        if !ctx.in_section() {
            return LineClass::PreSection {
                title: p.section_title.is_match(line),
            };
        }

        for format in LineFormat::PRIORITY {
            let re = match format {
                LineFormat::New => &p.new_format,
                LineFormat::InterestCharge => &p.interest_charge,
                LineFormat::Old => &p.old_format,
            };
            if re.is_match(line) {
                if p.exclusion.is_match(line) {
                    return LineClass::Excluded(format);
                }
                return LineClass::Matched(format);
            }
        }

        if p.possibly_relevant.is_match(line) {
            LineClass::PossiblyRelevant
        } else {
            LineClass::Irrelevant
        }
    }
}

/// Four characters following the final space of the line.
fn last_four_of(line: &str) -> String {
    let trimmed = line.trim_end();
    let tail = trimmed
        .rsplit_once(char::is_whitespace)
        .map(|(_, tail)| tail)
        .unwrap_or(trimmed);
    tail.chars().take(4).collect()
}

/// Count of lines per classification for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassTally {
    pub suffix_markers: usize,
    pub pre_section: usize,
    pub matched: usize,
    pub excluded: usize,
    pub possibly_relevant: usize,
    pub irrelevant: usize,
}

impl ClassTally {
    pub fn record(&mut self, class: &LineClass) {
        match class {
            LineClass::SuffixMarker(_) => self.suffix_markers += 1,
            LineClass::PreSection { .. } => self.pre_section += 1,
            LineClass::Matched(_) => self.matched += 1,
            LineClass::Excluded(_) => self.excluded += 1,
            LineClass::PossiblyRelevant => self.possibly_relevant += 1,
            LineClass::Irrelevant => self.irrelevant += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.suffix_markers
            + self.pre_section
            + self.matched
            + self.excluded
            + self.possibly_relevant
            + self.irrelevant
    }

    pub fn merge(&mut self, other: &ClassTally) {
        self.suffix_markers += other.suffix_markers;
        self.pre_section += other.pre_section;
        self.matched += other.matched;
        self.excluded += other.excluded;
        self.possibly_relevant += other.possibly_relevant;
        self.irrelevant += other.irrelevant;
    }
}
