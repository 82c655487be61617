//! Line grammars used by the classifier.
//!
//! These are tuned against real statements and are meant to be overridden
//! from the `[patterns]` table of the config file when a new statement
//! vintage drifts. `{ref}` inside a pattern is a repetition count equal to
//! `ref_num_size`, e.g. `[A-Za-z0-9]{ref}`.
//!
//! Expected statement text after extraction:
//!   Account ending in 5678
//!   Transaction Details
//!     1234   01/15   ABC1234567   Grocery Store            45.67     (new format)
//!            01/15   ABC1234567   Grocery Store            45.67     (old format)
//!            01/31   INTEREST CHARGE ON PURCHASES             12.34  (interest charge)

use regex::Regex;
use serde::{Deserialize, Serialize};
use stmtconv_core::{ConvertError, Result};

/// Width of the reference number printed after the transaction date.
pub const REF_NUM_SIZE: usize = 10;

/// Header printed above the transaction listing (and once in the summary).
pub const TRANSACTION_SECTION_TITLE: &str = "Transaction Details";

const DATE: &str = r"\d{2}/\d{2}(?:/\d{2})?(?:\s+\d{2}/\d{2}(?:/\d{2})?)?";
const AMOUNT: &str = r"-?[\d,]*\d\.\d{2}";

/// Raw, uncompiled pattern set as it appears in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// File names that are statements (matched against the bare file name)
    pub statement_file: String,
    /// Line carrying the last four digits of the account number
    pub account_suffix: String,
    pub section_title: String,
    /// Occurrences of `section_title` to pass before lines can be transactions
    pub section_gate: usize,
    pub new_format: String,
    pub interest_charge: String,
    pub old_format: String,
    /// Boilerplate that has the shape of a transaction (running totals etc.)
    pub exclusion: String,
    /// Lines worth a human look when nothing else matched
    pub possibly_relevant: String,
    pub ref_num_size: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            statement_file: r"(?i)^\d{6}.*\.pdf$".to_string(),
            account_suffix: r"(?i)account\s+(?:number\s+)?ending\s+in\s+\d{4}\s*$".to_string(),
            section_title: regex::escape(TRANSACTION_SECTION_TITLE),
            section_gate: 1,
            new_format: format!(r"\s*\d{{4}}\s+{DATE}\s+[A-Za-z0-9]{{ref}}(?:\s+.*?)?\s+{AMOUNT}\s*"),
            interest_charge: format!(r"\s*{DATE}\s+(?i:interest\s+charge).*?\s+{AMOUNT}\s*"),
            old_format: format!(r"\s*{DATE}\s+[A-Za-z0-9]{{ref}}(?:\s+.*?)?\s+{AMOUNT}\s*"),
            exclusion: r"(?i)\b(?:total|subtotal|balance)\b".to_string(),
            possibly_relevant: r"\d{2}/\d{2}.*\d\.\d{2}|^\s*\d{4}\s+\d{2}/\d{2}".to_string(),
            ref_num_size: REF_NUM_SIZE,
        }
    }
}

/// Compiled pattern set.
///
/// The three transaction patterns are anchored at compile time so that they
/// only ever match a whole line; the rest are searched anywhere in the line.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub statement_file: Regex,
    pub account_suffix: Regex,
    pub section_title: Regex,
    pub new_format: Regex,
    pub interest_charge: Regex,
    pub old_format: Regex,
    pub exclusion: Regex,
    pub possibly_relevant: Regex,
    pub ref_num_size: usize,
    pub section_gate: usize,
}

impl PatternConfig {
    pub fn compile(&self) -> Result<Patterns> {
        let width = format!("{{{}}}", self.ref_num_size);
        let search = |name: &'static str, pat: &str| {
            Regex::new(&pat.replace("{ref}", &width))
                .map_err(|source| ConvertError::InvalidPattern { name, source })
        };
        let full = |name: &'static str, pat: &str| {
            Regex::new(&format!("^(?:{})$", pat.replace("{ref}", &width)))
                .map_err(|source| ConvertError::InvalidPattern { name, source })
        };

        Ok(Patterns {
            statement_file: search("statement_file", &self.statement_file)?,
            account_suffix: search("account_suffix", &self.account_suffix)?,
            section_title: search("section_title", &self.section_title)?,
            new_format: full("new_format", &self.new_format)?,
            interest_charge: full("interest_charge", &self.interest_charge)?,
            old_format: full("old_format", &self.old_format)?,
            exclusion: search("exclusion", &self.exclusion)?,
            possibly_relevant: search("possibly_relevant", &self.possibly_relevant)?,
            ref_num_size: self.ref_num_size,
            section_gate: self.section_gate,
        })
    }
}

impl Patterns {
    pub fn is_statement_file(&self, file_name: &str) -> bool {
        self.statement_file.is_match(file_name)
    }
}
