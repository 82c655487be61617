//! Positional field extraction for lines already classified as transactions.
//!
//! The line is consumed left to right by a small cursor: optional account
//! column, date run, reference number, then the amount is taken off the end
//! and whatever is left is the name.

use std::str::FromStr;

use rust_decimal::Decimal;
use stmtconv_core::{ConvertError, Result};

use crate::classify::LineFormat;

/// Fields sliced out of one transaction line, borrowed from the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub line: &'a str,
    pub month: u32,
    pub day: u32,
    pub reference: Option<&'a str>,
    pub amount: Decimal,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Consume everything before `delim`; the cursor is left on `delim`.
    fn take_until(&mut self, delim: char) -> Option<&'a str> {
        let idx = self.rest.find(delim)?;
        let (head, tail) = self.rest.split_at(idx);
        self.rest = tail;
        Some(head)
    }

    /// Consume exactly `n` characters.
    fn take_fixed(&mut self, n: usize) -> Option<&'a str> {
        let end = match self.rest.char_indices().nth(n) {
            Some((idx, _)) => idx,
            None if self.rest.chars().count() == n => self.rest.len(),
            None => return None,
        };
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(tail) => {
                self.rest = tail;
                true
            }
            None => false,
        }
    }

    fn take_digits(&mut self, n: usize) -> Option<&'a str> {
        let mut probe = *self;
        let s = probe.take_fixed(n)?;
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *self = probe;
        Some(s)
    }

    /// `/YY`, if it is next.
    fn skip_year(&mut self) {
        let mut probe = *self;
        if probe.eat('/') && probe.take_digits(2).is_some() {
            *self = probe;
        }
    }

    /// A second `MM/DD[/YY]` token (posting date), if it is next.
    fn skip_posting_date(&mut self) {
        let mut probe = *self;
        probe.skip_ws();
        if probe.take_digits(2).is_some() && probe.eat('/') && probe.take_digits(2).is_some() {
            probe.skip_year();
            *self = probe;
        }
    }

    /// Leading four-digit account column followed by whitespace.
    fn skip_account_column(&mut self) {
        let mut probe = *self;
        probe.skip_ws();
        if probe.take_digits(4).is_some() && probe.rest.starts_with(char::is_whitespace) {
            *self = probe;
        }
    }
}

/// Slice date, reference, amount and name out of a matched transaction line.
pub fn extract_fields(
    line: &str,
    format: LineFormat,
    ref_num_size: usize,
) -> Result<RawFields<'_>> {
    let malformed_date = || ConvertError::MalformedDate { line: line.to_string() };
    let mut cur = Cursor::new(line);

    if format.has_account_column() {
        cur.skip_account_column();
    }

    // Date: two digits either side of the first '/'
    let before = cur.take_until('/').ok_or_else(malformed_date)?;
    let month = before
        .len()
        .checked_sub(2)
        .and_then(|start| before.get(start..))
        .filter(|m| m.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(malformed_date)?;
    cur.eat('/');
    let day = cur.take_digits(2).ok_or_else(malformed_date)?;
    // The printed year and posting date are never authoritative
    cur.skip_year();
    cur.skip_posting_date();

    let month: u32 = month.parse().map_err(|_| malformed_date())?;
    let day: u32 = day.parse().map_err(|_| malformed_date())?;

    let reference = if format.has_reference() {
        cur.skip_ws();
        let r = cur
            .take_fixed(ref_num_size)
            .ok_or_else(|| ConvertError::MalformedReference { line: line.to_string() })?;
        Some(r)
    } else {
        None
    };

    let rest = cur.rest.trim();
    let (name, amount_token) = match rest.rsplit_once(char::is_whitespace) {
        Some((name, amount)) => (name.trim(), amount),
        None => ("", rest),
    };

    Ok(RawFields {
        line,
        month,
        day,
        reference,
        amount: parse_amount(amount_token)
            .ok_or_else(|| ConvertError::MalformedAmount { line: line.to_string() })?,
        name,
    })
}

/// Parse a printed amount, dropping thousands separators.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned = token.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
