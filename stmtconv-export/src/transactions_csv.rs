//! Tabular transaction file.
//!
//! One row per record, no header:
//!   date,reference,amount,name,last_four
//!   2024-01-15,ABC1234567,45.67,Grocery Store,5678
//!
//! A run that produced no records writes the single token `None`, so an empty
//! conversion can be told apart from a missing file.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stmtconv_core::{ConvertError, Result, Transaction};
use tracing::debug;

pub const NONE_SENTINEL: &str = "None";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct CsvOutRow<'a> {
    date: String,
    reference: &'a str,
    amount: String,
    name: &'a str,
    last_four: &'a str,
}

#[derive(Deserialize)]
struct CsvRow {
    date: String,
    reference: String,
    amount: String,
    name: String,
    last_four: String,
}

pub fn write_transactions_to<W: Write>(mut w: W, txns: &[Transaction]) -> Result<()> {
    if txns.is_empty() {
        debug!("No transactions, writing {NONE_SENTINEL}");
        w.write_all(NONE_SENTINEL.as_bytes())?;
        w.flush()?;
        return Ok(());
    }

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(w);
    for t in txns {
        wtr.serialize(CsvOutRow {
            date: t.date().format(DATE_FORMAT).to_string(),
            reference: t.reference().unwrap_or(""),
            amount: format!("{:.2}", t.amount()),
            name: t.name(),
            last_four: t.last_four(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a transaction file back. The `None` sentinel reads as no records.
pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let content = std::fs::read_to_string(path)?;
    read_transactions_from(&content)
}

pub fn read_transactions_from(content: &str) -> Result<Vec<Transaction>> {
    if content.trim() == NONE_SENTINEL {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content.as_bytes());

    let mut out = Vec::new();
    for rec in rdr.deserialize::<CsvRow>() {
        let row = rec?;
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
            .map_err(|_| ConvertError::MalformedDate { line: row.date.clone() })?;
        let amount = Decimal::from_str(&row.amount.replace(',', ""))
            .map_err(|_| ConvertError::MalformedAmount { line: row.amount.clone() })?;
        let reference = Some(row.reference).filter(|r| !r.is_empty());
        out.push(Transaction::new(date, reference, amount, row.name, row.last_four));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(reference: Option<&str>, amount: Decimal, name: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            reference.map(str::to_string),
            amount,
            name,
            "5678",
        )
    }

    #[test]
    fn test_rows_have_fixed_column_order() {
        let mut out = Vec::new();
        let rows = [txn(Some("ABC1234567"), Decimal::new(4567, 2), "Grocery Store")];
        write_transactions_to(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2024-01-15,ABC1234567,45.67,Grocery Store,5678\n"
        );
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let mut out = Vec::new();
        write_transactions_to(&mut out, &[txn(None, Decimal::new(-5, 1), "FEE, LATE")]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2024-01-15,,-0.50,\"FEE, LATE\",5678\n");
    }

    #[test]
    fn test_empty_set_writes_sentinel_only() {
        let mut out = Vec::new();
        write_transactions_to(&mut out, &[]).unwrap();
        assert_eq!(out, b"None");
        assert!(read_transactions_from("None").unwrap().is_empty());
    }

    #[test]
    fn test_read_back_keeps_interest_charge_reference_empty() {
        let rows =
            read_transactions_from("2024-01-31,,12.34,INTEREST CHARGE ON PURCHASES,5678\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_interest_charge());
        assert_eq!(rows[0].amount(), Decimal::new(1234, 2));
    }
}
