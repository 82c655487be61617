//! Ordering of the master transaction list before it is written out.

use serde::{Deserialize, Serialize};

use crate::Transaction;

/// Primary ordering key. Ties keep statement order, so repeated runs over the
/// same input always produce the same file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Name,
    /// Keep document-then-line order
    None,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "name" => Ok(SortKey::Name),
            "none" => Ok(SortKey::None),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Sort in place. The sort is stable.
pub fn sort_transactions(txns: &mut [Transaction], key: SortKey) {
    match key {
        SortKey::Date => txns.sort_by_key(|t| t.date()),
        SortKey::Amount => txns.sort_by_key(|t| t.amount()),
        SortKey::Name => txns.sort_by(|a, b| a.name().cmp(b.name())),
        SortKey::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn txn(day: u32, cents: i64, name: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            Some(format!("REF{day:07}")),
            Decimal::new(cents, 2),
            name,
            "5678",
        )
    }

    #[test]
    fn test_sort_by_date_is_stable() {
        let mut txns = vec![txn(9, 100, "B"), txn(2, 500, "A"), txn(9, 50, "C")];
        sort_transactions(&mut txns, SortKey::Date);
        let names: Vec<_> = txns.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_by_amount_and_none() {
        let mut txns = vec![txn(1, 100, "B"), txn(2, -500, "A"), txn(3, 50, "C")];
        sort_transactions(&mut txns, SortKey::None);
        assert_eq!(txns[0].name(), "B");

        sort_transactions(&mut txns, SortKey::Amount);
        let names: Vec<_> = txns.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("Date".parse::<SortKey>().unwrap(), SortKey::Date);
        assert_eq!("none".parse::<SortKey>().unwrap(), SortKey::None);
        assert!("size".parse::<SortKey>().is_err());
    }
}
