//! Normalized transaction record produced from a statement line.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One financial movement read off a statement.
///
/// Records are immutable once built: fields are only reachable through
/// accessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    date: NaiveDate,
    /// `None` only for interest-charge lines, which print no reference number
    reference: Option<String>,
    /// Positive = charge, negative = payment/credit
    amount: Decimal,
    name: String,
    /// Last four digits of the account number
    last_four: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        reference: Option<String>,
        amount: Decimal,
        name: impl Into<String>,
        last_four: impl Into<String>,
    ) -> Self {
        Self {
            date,
            reference,
            amount,
            name: name.into().trim().to_string(),
            last_four: last_four.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_four(&self) -> &str {
        &self.last_four
    }

    /// True for interest-charge records (no reference number).
    pub fn is_interest_charge(&self) -> bool {
        self.reference.is_none()
    }

    /// Returns true for payments and refunds (negative amount)
    pub fn is_credit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}
