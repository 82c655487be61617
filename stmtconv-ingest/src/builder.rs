//! Combines extracted fields with statement context into a [`Transaction`].

use chrono::NaiveDate;
use stmtconv_core::{ConvertError, Result, Transaction};
use tracing::debug;

use crate::context::StatementContext;
use crate::extract::RawFields;

pub struct TransactionBuilder<'a> {
    ctx: &'a StatementContext,
    fields: Option<RawFields<'a>>,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(ctx: &'a StatementContext) -> Self {
        Self { ctx, fields: None }
    }

    pub fn fields(mut self, fields: RawFields<'a>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Build the record. The year comes from the statement, not the line:
    /// a December line on a January statement belongs to the prior year.
    pub fn build(self) -> Result<Transaction> {
        let fields = self.fields.ok_or(ConvertError::NullTarget)?;
        let statement = self.ctx.date();

        let year = statement.year_for_month(fields.month);
        if year != statement.year {
            debug!("January statement with December transaction, using {year}");
        }

        let date = NaiveDate::from_ymd_opt(year, fields.month, fields.day).ok_or_else(|| {
            ConvertError::MalformedDate {
                line: fields.line.to_string(),
            }
        })?;

        Ok(Transaction::new(
            date,
            fields.reference.map(str::to_string),
            fields.amount,
            fields.name,
            self.ctx.last_four().unwrap_or_default(),
        ))
    }
}
