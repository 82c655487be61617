//! stmtconv-core: record types, errors and ordering shared by the converter crates

pub mod error;
pub mod sort;
pub mod statement_date;
pub mod transaction;

pub use error::{ConvertError, Result};
pub use sort::{SortKey, sort_transactions};
pub use statement_date::StatementDate;
pub use transaction::Transaction;
