//! stmtconv-export: transaction CSV output and the skipped-files / skipped-lines audit logs

pub mod audit;
pub mod outputs;
pub mod transactions_csv;

pub use audit::{AuditLog, SKIPPED_FILES_HEADER, SKIPPED_LINES_HEADER};
pub use outputs::{OutputNames, OutputPaths, OutputSinks};
pub use transactions_csv::{NONE_SENTINEL, read_transactions, write_transactions_to};
