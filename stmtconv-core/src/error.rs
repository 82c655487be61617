//! Error taxonomy shared by every stmtconv crate.
//!
//! Every variant is fatal for a conversion run. Lines that merely fail to
//! match a transaction pattern are not errors; they are routed to the
//! skipped-lines audit log instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{} doesn't exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("could not open {} for writing: {source}", path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not open document {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("could not load page {page} of {}: {reason}", path.display())]
    PageLoad {
        path: PathBuf,
        page: usize,
        reason: String,
    },

    #[error("file name of {} does not start with an MMDDYY statement date", path.display())]
    UnrecognizedFileName { path: PathBuf },

    #[error("malformed date in line: {line:?}")]
    MalformedDate { line: String },

    #[error("malformed reference number in line: {line:?}")]
    MalformedReference { line: String },

    #[error("malformed amount in line: {line:?}")]
    MalformedAmount { line: String },

    #[error("transaction builder invoked without extracted fields")]
    NullTarget,

    #[error("invalid pattern `{name}`: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Wrap an I/O failure on an output or audit file.
    pub fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::SinkUnavailable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_input() {
        let err = ConvertError::MalformedAmount {
            line: "01/15 ABC1234567 STORE 4x.00".to_string(),
        };
        assert!(err.to_string().contains("4x.00"));

        let err = ConvertError::PageLoad {
            path: PathBuf::from("in/011524.pdf"),
            page: 3,
            reason: "truncated".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("page 3"));
        assert!(msg.contains("011524.pdf"));
    }
}
