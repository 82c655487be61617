//! The three files a conversion run leaves behind.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stmtconv_core::{ConvertError, Result, SortKey, sort_transactions};
use stmtconv_ingest::BatchOutcome;
use tracing::info;

use crate::audit::AuditLog;
use crate::transactions_csv::write_transactions_to;

/// File names inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub transactions: String,
    pub skipped_files: String,
    pub skipped_lines: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            transactions: "transactions.csv".to_string(),
            skipped_files: "skipped_files.txt".to_string(),
            skipped_lines: "skipped_lines.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub transactions: PathBuf,
    pub skipped_files: PathBuf,
    pub skipped_lines: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path, names: &OutputNames) -> Self {
        Self {
            transactions: dir.join(&names.transactions),
            skipped_files: dir.join(&names.skipped_files),
            skipped_lines: dir.join(&names.skipped_lines),
        }
    }
}

/// All three output files, opened before any statement is read so an
/// unwritable output location fails the run up front.
pub struct OutputSinks {
    paths: OutputPaths,
    transactions: BufWriter<File>,
    skipped_files: AuditLog,
    skipped_lines: AuditLog,
}

impl OutputSinks {
    pub fn open(dir: &Path, names: &OutputNames) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| ConvertError::sink(dir, e))?;
        let paths = OutputPaths::in_dir(dir, names);
        let transactions = File::create(&paths.transactions)
            .map_err(|e| ConvertError::sink(&paths.transactions, e))?;
        Ok(Self {
            transactions: BufWriter::new(transactions),
            skipped_files: AuditLog::skipped_files(&paths.skipped_files)?,
            skipped_lines: AuditLog::skipped_lines(&paths.skipped_lines)?,
            paths,
        })
    }

    /// Sort the records and write all three files.
    pub fn write(self, outcome: &mut BatchOutcome, sort: SortKey) -> Result<OutputPaths> {
        let Self {
            paths,
            transactions,
            mut skipped_files,
            mut skipped_lines,
        } = self;

        skipped_files.extend(&outcome.skipped_files)?;
        skipped_files.finish()?;

        skipped_lines.extend(outcome.skipped_lines.iter().map(|s| s.line.as_str()))?;
        skipped_lines.finish()?;

        info!("Sorting transactions by {sort:?}");
        sort_transactions(&mut outcome.transactions, sort);
        info!(
            "Writing {} transactions to {}",
            outcome.transactions.len(),
            paths.transactions.display()
        );
        write_transactions_to(transactions, &outcome.transactions)?;

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_dir() {
        let paths = OutputPaths::in_dir(Path::new("output"), &OutputNames::default());
        assert_eq!(paths.transactions, Path::new("output/transactions.csv"));
        assert_eq!(paths.skipped_files, Path::new("output/skipped_files.txt"));
        assert_eq!(paths.skipped_lines, Path::new("output/skipped_lines.txt"));
    }

    #[test]
    fn test_open_creates_directory_and_headers() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("output");
        let sinks = OutputSinks::open(&out_dir, &OutputNames::default()).unwrap();
        let paths = sinks.write(&mut BatchOutcome::default(), SortKey::Date).unwrap();

        assert_eq!(fs::read_to_string(&paths.transactions).unwrap(), "None");
        assert_eq!(fs::read_to_string(&paths.skipped_files).unwrap(), "-- SKIPPED FILES --\n\n");
        assert_eq!(fs::read_to_string(&paths.skipped_lines).unwrap(), "-- SKIPPED LINES --\n");
    }

    #[test]
    fn test_unwritable_transactions_file_fails_at_open() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the CSV should go
        fs::create_dir(dir.path().join("transactions.csv")).unwrap();

        let err = OutputSinks::open(dir.path(), &OutputNames::default()).err().unwrap();
        assert!(matches!(err, ConvertError::SinkUnavailable { .. }));
        assert!(!dir.path().join("skipped_files.txt").exists());
        assert!(!dir.path().join("skipped_lines.txt").exists());
    }
}
