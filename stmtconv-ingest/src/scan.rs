//! Finds candidate statements in the input directory.

use std::path::{Path, PathBuf};

use stmtconv_core::{ConvertError, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::patterns::Patterns;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Statements to convert, in file-name order
    pub statements: Vec<PathBuf>,
    /// Names of entries that are not statements
    pub skipped_files: Vec<String>,
}

/// List the immediate entries of `root`. Entries are visited in file-name
/// order so repeated runs see the same sequence.
pub fn scan_statements(root: &Path, patterns: &Patterns) -> Result<ScanResult> {
    if !root.exists() {
        return Err(ConvertError::InputNotFound {
            path: root.to_path_buf(),
        });
    }

    info!("Gathering statement files from {}", root.display());
    let mut out = ScanResult::default();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let file_name = entry.file_name().to_string_lossy().to_string();

        if entry.file_type().is_file() && patterns.is_statement_file(&file_name) {
            debug!("File {file_name} matched the statement pattern");
            out.statements.push(entry.into_path());
        } else {
            debug!("File {file_name} didn't match the statement pattern, skipping");
            out.skipped_files.push(file_name);
        }
    }

    Ok(out)
}
