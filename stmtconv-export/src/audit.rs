//! Append-only audit logs of what the converter chose not to parse.
//!
//! skipped_files.txt:
//!   -- SKIPPED FILES --
//!   notes.txt
//!   <blank line>
//!
//! skipped_lines.txt:
//!   -- SKIPPED LINES --
//!   1234   01/31   TOT0000000   TOTAL PURCHASES   45.67

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use stmtconv_core::{ConvertError, Result};

pub const SKIPPED_FILES_HEADER: &str = "-- SKIPPED FILES --";
pub const SKIPPED_LINES_HEADER: &str = "-- SKIPPED LINES --";

pub struct AuditLog {
    path: PathBuf,
    out: BufWriter<File>,
    /// Write an empty line when the log is closed
    blank_line_at_end: bool,
}

impl AuditLog {
    /// Create (truncate) the log and write its header. Fails with
    /// `SinkUnavailable` if the file cannot be opened.
    pub fn create(path: &Path, header: &str) -> Result<Self> {
        let file = File::create(path).map_err(|e| ConvertError::sink(path, e))?;
        let mut log = Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            blank_line_at_end: false,
        };
        log.append(header)?;
        Ok(log)
    }

    pub fn skipped_files(path: &Path) -> Result<Self> {
        let mut log = Self::create(path, SKIPPED_FILES_HEADER)?;
        log.blank_line_at_end = true;
        Ok(log)
    }

    pub fn skipped_lines(path: &Path) -> Result<Self> {
        Self::create(path, SKIPPED_LINES_HEADER)
    }

    pub fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").map_err(|e| ConvertError::sink(&self.path, e))
    }

    pub fn extend<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.append(line.as_ref())?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        if self.blank_line_at_end {
            writeln!(self.out).map_err(|e| ConvertError::sink(&self.path, e))?;
        }
        self.out.flush().map_err(|e| ConvertError::sink(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_skipped_files_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped_files.txt");
        let mut log = AuditLog::skipped_files(&path).unwrap();
        log.extend(["notes.txt", "scan.png"]).unwrap();
        log.finish().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "-- SKIPPED FILES --\nnotes.txt\nscan.png\n\n"
        );
    }

    #[test]
    fn test_skipped_lines_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped_lines.txt");
        let mut log = AuditLog::skipped_lines(&path).unwrap();
        log.append("01/11 MYSTERY CREDIT 3.00").unwrap();
        log.finish().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "-- SKIPPED LINES --\n01/11 MYSTERY CREDIT 3.00\n"
        );
    }

    #[test]
    fn test_unwritable_location_is_sink_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("skipped_lines.txt");
        let err = AuditLog::skipped_lines(&path).err().unwrap();
        assert!(matches!(err, ConvertError::SinkUnavailable { .. }));
    }
}
