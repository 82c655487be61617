//! Text extraction backends: turn a statement file into per-page text.
//!
//! Pages are separated by form feeds in the output of both PDF tools, so the
//! split happens here and the walker only ever sees page text.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use stmtconv_core::{ConvertError, Result};
use tracing::debug;

const FORM_FEED: char = '\u{000C}';

/// One opened statement.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Text of page `index` (0-based).
    fn page_text(&self, index: usize) -> Result<&str>;
}

pub trait TextBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>>;
}

/// Pages held in memory. `None` marks a page that could not be materialized.
#[derive(Debug, Clone)]
pub struct PagedText {
    path: PathBuf,
    pages: Vec<Option<String>>,
}

impl PagedText {
    pub fn from_text(path: &Path, text: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            pages: split_pages(text).into_iter().map(Some).collect(),
        }
    }
}

impl Document for PagedText {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<&str> {
        match self.pages.get(index) {
            Some(Some(text)) => Ok(text.as_str()),
            Some(None) => Err(ConvertError::PageLoad {
                path: self.path.clone(),
                page: index,
                reason: "page text unavailable".to_string(),
            }),
            None => Err(ConvertError::PageLoad {
                path: self.path.clone(),
                page: index,
                reason: format!("document has {} pages", self.pages.len()),
            }),
        }
    }
}

/// Split extractor output into pages. A trailing form feed does not start a
/// new page.
pub fn split_pages(text: &str) -> Vec<String> {
    let text = text.strip_suffix(FORM_FEED).unwrap_or(text);
    text.split(FORM_FEED).map(str::to_string).collect()
}

/// Which PDF text extractor to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// poppler's `pdftotext -layout`; keeps column alignment
    #[default]
    Pdftotext,
    /// The pure-Rust `pdf-extract` crate
    PdfExtract,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pdftotext" => Ok(BackendKind::Pdftotext),
            "pdf-extract" => Ok(BackendKind::PdfExtract),
            other => Err(format!("unknown backend: {other} (available: pdftotext, pdf-extract)")),
        }
    }
}

impl BackendKind {
    pub fn create(self, pdftotext_command: &str) -> Box<dyn TextBackend> {
        match self {
            BackendKind::Pdftotext => Box::new(PdftotextBackend::new(pdftotext_command)),
            BackendKind::PdfExtract => Box::new(PdfExtractBackend),
        }
    }
}

/// Shells out to `pdftotext -layout <file> -`.
#[derive(Debug, Clone)]
pub struct PdftotextBackend {
    command: String,
}

impl PdftotextBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into() }
    }
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl TextBackend for PdftotextBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>> {
        let open_err = |reason: String| ConvertError::DocumentOpen {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.command)
            .arg("-layout")
            .arg(path)
            .arg("-")
            .output()
            .map_err(|e| open_err(format!("running {}: {e}", self.command)))?;

        if !output.status.success() {
            return Err(open_err(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        debug!("Extracted {} bytes of text from {}", text.len(), path.display());
        Ok(Box::new(PagedText::from_text(path, &text)))
    }
}

/// In-process extraction with the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractBackend;

impl TextBackend for PdfExtractBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>> {
        let text = pdf_extract::extract_text(path).map_err(|e| ConvertError::DocumentOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!("Extracted {} bytes of text from {}", text.len(), path.display());
        Ok(Box::new(PagedText::from_text(path, &text)))
    }
}

/// Documents registered up front; used for already-extracted text and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: HashMap<PathBuf, PagedText>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document whose pages are separated by form feeds.
    pub fn insert_text(&mut self, path: impl Into<PathBuf>, text: &str) {
        let path = path.into();
        let doc = PagedText::from_text(&path, text);
        self.documents.insert(path, doc);
    }

    /// Make page `index` of an already registered document fail to load.
    pub fn break_page(&mut self, path: &Path, index: usize) {
        if let Some(slot) = self
            .documents
            .get_mut(path)
            .and_then(|doc| doc.pages.get_mut(index))
        {
            *slot = None;
        }
    }
}

impl TextBackend for MemoryBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>> {
        let doc = self
            .documents
            .get(path)
            .ok_or_else(|| ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                reason: "no such document".to_string(),
            })?;
        Ok(Box::new(doc.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        assert_eq!(split_pages("a\nb\u{000C}c\u{000C}"), vec!["a\nb", "c"]);
        assert_eq!(split_pages("only"), vec!["only"]);
        assert_eq!(split_pages(""), vec![""]);
    }

    #[test]
    fn test_memory_backend_pages_and_failures() {
        let mut backend = MemoryBackend::new();
        backend.insert_text("in/011524.pdf", "page one\u{000C}page two");
        backend.break_page(Path::new("in/011524.pdf"), 1);

        let doc = backend.open(Path::new("in/011524.pdf")).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_text(0).unwrap(), "page one");
        assert!(matches!(doc.page_text(1), Err(ConvertError::PageLoad { page: 1, .. })));
        assert!(matches!(doc.page_text(2), Err(ConvertError::PageLoad { page: 2, .. })));

        assert!(matches!(
            backend.open(Path::new("in/missing.pdf")),
            Err(ConvertError::DocumentOpen { .. })
        ));
    }

    #[test]
    fn test_missing_pdftotext_binary_is_open_error() {
        let backend = PdftotextBackend::new("stmtconv-no-such-pdftotext");
        let err = backend.open(Path::new("in/011524.pdf")).err().unwrap();
        assert!(matches!(err, ConvertError::DocumentOpen { .. }));
    }

    #[test]
    fn test_backend_kind_from_str() {
        assert_eq!("pdf-extract".parse::<BackendKind>().unwrap(), BackendKind::PdfExtract);
        assert!("poppler".parse::<BackendKind>().is_err());
    }
}
