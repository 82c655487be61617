//! stmtconv-ingest: statement text backends, line classification and field
//! extraction for Wells Fargo style statements.

pub mod backend;
pub mod batch;
pub mod builder;
pub mod classify;
pub mod context;
pub mod extract;
pub mod patterns;
pub mod scan;
pub mod walk;

pub use backend::{BackendKind, Document, MemoryBackend, TextBackend};
pub use batch::{Batch, BatchOutcome, DocumentSummary};
pub use builder::TransactionBuilder;
pub use classify::{ClassTally, LineClass, LineClassifier, LineFormat};
pub use context::{ScanPhase, StatementContext};
pub use extract::{RawFields, extract_fields, parse_amount};
pub use patterns::{PatternConfig, Patterns, REF_NUM_SIZE, TRANSACTION_SECTION_TITLE};
pub use scan::{ScanResult, scan_statements};
pub use walk::{DocumentOutcome, DocumentWalker, SkipReason, SkippedLine, walk_pages};
