// Forensic Tool Case-Law Viewer - Core Library
// Exposes the normalizer and reports for the CLI, the viewer, and tests

pub mod citation;
pub mod config;
pub mod corpus;
pub mod entities;
pub mod error;
pub mod mentions;
pub mod metadata;
pub mod report;

// Re-export commonly used types
pub use citation::{strip_marker, Citation, MARKER};
pub use config::{Cli, Command, Config, DataArgs};
pub use corpus::Corpus;
pub use entities::{EntityCounts, Tally};
pub use error::{CitationError, CorpusError, Result};
pub use mentions::{case_url, highlight, Fragment, MentionIndex};
pub use metadata::{
    load_metadata, normalize, parse_metadata,
    CaseRecord, CitationPolicy, NormalizeOptions, NormalizeStats, Normalized, RawCase,
    DEFAULT_MIN_YEAR,
};
pub use report::{cases_per_tool, tool_names, ToolView, TOP_COURTS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
