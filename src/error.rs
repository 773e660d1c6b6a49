// Error taxonomy for corpus loading and normalization

use std::path::PathBuf;
use thiserror::Error;

/// Why a citation string could not be split into court and year
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    #[error("citation has no year segment: {citation:?}")]
    MissingYear { citation: String },

    #[error("citation year {segment:?} is not a number: {citation:?}")]
    InvalidYear { citation: String, segment: String },
}

impl CitationError {
    /// The raw citation that failed to parse
    pub fn citation(&self) -> &str {
        match self {
            CitationError::MissingYear { citation } => citation,
            CitationError::InvalidYear { citation, .. } => citation,
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed citation for tool {tool:?}, case {casename:?}: {source}")]
    Citation {
        tool: String,
        casename: String,
        #[source]
        source: CitationError,
    },

    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
