use std::path::PathBuf;

use thiserror::Error;

use crate::schema::FeatureMismatch;

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("extracted corpus for {url} missing at {}", .root.display())]
    MissingRoot { root: PathBuf, url: String },
    #[error("invalid file pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("listing corpus files: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {} as JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} is not a TriviaQA question file: {reason}", .path.display())]
    Layout { path: PathBuf, reason: &'static str },
    #[error("article {index} in {}: {source}", .path.display())]
    Schema {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {question_id} does not match declared features: {mismatch}")]
    Validation {
        question_id: String,
        mismatch: FeatureMismatch,
    },
    #[error("serialising record {question_id}: {source}")]
    Serialize {
        question_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CorpusError {
    /// True for errors caused by the shape of the input rather than I/O.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::Layout { .. } | Self::Schema { .. })
    }
}
