//! Adapter for the TriviaQA reading-comprehension corpus.
//!
//! The [`TriviaQa`] builder declares the record schema, resolves the
//! train/dev/test file sets of an extracted `triviaqa-rc` archive and turns
//! each raw question file into a lazy sequence of [`TriviaQaRecord`]s. A
//! harness drives those three steps; [`harness`] holds the reference one
//! used by the `triviaqa` binary.

pub mod builder;
pub mod download;
pub mod error;
pub mod harness;
pub mod records;
pub mod schema;
pub mod splits;

pub use builder::{builder, DatasetBuilder, TriviaQa};
pub use download::{DownloadManager, ExtractedDir};
pub use error::{CorpusError, Result};
pub use records::{generate_examples, Answer, EntityPage, Examples, TriviaQaRecord};
pub use schema::{dataset_info, DatasetInfo, Feature, FeatureMismatch};
pub use splits::{resolve_splits, split_files, Split, SplitGenerator};
