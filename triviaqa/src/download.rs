use std::path::PathBuf;

use tracing::debug;

use crate::error::{CorpusError, Result};

/// Turns a source URL into a local directory holding the extracted archive.
///
/// Fetching and unpacking belong to the harness; the adapter only needs
/// the resulting path.
pub trait DownloadManager {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf>;
}

/// An archive that has already been downloaded and unpacked.
#[derive(Debug, Clone)]
pub struct ExtractedDir {
    root: PathBuf,
}

impl ExtractedDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DownloadManager for ExtractedDir {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(CorpusError::MissingRoot {
                root: self.root.clone(),
                url: url.to_string(),
            });
        }
        debug!(url, root = %self.root.display(), "Using extracted corpus");
        Ok(self.root.clone())
    }
}
