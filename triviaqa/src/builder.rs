use std::path::Path;

use common::utils::config::AppConfig;
use serde::Serialize;
use tracing::info;

use crate::{
    download::DownloadManager,
    error::Result,
    records::{generate_examples, Examples, TriviaQaRecord},
    schema::{dataset_info, DatasetInfo, DOWNLOAD_URL},
    splits::{resolve_splits, SplitGenerator},
};

/// The three steps a harness runs to materialize a dataset.
pub trait DatasetBuilder {
    type Example: Serialize;
    type Examples: Iterator<Item = Result<Self::Example>>;

    fn info(&self) -> DatasetInfo;

    fn split_generators(&self, downloads: &dyn DownloadManager) -> Result<Vec<SplitGenerator>>;

    fn generate_examples(&self, path: &Path) -> Result<Self::Examples>;
}

#[derive(Debug, Clone)]
pub struct TriviaQa {
    download_url: String,
}

impl TriviaQa {
    pub fn new(download_url: impl Into<String>) -> Self {
        Self {
            download_url: download_url.into(),
        }
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }
}

impl Default for TriviaQa {
    fn default() -> Self {
        Self::new(DOWNLOAD_URL)
    }
}

/// Builds the adapter from loaded configuration.
pub fn builder(config: &AppConfig) -> TriviaQa {
    TriviaQa::new(config.download_url.clone())
}

impl DatasetBuilder for TriviaQa {
    type Example = TriviaQaRecord;
    type Examples = Examples;

    fn info(&self) -> DatasetInfo {
        dataset_info()
    }

    fn split_generators(&self, downloads: &dyn DownloadManager) -> Result<Vec<SplitGenerator>> {
        let root = downloads.download_and_extract(&self.download_url)?;
        let generators = resolve_splits(&root)?;
        for generator in &generators {
            info!(
                split = %generator.split,
                num_shards = generator.num_shards,
                files = generator.files.len(),
                "Prepared split"
            );
        }
        Ok(generators)
    }

    fn generate_examples(&self, path: &Path) -> Result<Examples> {
        generate_examples(path)
    }
}
