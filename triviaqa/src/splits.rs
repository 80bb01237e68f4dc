use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CorpusError, Result};

/// Question files live here relative to the extracted archive root.
pub const QA_SUBDIR: &str = "triviaqa-rc/qa";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Split {
    Train,
    #[value(alias = "validation")]
    Dev,
    #[value(alias = "heldout")]
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    pub fn name(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Dev => "dev",
            Self::Test => "test",
        }
    }

    pub fn file_pattern(self) -> &'static str {
        match self {
            Self::Train => "*-train.json",
            Self::Dev => "*-dev.json",
            Self::Test => "*-test-*without-answers.json",
        }
    }

    /// Target output shard count. Informational for the harness only.
    pub fn num_shards(self) -> usize {
        match self {
            Self::Train => 100,
            Self::Dev | Self::Test => 50,
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Split {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "dev" | "validation" => Ok(Self::Dev),
            "test" | "heldout" => Ok(Self::Test),
            other => anyhow::bail!("unknown split '{other}'. Expected one of: train, dev, test."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitGenerator {
    pub split: Split,
    pub num_shards: usize,
    pub files: Vec<PathBuf>,
}

/// Resolves every split under an extracted archive root.
///
/// A split whose pattern matches nothing gets an empty file list.
pub fn resolve_splits(root: &Path) -> Result<Vec<SplitGenerator>> {
    Split::ALL
        .into_iter()
        .map(|split| -> Result<SplitGenerator> {
            Ok(SplitGenerator {
                split,
                num_shards: split.num_shards(),
                files: split_files(root, split)?,
            })
        })
        .collect()
}

/// Files for one split, sorted by path.
pub fn split_files(root: &Path, split: Split) -> Result<Vec<PathBuf>> {
    let qa_dir = root.join(QA_SUBDIR);
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&qa_dir.to_string_lossy()),
        split.file_pattern()
    );

    let entries = glob::glob(&pattern).map_err(|source| CorpusError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;
    let mut files = entries.collect::<Result<Vec<_>, _>>()?;
    files.sort();

    if files.is_empty() {
        warn!(
            split = %split,
            dir = %qa_dir.display(),
            pattern = split.file_pattern(),
            "No files matched split pattern"
        );
    } else {
        debug!(split = %split, files = files.len(), "Resolved split files");
    }

    Ok(files)
}
