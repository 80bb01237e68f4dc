//! Reference harness: runs a [`DatasetBuilder`] end to end and writes each
//! split as JSON Lines next to a small summary file.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    builder::DatasetBuilder,
    download::DownloadManager,
    error::CorpusError,
    schema::DatasetInfo,
    splits::{Split, SplitGenerator},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub version: String,
    pub split: Split,
    pub num_shards: usize,
    pub files: Vec<PathBuf>,
    pub records: usize,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Vec<ConversionSummary>,
    pub failed: Vec<(Split, anyhow::Error)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn records_path(output_dir: &Path, split: Split) -> PathBuf {
    output_dir.join(format!("{split}.jsonl"))
}

pub fn summary_path(output_dir: &Path, split: Split) -> PathBuf {
    output_dir.join(format!("{split}.summary.json"))
}

/// Converts the selected splits (all when `selected` is empty).
///
/// Without `keep_going` the first failing split aborts the run. Splits that
/// finished before a failure keep their output either way.
pub fn run<B: DatasetBuilder>(
    builder: &B,
    downloads: &dyn DownloadManager,
    output_dir: &Path,
    selected: &[Split],
    keep_going: bool,
) -> Result<RunReport> {
    let generators = builder
        .split_generators(downloads)
        .context("resolving dataset splits")?;

    let mut report = RunReport::default();
    for generator in generators
        .iter()
        .filter(|generator| selected.is_empty() || selected.contains(&generator.split))
    {
        match convert_split(builder, generator, output_dir) {
            Ok(summary) => report.completed.push(summary),
            Err(err) if keep_going => {
                error!(split = %generator.split, error = %format!("{err:#}"), "Split conversion failed");
                report.failed.push((generator.split, err));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}

/// Writes every record of one split to `<output_dir>/<split>.jsonl`.
///
/// Output is staged in a temporary file and only renamed into place once
/// every input file converted, so a failure never clobbers earlier output.
pub fn convert_split<B: DatasetBuilder>(
    builder: &B,
    generator: &SplitGenerator,
    output_dir: &Path,
) -> Result<ConversionSummary> {
    let info = builder.info();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let final_path = records_path(output_dir, generator.split);
    let staging_path = final_path.with_extension("jsonl.partial");

    if generator.files.is_empty() {
        warn!(split = %generator.split, "Split has no input files; writing an empty split");
    }

    let written = write_records(builder, &info, generator, &staging_path);
    let records = match written {
        Ok(records) => records,
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&staging_path) {
                warn!(
                    path = %staging_path.display(),
                    error = %cleanup,
                    "Failed to remove partial split output"
                );
            }
            return Err(err);
        }
    };

    fs::rename(&staging_path, &final_path).with_context(|| {
        format!(
            "moving {} into place at {}",
            staging_path.display(),
            final_path.display()
        )
    })?;

    let summary = ConversionSummary {
        generated_at: Utc::now(),
        dataset: info.name.to_string(),
        version: info.version.to_string(),
        split: generator.split,
        num_shards: generator.num_shards,
        files: generator.files.clone(),
        records,
    };
    write_summary(&summary, &summary_path(output_dir, generator.split))?;

    info!(
        split = %generator.split,
        records,
        files = generator.files.len(),
        output = %final_path.display(),
        "Converted split"
    );
    Ok(summary)
}

fn write_records<B: DatasetBuilder>(
    builder: &B,
    info: &DatasetInfo,
    generator: &SplitGenerator,
    staging_path: &Path,
) -> Result<usize> {
    let file = File::create(staging_path)
        .with_context(|| format!("creating {}", staging_path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut records = 0usize;

    for path in &generator.files {
        let examples = builder
            .generate_examples(path)
            .with_context(|| format!("converting {} split file {}", generator.split, path.display()))?;

        for example in examples {
            let example = example.with_context(|| {
                format!("converting {} split file {}", generator.split, path.display())
            })?;
            let value = serde_json::to_value(&example).map_err(|source| {
                CorpusError::Serialize {
                    question_id: format!("#{records} of {}", path.display()),
                    source,
                }
            })?;
            if let Err(mismatch) = info.features.validate(&value) {
                let question_id = value
                    .get("question_id")
                    .and_then(|id| id.as_str())
                    .unwrap_or("<unknown>")
                    .to_string();
                return Err(CorpusError::Validation {
                    question_id,
                    mismatch,
                }
                .into());
            }

            serde_json::to_writer(&mut writer, &value)
                .with_context(|| format!("writing record to {}", staging_path.display()))?;
            writer
                .write_all(b"\n")
                .with_context(|| format!("writing record to {}", staging_path.display()))?;
            records = records.saturating_add(1);
        }
    }

    writer
        .flush()
        .with_context(|| format!("flushing {}", staging_path.display()))?;
    Ok(records)
}

fn write_summary(summary: &ConversionSummary, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(summary).context("serialising conversion summary to JSON")?;
    fs::write(path, json).with_context(|| format!("writing conversion summary to {}", path.display()))
}

pub fn read_summary(path: &Path) -> Result<ConversionSummary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading conversion summary at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing conversion summary at {}", path.display()))
}
