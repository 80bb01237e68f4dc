mod args;

use std::path::Path;

use anyhow::{bail, Context};
use common::utils::logging;
use tracing::info;
use triviaqa::{harness, DatasetBuilder, ExtractedDir};

use crate::args::Command;

fn main() -> anyhow::Result<()> {
    let cli = args::parse();
    let config = cli.resolve_config()?;
    logging::init(&config.log_filter);

    let adapter = triviaqa::builder(&config);
    let downloads = ExtractedDir::new(&config.data_dir);

    match &cli.command {
        Command::Schema => {
            let json = serde_json::to_string_pretty(&adapter.info())
                .context("serialising dataset info to JSON")?;
            println!("{json}");
        }
        Command::Splits => {
            for generator in adapter.split_generators(&downloads)? {
                println!(
                    "{} (shards: {}, files: {})",
                    generator.split,
                    generator.num_shards,
                    generator.files.len()
                );
                for file in &generator.files {
                    println!("  {}", file.display());
                }
            }
        }
        Command::Convert {
            splits, keep_going, ..
        } => {
            info!(
                data_dir = %config.data_dir,
                output_dir = %config.output_dir,
                "Starting TriviaQA conversion"
            );
            let report = harness::run(
                &adapter,
                &downloads,
                Path::new(&config.output_dir),
                splits,
                *keep_going,
            )?;

            for summary in &report.completed {
                println!("{}: {} records", summary.split, summary.records);
            }
            if !report.is_success() {
                for (split, err) in &report.failed {
                    eprintln!("{split}: {err:#}");
                }
                bail!("{} split(s) failed to convert", report.failed.len());
            }
        }
    }

    Ok(())
}
