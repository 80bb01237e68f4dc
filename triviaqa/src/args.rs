use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::utils::config::{get_config, load_config, AppConfig, ENV_PREFIX};
use config::{Environment, File};

use triviaqa::Split;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Convert the TriviaQA reading-comprehension corpus", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./triviaqa.{toml,yaml,json} when present)
    #[arg(long, global = true, env = "TRIVIAQA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the extracted triviaqa-rc archive
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the dataset description and record features as JSON
    Schema,

    /// List the files matched for every split
    Splits,

    /// Convert splits to JSON Lines
    Convert {
        /// Directory to write <split>.jsonl and <split>.summary.json
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Only convert these splits (repeatable; defaults to all)
        #[arg(long = "split", value_enum)]
        splits: Vec<Split>,

        /// Continue with the remaining splits after a failure
        #[arg(long)]
        keep_going: bool,
    },
}

impl Cli {
    /// Loads configuration, letting command-line flags win.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(
                File::from(path.as_path()),
                Environment::with_prefix(ENV_PREFIX),
            )
            .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => get_config().context("loading configuration")?,
        };

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.display().to_string();
        }
        if let Command::Convert {
            output_dir: Some(output_dir),
            ..
        } = &self.command
        {
            config.output_dir = output_dir.display().to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
