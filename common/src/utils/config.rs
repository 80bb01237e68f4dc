use config::{Config, Environment, File, Source};
use serde::Deserialize;

use crate::error::AppError;

pub const ENV_PREFIX: &str = "TRIVIAQA";
pub const CONFIG_FILE: &str = "triviaqa";

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    /// Directory holding the extracted `triviaqa-rc` archive.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_download_url")]
    pub download_url: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.data_dir.trim().is_empty() {
            return Err(AppError::Validation("data_dir must not be empty".into()));
        }
        if self.output_dir.trim().is_empty() {
            return Err(AppError::Validation("output_dir must not be empty".into()));
        }
        if self.download_url.trim().is_empty() {
            return Err(AppError::Validation("download_url must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            download_url: default_download_url(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_data_dir() -> String {
    "./data/triviaqa".to_string()
}

fn default_output_dir() -> String {
    "./data/converted".to_string()
}

fn default_download_url() -> String {
    "http://nlp.cs.washington.edu/triviaqa/data/triviaqa-rc.tar.gz".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

pub fn get_config() -> Result<AppConfig, AppError> {
    load_config(
        File::with_name(CONFIG_FILE).required(false),
        Environment::with_prefix(ENV_PREFIX),
    )
}

/// Layers `env` over `file`; missing keys fall back to the serde defaults.
pub fn load_config<F, E>(file: F, env: E) -> Result<AppConfig, AppError>
where
    F: Source + Send + Sync + 'static,
    E: Source + Send + Sync + 'static,
{
    let config: AppConfig = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}
