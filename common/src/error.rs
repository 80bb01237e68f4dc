use config::ConfigError;
use thiserror::Error;

// Errors raised by the ambient layer, outside of dataset conversion itself
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Validation error: {0}")]
    Validation(String),
}
