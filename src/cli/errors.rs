//! CLI-specific error types

use thiserror::Error;

use crate::seed::SeedError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors; all are fatal and exit non-zero
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    #[error("Server error: {0}")]
    Server(String),
}
