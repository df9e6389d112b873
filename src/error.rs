//! Top-level error types for the pakager CLI.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, PakagerError>;

/// Any failure that stops a pakager run
#[derive(Error, Debug)]
pub enum PakagerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration could not be loaded
    #[error("{0}")]
    Load(#[from] crate::config::LoadError),

    /// The built-in schema is malformed
    #[error("Schema error: {0}")]
    Schema(#[from] crate::config::SchemaError),

    /// Resolution failed for a reason other than a violation report
    #[error("{0}")]
    Resolve(#[from] crate::config::ResolveError),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
