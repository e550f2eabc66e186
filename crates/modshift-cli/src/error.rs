//! Error types for the modshift CLI.
//!
//! [`CliError`] is what every command returns. Failures from the core crate
//! keep their own diagnostics (codes and help text) and are handed to miette
//! unchanged; everything else is rendered from its message, which carries a
//! `Hint:` line where there is something the user can do about it.

use std::path::PathBuf;

use modshift_core::TransformError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A file could not be transformed
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The path given on the command line does not exist
    #[error("Path not found: {}\n\nHint: Pass a source file or a directory to traverse", .0.display())]
    PathNotFound(PathBuf),

    /// Writing a transformed file failed
    #[error("Failed to write {}: {source}\n\nHint: Check file permissions", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to traverse directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The external formatter could not be run or reported failure
    #[error("Formatter failed: {0:#}\n\nHint: Check the `formatter` command in modshift.toml")]
    Formatter(#[from] anyhow::Error),

    /// `--keep-going` run that finished with failed files
    #[error("{failed} of {total} files failed to transform")]
    Incomplete { failed: usize, total: usize },
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicit `--config` file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a modshift.toml file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Merging or extracting the configuration failed
    #[error("Invalid configuration: {0}\n\nHint: Check modshift.toml syntax and MODSHIFT_* environment variables")]
    Extract(#[from] Box<figment::Error>),

    /// A value was read but is not usable
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Transform(e) => miette::Report::new(e),
        _ => miette::miette!("{}", err),
    }
}
