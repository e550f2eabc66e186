//! modshift CLI - batch rewriting of CommonJS-era code into ES modules.
//!
//! The transformations live in `modshift-core`; this crate walks the file
//! tree, loads configuration, writes results back and runs the formatter.
//!
//! - [`cli`] - Argument parsing with clap
//! - [`commands`] - One function per subcommand
//! - [`config`] - `modshift.toml`, `MODSHIFT_*` variables and flags, merged with figment
//! - [`walker`] - Source file discovery
//! - [`formatter`] - External formatter runs
//! - [`error`] - Error types and miette conversion
//! - [`logger`] / [`ui`] - Logging and status lines

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod ui;
pub mod walker;

pub use error::{CliError, ConfigError, Result};
