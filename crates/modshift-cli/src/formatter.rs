//! Handing rewritten files to an external code formatter.
//!
//! The printer keeps the original layout but makes no attempt at pretty
//! output for the code it synthesizes, so runs can finish with a formatter
//! pass (prettier by default).

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, anyhow};
use tracing::{debug, info};

use crate::config::ModshiftConfig;
use crate::error::{ConfigError, Result};

pub trait Formatter {
    fn format(&self, files: &[PathBuf]) -> Result<()>;
}

/// Runs a command line with the file paths appended, a batch at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
    batch_size: usize,
}

impl CommandFormatter {
    pub fn new(command: &[String], batch_size: usize) -> Result<Self, ConfigError> {
        let Some((program, args)) = command.split_first() else {
            return Err(ConfigError::InvalidValue {
                field: "formatter".to_string(),
                value: "[]".to_string(),
                hint: "Set a command, e.g. [\"pnpm\", \"exec\", \"prettier\", \"--write\"]"
                    .to_string(),
            });
        };
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            batch_size: batch_size.max(1),
        })
    }

    pub fn from_config(config: &ModshiftConfig) -> Result<Self, ConfigError> {
        Self::new(&config.formatter, config.format_batch_size)
    }

    pub fn batches<'f>(&self, files: &'f [PathBuf]) -> impl Iterator<Item = &'f [PathBuf]> {
        files.chunks(self.batch_size)
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        for batch in self.batches(files) {
            debug!(command = %self.command_line(), files = batch.len(), "running formatter");
            let status = Command::new(&self.program)
                .args(&self.args)
                .args(batch)
                .status()
                .with_context(|| format!("could not run `{}`", self.command_line()))?;
            if !status.success() {
                return Err(anyhow!("`{}` exited with {status}", self.command_line()).into());
            }
        }
        info!(files = files.len(), "formatted");
        Ok(())
    }
}
