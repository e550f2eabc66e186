//! Command-line interface definition.
//!
//! - `modshift modules` - `require` calls to imports
//! - `modshift exports` - `export =` to `export default`
//! - `modshift entry-points` - deep build-output imports to package entry points
//! - `modshift interop` - default-export fallback for `require` calls
//! - `modshift format` - run the formatter only

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;

/// modshift - rewrite CommonJS-era modules into ES modules
#[derive(Parser, Debug)]
#[command(
    name = "modshift",
    version,
    about = "Rewrite CommonJS-era JavaScript/TypeScript modules into ES modules",
    long_about = "modshift rewrites source files in place, one transformation per run.\n\
                  Code it does not rewrite keeps its formatting, comments and blank lines."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of ./modshift.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert `require` calls to `import` declarations
    ///
    /// Top-level `const X = require('x')` becomes `import X from 'x'`; a
    /// `require` anywhere else is replaced by a generated name imported at
    /// the top of the file.
    Modules(ModulesArgs),

    /// Convert `export = value` to `export default value`
    Exports(RunArgs),

    /// Rewrite default imports from a package's build output
    ///
    /// `import W from 'pkg/dist/sub/leaf'` becomes `import { W } from 'pkg'`,
    /// and the package entry file in the modules store gains the matching
    /// import and re-export.
    EntryPoints(EntryPointsArgs),

    /// Add a default-export fallback to scoped and relative `require` calls
    Interop(InteropArgs),

    /// Run the configured formatter over the files without transforming them
    Format(FormatArgs),
}

/// Arguments shared by the transforming commands
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Source file, or directory to traverse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Run the formatter over every file that was written
    #[arg(long)]
    pub format: bool,

    /// Continue with the next file when one fails
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ModulesArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Parse and print without rewriting, to preview layout changes
    #[arg(long)]
    pub idling: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EntryPointsArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Directory holding the packages whose entry files are seeded
    #[arg(long, value_name = "DIR")]
    pub modules_store: Option<PathBuf>,

    /// Path fragment that marks an import into build output
    #[arg(long, value_name = "STR")]
    pub delimiter: Option<String>,
}

impl EntryPointsArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            delimiter: self.delimiter.clone(),
            modules_store: self.modules_store.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct InteropArgs {
    /// Source file, or directory to traverse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Extension of the files to process; its `x` variant is included too
    #[arg(long, default_value = "ts", value_name = "EXT")]
    pub ext: String,

    /// Only process files whose path ends with one of these
    #[arg(long, value_delimiter = ',', value_name = "SUFFIX")]
    pub include: Vec<String>,

    /// Continue with the next file when one fails
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    /// Source file, or directory to traverse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
