//! Error types for source rewriting

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort the rewrite of a single file
#[derive(Error, Debug, Diagnostic)]
pub enum TransformError {
    /// Two top-level declarations would bind the same name
    #[error("Imports declaration collision in the file: {}", path.display())]
    #[diagnostic(
        code(modshift::collision),
        help("`{name}` is bound more than once; rename one of the bindings and run again")
    )]
    ImportCollision { path: PathBuf, name: String },

    /// Reading or writing a source file failed
    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(code(modshift::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Patching a package entry file failed
    #[error("Failed to seed `{symbol}` into the entry point of {package}")]
    #[diagnostic(code(modshift::seed))]
    Seed {
        package: String,
        symbol: String,
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    /// Create an ImportCollision error
    pub fn collision(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self::ImportCollision {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Create an Io error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error raised while patching an entry file
    pub fn seed(package: impl Into<String>, symbol: impl Into<String>, source: TransformError) -> Self {
        Self::Seed {
            package: package.into(),
            symbol: symbol.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is (or wraps) a declaration collision
    pub fn is_collision(&self) -> bool {
        match self {
            Self::ImportCollision { .. } => true,
            Self::Seed { source, .. } => source.is_collision(),
            Self::Io { .. } => false,
        }
    }
}

/// Raised when original leading trivia is requested from a node that has none.
///
/// Never surfaced to callers: the header-preserving logic uses it to pick the
/// "re-attach the captured header" path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaError {
    #[error("synthesized node carries no original trivia")]
    Synthesized,
}

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, TransformError>;
