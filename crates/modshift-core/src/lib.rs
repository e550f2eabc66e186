//! Tree-based rewriting of legacy module syntax into ES modules
//!
//! This crate rewrites `require(...)` calls, `export =` statements and deep
//! imports into a package's build output, while keeping everything it did not
//! mean to touch: formatting, comments and blank lines.
//!
//! # Features
//!
//! - **Structural matching** - Rules match on a syntax tree built with OXC, not on text
//! - **Composable passes** - Rules are plain values run in ordered passes
//! - **Layout preservation** - Untouched code prints byte for byte; blank lines
//!   survive through a mark/unmark round trip
//! - **Header comments** - A file's leading comment stays on top when imports are added
//! - **Collision guard** - A rewrite never binds the same top-level name twice
//!
//! # Examples
//!
//! ## Converting `require` calls
//!
//! ```rust
//! use modshift_core::{NoSeeding, Pipeline, Transformation};
//! use std::path::Path;
//!
//! let output = Pipeline::default().run_source(
//!     Path::new("src/app.ts"),
//!     "const Foo = require('./bar');\n\nFoo();\n",
//!     Transformation::ModuleCalls,
//!     &mut NoSeeding,
//! )?;
//!
//! assert_eq!(output.code, "import Foo from './bar';\n\nFoo();\n");
//! # Ok::<(), modshift_core::TransformError>(())
//! ```
//!
//! ## Legacy exports
//!
//! ```rust
//! use modshift_core::{NoSeeding, Pipeline, Transformation};
//! use std::path::Path;
//!
//! let output = Pipeline::default().run_source(
//!     Path::new("src/value.ts"),
//!     "export = myValue;\n",
//!     Transformation::LegacyExports,
//!     &mut NoSeeding,
//! )?;
//!
//! assert_eq!(output.code, "export default myValue;\n");
//! # Ok::<(), modshift_core::TransformError>(())
//! ```
//!
//! ## Running rules directly
//!
//! ```rust
//! use modshift_core::{NoSeeding, Rule, RuleContext, apply, load, print};
//! use std::path::Path;
//!
//! let unit = load(Path::new("a.ts"), Some("export = value;\n"))?;
//! let mut seeder = NoSeeding;
//! let mut cx = RuleContext::new(&unit, &mut seeder);
//! let unit = apply(unit, &[Rule::LegacyExport], &mut cx)?;
//!
//! assert_eq!(print(&unit, cx.header()), "export default value;\n");
//! # Ok::<(), modshift_core::TransformError>(())
//! ```

pub mod comments;
pub mod engine;
pub mod error;
pub mod guard;
pub mod loader;
pub mod marker;
pub mod pipeline;
pub mod printer;
pub mod rules;
pub mod seeder;
pub mod tree;

pub use comments::{LiftedHeader, OriginalHeader};
pub use engine::{NodePosition, PendingImport, RuleContext, RuleStats, apply, apply_passes};
pub use error::{Result, TransformError, TriviaError};
pub use guard::{ensure_unique, has_duplicates};
pub use loader::{Dialect, SourceUnit, load};
pub use marker::{BLANK_LINE_MARKER, mark, unmark};
pub use pipeline::{Pipeline, TransformOptions, TransformOutput, Transformation};
pub use printer::print;
pub use rules::{Rule, RuleKind};
pub use seeder::{EntryPointSeeder, FsSeeder, NoSeeding, SeedOutcome, SeedRequest};
pub use tree::{Node, NodeKind, Origin, TextSpan};
