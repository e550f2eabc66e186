//! Per-file pipeline: read, mark blank lines, parse, run passes, print,
//! unmark.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::{RuleContext, RuleStats, apply_passes};
use crate::error::Result;
use crate::loader::{self, SourceUnit};
use crate::marker;
use crate::printer;
use crate::rules::Rule;
use crate::seeder::{EntryPointSeeder, NoSeeding, SeedRequest};

/// The rewrites the tool offers, each a fixed list of passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transformation {
    /// `require` to `import`, then hoist the collected imports
    ModuleCalls,
    /// Print without rewriting
    Idle,
    /// `export =` to `export default`
    LegacyExports,
    /// Deep `/dist` imports to package entry points
    EntryPoints,
    /// `require(…).default || require(…)` for scoped and relative modules
    DefaultInterop,
}

impl Transformation {
    pub fn passes(self, options: &TransformOptions) -> Vec<Vec<Rule>> {
        match self {
            Self::ModuleCalls => vec![
                vec![
                    Rule::SideEffectModuleCall,
                    Rule::ModuleCallDeclaration,
                    Rule::InlineModuleCall {
                        build_dir: options.build_dir.clone(),
                    },
                ],
                vec![Rule::HoistImports],
            ],
            Self::Idle => vec![vec![Rule::Idle]],
            Self::LegacyExports => vec![vec![Rule::LegacyExport]],
            Self::EntryPoints => vec![vec![Rule::EntryPointPath {
                delimiter: options.delimiter.clone(),
            }]],
            Self::DefaultInterop => vec![vec![Rule::DefaultInterop]],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Marks a deep import into a package's build output
    pub delimiter: String,
    /// Root under which packages and their entry files live
    pub modules_store: PathBuf,
    /// Build-output directory name dropped from derived import names
    pub build_dir: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            delimiter: "/dist".to_string(),
            modules_store: PathBuf::from("node_modules"),
            build_dir: "dist".to_string(),
        }
    }
}

/// Result of running a transformation over one file
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    /// Whether `code` differs from the input
    pub changed: bool,
    pub stats: RuleStats,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: TransformOptions,
}

impl Pipeline {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Transform the file at `path`. Nothing is written.
    pub fn run_file(
        &self,
        path: &Path,
        transformation: Transformation,
        seeder: &mut dyn EntryPointSeeder,
    ) -> Result<TransformOutput> {
        let source = loader::read_source(path)?;
        self.run_source(path, &source, transformation, seeder)
    }

    /// Transform `source` as if it were the contents of `path`.
    pub fn run_source(
        &self,
        path: &Path,
        source: &str,
        transformation: Transformation,
        seeder: &mut dyn EntryPointSeeder,
    ) -> Result<TransformOutput> {
        let passes = transformation.passes(&self.options);
        self.run_passes(path, source, &passes, seeder)
    }

    /// Add the import and re-export described by `request` to the entry file
    /// at `entry`. Nothing is written.
    pub fn seed_file(&self, entry: &Path, request: &SeedRequest) -> Result<TransformOutput> {
        let source = loader::read_source(entry)?;
        let passes = [vec![Rule::SeedEntryPoint(request.clone())]];
        self.run_passes(entry, &source, &passes, &mut NoSeeding)
    }

    fn run_passes(
        &self,
        path: &Path,
        source: &str,
        passes: &[Vec<Rule>],
        seeder: &mut dyn EntryPointSeeder,
    ) -> Result<TransformOutput> {
        let normalized = marker::normalize_newlines(source);
        let marked = marker::mark(&normalized);
        let unit: SourceUnit = loader::load(path, Some(marked.as_ref()))?;

        if unit.opaque {
            return Ok(TransformOutput {
                code: source.to_owned(),
                changed: false,
                stats: RuleStats::default(),
                diagnostics: unit.diagnostics,
            });
        }

        let mut cx = RuleContext::new(&unit, seeder);
        let unit = apply_passes(unit, passes, &mut cx)?;
        let printed = printer::print(&unit, cx.header());
        let code = marker::unmark(&printed);

        let changed = code != source;
        let stats = cx.into_stats();
        debug!(
            path = %path.display(),
            changed,
            rewrites = stats.total(),
            "transformed"
        );

        Ok(TransformOutput {
            code,
            changed,
            stats,
            diagnostics: unit.diagnostics,
        })
    }
}
