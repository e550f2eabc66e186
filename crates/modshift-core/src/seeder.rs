//! Keeping package entry points in sync with rewritten deep imports.
//!
//! The entry-point rule depends on [`EntryPointSeeder`] rather than on the
//! file system, so it can run against a recording seeder in tests.
//! [`FsSeeder`] is the real one: it patches
//! `<modules_store>/<package>/src/index.tsx` (or `index.ts`) in place.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::{Result, TransformError};
use crate::pipeline::Pipeline;

/// "Make `package` re-export `symbol`, imported from `subpath` inside it."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedRequest {
    pub package: String,
    pub symbol: String,
    /// Path inside the package's build output, as it followed the delimiter
    pub subpath: String,
}

impl SeedRequest {
    pub fn new(
        package: impl Into<String>,
        symbol: impl Into<String>,
        subpath: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            symbol: symbol.into(),
            subpath: subpath.into(),
        }
    }

    /// Import path relative to the entry file, e.g. `./sub/leaf`
    pub fn relative_path(&self) -> String {
        if self.subpath.starts_with('/') {
            format!(".{}", self.subpath)
        } else {
            format!("./{}", self.subpath)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The entry file at this path was patched
    Seeded(PathBuf),
    /// Already done earlier in this run
    AlreadySeeded,
    /// This seeder does not touch entry points
    Skipped,
}

pub trait EntryPointSeeder {
    fn ensure_export(&mut self, request: &SeedRequest) -> Result<SeedOutcome>;
}

/// Seeder that does nothing; used for the entry files themselves and for
/// transformations that never seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeeding;

impl EntryPointSeeder for NoSeeding {
    fn ensure_export(&mut self, _request: &SeedRequest) -> Result<SeedOutcome> {
        Ok(SeedOutcome::Skipped)
    }
}

/// Patches entry files under a modules store, each `(package, symbol)` pair
/// at most once per run.
///
/// A symbol seeded earlier in the run from a different subpath is seeded
/// again, so that the entry file's duplicate check reports the clash instead
/// of pointing the import at the first module.
#[derive(Debug)]
pub struct FsSeeder {
    modules_store: PathBuf,
    pipeline: Pipeline,
    /// `(package, symbol)` to the subpath it was seeded from
    seeded: FxHashMap<(String, String), String>,
    touched: Vec<PathBuf>,
}

impl FsSeeder {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            modules_store: pipeline.options().modules_store.clone(),
            pipeline,
            seeded: FxHashMap::default(),
            touched: Vec::new(),
        }
    }

    /// `src/index.tsx` if present, `src/index.ts` otherwise
    pub fn entry_file(&self, package: &str) -> PathBuf {
        let mut root = self.modules_store.clone();
        root.extend(package.split('/').filter(|segment| !segment.is_empty()));
        let src = root.join("src");

        let markup = src.join("index.tsx");
        if markup.is_file() {
            markup
        } else {
            src.join("index.ts")
        }
    }

    /// Entry files written so far, in order
    pub fn touched(&self) -> &[PathBuf] {
        &self.touched
    }

    pub fn into_touched(self) -> Vec<PathBuf> {
        self.touched
    }

    fn write(&self, entry: &Path, code: &str) -> Result<()> {
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent).map_err(|err| TransformError::io(parent, err))?;
        }
        fs::write(entry, code).map_err(|err| TransformError::io(entry, err))
    }
}

impl EntryPointSeeder for FsSeeder {
    fn ensure_export(&mut self, request: &SeedRequest) -> Result<SeedOutcome> {
        let key = (request.package.clone(), request.symbol.clone());
        match self.seeded.get(&key) {
            Some(subpath) if *subpath == request.subpath => {
                debug!(package = %request.package, symbol = %request.symbol, "already seeded in this run");
                return Ok(SeedOutcome::AlreadySeeded);
            }
            Some(subpath) => debug!(
                package = %request.package,
                symbol = %request.symbol,
                seeded_from = %subpath,
                requested_from = %request.subpath,
                "symbol already seeded from another subpath"
            ),
            None => {}
        }

        let entry = self.entry_file(&request.package);
        let output = self.pipeline.seed_file(&entry, request)?;
        self.write(&entry, &output.code)?;
        info!(
            entry = %entry.display(),
            symbol = %request.symbol,
            "seeded entry point"
        );

        self.seeded.insert(key, request.subpath.clone());
        if !self.touched.contains(&entry) {
            self.touched.push(entry.clone());
        }
        Ok(SeedOutcome::Seeded(entry))
    }
}
