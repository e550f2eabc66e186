//! Command implementations.
//!
//! Files are processed one at a time, in path order: transform, then write in
//! place if the text changed. The first failure stops the run unless
//! `--keep-going` was given, in which case failures are reported and the run
//! ends with [`CliError::Incomplete`].

use std::fs;
use std::path::{Path, PathBuf};

use modshift_core::{EntryPointSeeder, FsSeeder, NoSeeding, Pipeline, Transformation};
use tracing::debug;

use crate::cli::{Command, EntryPointsArgs, FormatArgs, InteropArgs, ModulesArgs, RunArgs};
use crate::config::{ConfigOverrides, ModshiftConfig};
use crate::error::{CliError, Result};
use crate::formatter::{CommandFormatter, Formatter};
use crate::ui;
use crate::walker::{FileFilter, collect_files};

/// Outcome of running one transformation over a set of files.
#[derive(Debug, Default)]
pub struct RunReport {
    pub processed: usize,
    /// Files rewritten in place, in order
    pub written: Vec<PathBuf>,
    /// Entry files patched while seeding
    pub seeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl RunReport {
    /// Every file this run wrote, without repeats
    pub fn touched(&self) -> Vec<PathBuf> {
        let mut touched = self.written.clone();
        for entry in &self.seeded {
            if !touched.contains(entry) {
                touched.push(entry.clone());
            }
        }
        touched
    }

    fn summarize(&self, transformation: Transformation) {
        let mut line = format!(
            "{:?}: {} of {} rewritten",
            transformation,
            ui::plural(self.written.len(), "file"),
            self.processed
        );
        if !self.seeded.is_empty() {
            line.push_str(&format!(", {} seeded", ui::plural(self.seeded.len(), "entry point")));
        }
        if self.failed.is_empty() {
            ui::success(&line);
        } else {
            ui::warning(&format!("{line}, {} failed", self.failed.len()));
        }
    }

    fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(CliError::Incomplete {
                failed: self.failed.len(),
                total: self.processed,
            })
        }
    }
}

/// Run a parsed command.
pub fn execute(command: Command, config_path: Option<&Path>) -> Result<()> {
    match command {
        Command::Modules(args) => modules_execute(&args, config_path),
        Command::Exports(args) => exports_execute(&args, config_path),
        Command::EntryPoints(args) => entry_points_execute(&args, config_path),
        Command::Interop(args) => interop_execute(&args, config_path),
        Command::Format(args) => format_execute(&args, config_path),
    }
}

pub fn modules_execute(args: &ModulesArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ModshiftConfig::load(config_path, &ConfigOverrides::default())?;
    let transformation = if args.idling {
        Transformation::Idle
    } else {
        Transformation::ModuleCalls
    };
    transform_and_format(&args.run, &config, transformation)
}

pub fn exports_execute(args: &RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ModshiftConfig::load(config_path, &ConfigOverrides::default())?;
    transform_and_format(args, &config, Transformation::LegacyExports)
}

pub fn entry_points_execute(args: &EntryPointsArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ModshiftConfig::load(config_path, &args.overrides())?;
    transform_and_format(&args.run, &config, Transformation::EntryPoints)
}

pub fn interop_execute(args: &InteropArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ModshiftConfig::load(config_path, &ConfigOverrides::default())?;
    let filter = FileFilter::from_config(&config)
        .with_extension_family(&args.ext)
        .with_suffixes(args.include.clone());
    let files = collect_files(&args.path, &filter)?;

    let pipeline = Pipeline::new(config.transform_options());
    let report = run_files(
        &pipeline,
        &files,
        Transformation::DefaultInterop,
        &mut NoSeeding,
        args.keep_going,
    )?;
    report.summarize(Transformation::DefaultInterop);
    report.into_result().map(drop)
}

pub fn format_execute(args: &FormatArgs, config_path: Option<&Path>) -> Result<()> {
    let config = ModshiftConfig::load(config_path, &ConfigOverrides::default())?;
    let files = collect_files(&args.path, &FileFilter::from_config(&config))?;
    CommandFormatter::from_config(&config)?.format(&files)?;
    ui::success(&format!("Formatted {}", ui::plural(files.len(), "file")));
    Ok(())
}

fn transform_and_format(
    args: &RunArgs,
    config: &ModshiftConfig,
    transformation: Transformation,
) -> Result<()> {
    let files = collect_files(&args.path, &FileFilter::from_config(config))?;
    let pipeline = Pipeline::new(config.transform_options());

    let report = if transformation == Transformation::EntryPoints {
        let mut seeder = FsSeeder::new(pipeline.clone());
        let mut report = run_files(&pipeline, &files, transformation, &mut seeder, args.keep_going);
        if let Ok(report) = &mut report {
            report.seeded = seeder.into_touched();
        }
        report?
    } else {
        run_files(&pipeline, &files, transformation, &mut NoSeeding, args.keep_going)?
    };
    report.summarize(transformation);

    if args.format {
        let touched = report.touched();
        if touched.is_empty() {
            ui::info("Nothing to format");
        } else {
            CommandFormatter::from_config(config)?.format(&touched)?;
        }
    }
    report.into_result().map(drop)
}

/// Transform `files` in order and write back the ones that changed.
pub fn run_files(
    pipeline: &Pipeline,
    files: &[PathBuf],
    transformation: Transformation,
    seeder: &mut dyn EntryPointSeeder,
    keep_going: bool,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    for path in files {
        report.processed += 1;
        let output = match pipeline.run_file(path, transformation, seeder) {
            Ok(output) => output,
            Err(err) if keep_going => {
                ui::error(&err.to_string());
                report.failed.push((path.clone(), err.to_string()));
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if !output.changed {
            debug!(path = %path.display(), "unchanged");
            continue;
        }

        fs::write(path, &output.code).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), rewrites = output.stats.total(), "written");
        report.written.push(path.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, text) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        dir
    }

    fn all_files(dir: &TempDir) -> Vec<PathBuf> {
        collect_files(dir.path(), &FileFilter::from_config(&ModshiftConfig::default())).unwrap()
    }

    #[test]
    fn test_changed_files_are_written() {
        let dir = project(&[
            ("a.ts", "const a = require('./a');\n"),
            ("b.ts", "import b from './b';\n"),
        ]);
        let files = all_files(&dir);
        let report = run_files(
            &Pipeline::default(),
            &files,
            Transformation::ModuleCalls,
            &mut NoSeeding,
            false,
        )
        .unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.written, vec![dir.path().join("a.ts")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.ts")).unwrap(),
            "import a from './a';\n"
        );
    }

    #[test]
    fn test_first_failure_stops_the_run() {
        let dir = project(&[
            ("a.ts", "const A = require('./a');\nuse(require('./a'));\n"),
            ("b.ts", "const b = require('./b');\n"),
        ]);
        let files = all_files(&dir);
        let err = run_files(
            &Pipeline::default(),
            &files,
            Transformation::ModuleCalls,
            &mut NoSeeding,
            false,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Transform(ref e) if e.is_collision()));
        assert_eq!(
            fs::read_to_string(dir.path().join("b.ts")).unwrap(),
            "const b = require('./b');\n"
        );
    }

    #[test]
    fn test_keep_going_collects_failures() {
        let dir = project(&[
            ("a.ts", "const A = require('./a');\nuse(require('./a'));\n"),
            ("b.ts", "const b = require('./b');\n"),
        ]);
        let files = all_files(&dir);
        let report = run_files(
            &Pipeline::default(),
            &files,
            Transformation::ModuleCalls,
            &mut NoSeeding,
            true,
        )
        .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.written, vec![dir.path().join("b.ts")]);
        assert!(matches!(
            report.into_result(),
            Err(CliError::Incomplete { failed: 1, total: 2 })
        ));
    }

    #[test]
    fn test_touched_includes_seeded_entries_once() {
        let report = RunReport {
            processed: 2,
            written: vec![PathBuf::from("a.ts"), PathBuf::from("store/pkg/src/index.ts")],
            seeded: vec![
                PathBuf::from("store/pkg/src/index.ts"),
                PathBuf::from("store/other/src/index.ts"),
            ],
            failed: Vec::new(),
        };
        assert_eq!(
            report.touched(),
            vec![
                PathBuf::from("a.ts"),
                PathBuf::from("store/pkg/src/index.ts"),
                PathBuf::from("store/other/src/index.ts"),
            ]
        );
    }
}
