//! End-to-end runs of each transformation over fixture files.

use modshift_core::{
    BLANK_LINE_MARKER, NoSeeding, Pipeline, RuleKind, TransformError, TransformOutput,
    Transformation, mark, unmark,
};
use proptest::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

fn run_fixture(name: &str, transformation: Transformation) -> TransformOutput {
    Pipeline::default()
        .run_file(&fixture_path(name), transformation, &mut NoSeeding)
        .unwrap_or_else(|e| panic!("Failed to transform {name}: {e}"))
}

fn run(
    path: &str,
    source: &str,
    transformation: Transformation,
) -> Result<TransformOutput, TransformError> {
    Pipeline::default().run_source(Path::new(path), source, transformation, &mut NoSeeding)
}

#[test]
fn module_calls_fixture() {
    let output = run_fixture("module_calls.ts", Transformation::ModuleCalls);
    assert_eq!(output.code, read_fixture("module_calls.expected.ts"));
    assert!(output.changed);
    assert_eq!(output.stats.get(RuleKind::SideEffectModuleCall), 1);
    assert_eq!(output.stats.get(RuleKind::ModuleCallDeclaration), 2);
    assert_eq!(output.stats.get(RuleKind::InlineModuleCall), 2);
    assert_eq!(output.stats.get(RuleKind::HoistImports), 1);
}

#[test]
fn module_calls_are_idempotent() {
    let once = run_fixture("module_calls.ts", Transformation::ModuleCalls);
    let twice = run("module_calls.ts", &once.code, Transformation::ModuleCalls).unwrap();
    assert_eq!(twice.code, once.code);
    assert!(!twice.changed);
}

#[test]
fn legacy_export_fixture() {
    let output = run_fixture("settings.ts", Transformation::LegacyExports);
    assert_eq!(output.code, read_fixture("settings.expected.ts"));
    assert_eq!(output.stats.get(RuleKind::LegacyExport), 1);
}

#[test]
fn idle_reprints_markup_files_unchanged() {
    let output = run_fixture("widget.tsx", Transformation::Idle);
    assert_eq!(output.code, read_fixture("widget.tsx"));
    assert!(!output.changed);
    assert_eq!(output.stats.total(), 0);
}

#[test]
fn idle_keeps_any_number_of_blank_lines() {
    for blank in 0..6 {
        let source = format!("const a = 1;\n{}const b = 2;\n", "\n".repeat(blank));
        let output = run("a.ts", &source, Transformation::Idle).unwrap();
        assert_eq!(output.code, source, "{blank} blank lines");
    }
}

#[test]
fn marker_text_never_reaches_the_output() {
    let source = "const a = require('./a');\n\n\nfoo(require('./b'));\n\n";
    let output = run("a.ts", source, Transformation::ModuleCalls).unwrap();
    assert!(!output.code.contains(BLANK_LINE_MARKER));
    assert_eq!(
        output.code,
        "import B from './b';\nimport a from './a';\n\n\nfoo(B);\n\n"
    );
}

#[test]
fn header_stays_first_when_imports_are_hoisted() {
    let source = "// Copyright header\n// second line\n\nexport default wrap(require('./inner'));\n";
    let output = run("a.ts", source, Transformation::ModuleCalls).unwrap();
    assert_eq!(
        output.code,
        "// Copyright header\n// second line\n\nimport Inner from './inner';\nexport default wrap(Inner);\n"
    );
}

#[test]
fn directives_stay_above_hoisted_imports() {
    let source = "'use client';\n\nexport const A = require('@scope/ui/dist/button');\n";
    let output = run("a.tsx", source, Transformation::ModuleCalls).unwrap();
    assert_eq!(
        output.code,
        "'use client';\n\nimport UiButton from '@scope/ui/dist/button';\nexport const A = UiButton;\n"
    );
}

#[test]
fn colliding_inline_import_is_reported() {
    let source = "const Foo = require('./foo');\nbar(require('./foo.js'));\nconst FooJs = 1;\n";
    let err = run("dup.ts", source, Transformation::ModuleCalls).unwrap_err();
    assert!(err.is_collision());
    assert!(err.to_string().contains("dup.ts"));
}

#[test]
fn default_interop_over_scoped_and_relative_modules() {
    let source = "const a = require('@scope/a');\nconst b = require('lodash');\nconst c = require('./c').default;\n";
    let output = run("a.js", source, Transformation::DefaultInterop).unwrap();
    assert_eq!(
        output.code,
        "const a = require('@scope/a').default || require('@scope/a');\nconst b = require('lodash');\nconst c = require('./c').default;\n"
    );
    assert_eq!(output.stats.get(RuleKind::DefaultInterop), 1);
}

#[test]
fn missing_file_reads_as_empty() {
    let output = Pipeline::default()
        .run_file(
            &fixture_path("does-not-exist.ts"),
            Transformation::ModuleCalls,
            &mut NoSeeding,
        )
        .unwrap();
    assert_eq!(output.code, "");
    assert!(!output.changed);
}

proptest! {
    #[test]
    fn mark_then_unmark_restores_blank_lines(lines in prop::collection::vec("[a-z=;]{0,12}", 0..12)) {
        let text = lines.join("\n");
        prop_assert_eq!(unmark(&mark(&text)), text);
    }
}
