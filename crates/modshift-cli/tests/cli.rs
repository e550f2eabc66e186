//! Integration tests for the `modshift` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn modshift(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modshift").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--no-color");
    cmd
}

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_modules_rewrites_in_place() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "src/app.ts", "const Foo = require('./foo');\n\nFoo();\n");
    write(dir, "src/dist/out.ts", "const x = require('./x');\n");

    modshift(dir)
        .args(["modules", "src"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 file of 1 rewritten"));

    assert_eq!(read(dir, "src/app.ts"), "import Foo from './foo';\n\nFoo();\n");
    assert_eq!(read(dir, "src/dist/out.ts"), "const x = require('./x');\n");
}

#[test]
fn test_idling_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let text = "const Foo = require('./foo');\n\n\nFoo();\n";
    write(dir, "a.ts", text);

    modshift(dir).args(["modules", "a.ts", "--idling"]).assert().success();

    assert_eq!(read(dir, "a.ts"), text);
}

#[test]
fn test_exports() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "lib/value.ts", "const value = 1;\n\nexport = value;\n");

    modshift(dir).args(["exports", "lib"]).assert().success();

    assert_eq!(
        read(dir, "lib/value.ts"),
        "const value = 1;\n\nexport default value;\n"
    );
}

#[test]
fn test_entry_points_seed_the_store() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "app/main.ts", "import Widget from '@scope/ui/dist/widget';\n");
    write(dir, "store/@scope/ui/src/index.ts", "export { Button } from './button';\n");

    modshift(dir)
        .args(["entry-points", "app", "--modules-store", "store"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 entry point seeded"));

    assert_eq!(read(dir, "app/main.ts"), "import { Widget } from '@scope/ui';\n");
    assert_eq!(
        read(dir, "store/@scope/ui/src/index.ts"),
        "import Widget from './widget';\nexport { Button } from './button';\nexport { Widget };\n"
    );
}

#[test]
fn test_config_file_sets_the_delimiter() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "modshift.toml", "delimiter = \"/lib\"\nmodules_store = \"store\"\n");
    write(dir, "app/main.ts", "import Widget from 'ui/lib/widget';\n");

    modshift(dir).args(["entry-points", "app"]).assert().success();

    assert_eq!(read(dir, "app/main.ts"), "import { Widget } from 'ui';\n");
    assert_eq!(
        read(dir, "store/ui/src/index.ts"),
        "import Widget from './widget';\nexport { Widget };\n"
    );
}

#[test]
fn test_interop_filters_by_extension_and_suffix() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let text = "const a = require('./a');\n";
    write(dir, "lib/index.js", text);
    write(dir, "lib/other.js", text);
    write(dir, "lib/index.ts", text);

    modshift(dir)
        .args(["interop", "lib", "--ext", "js", "--include", "index.js"])
        .assert()
        .success();

    assert_eq!(
        read(dir, "lib/index.js"),
        "const a = require('./a').default || require('./a');\n"
    );
    assert_eq!(read(dir, "lib/other.js"), text);
    assert_eq!(read(dir, "lib/index.ts"), text);
}

#[test]
fn test_collision_fails_without_writing() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    let text = "const Foo = require('./foo');\nuse(require('./foo'));\n";
    write(dir, "a.ts", text);

    modshift(dir)
        .args(["modules", "a.ts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Imports declaration collision"));

    assert_eq!(read(dir, "a.ts"), text);
}

#[test]
fn test_keep_going_reports_failures() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "src/a.ts", "const Foo = require('./foo');\nuse(require('./foo'));\n");
    write(dir, "src/b.ts", "const b = require('./b');\n");

    modshift(dir)
        .args(["modules", "src", "--keep-going"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 files failed"));

    assert_eq!(read(dir, "src/b.ts"), "import b from './b';\n");
}

#[test]
fn test_missing_path() {
    let temp = TempDir::new().unwrap();
    modshift(temp.path())
        .args(["modules", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();
    modshift(temp.path())
        .args(["--config", "absent.toml", "format", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[cfg(unix)]
#[test]
fn test_format_runs_the_configured_command() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "modshift.toml", "formatter = [\"true\"]\n");
    write(dir, "src/a.ts", "a();\n");
    write(dir, "src/b.tsx", "b();\n");

    modshift(dir)
        .args(["format", "src"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Formatted 2 files"));
}

#[cfg(unix)]
#[test]
fn test_failing_formatter_fails_the_run() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    write(dir, "modshift.toml", "formatter = [\"false\"]\n");
    write(dir, "a.ts", "const a = require('./a');\n");

    modshift(dir)
        .args(["modules", "a.ts", "--format"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Formatter failed"));
    assert_eq!(read(dir, "a.ts"), "import a from './a';\n");
}
