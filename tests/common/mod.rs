// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

pub const SAMPLE_BLOCK: &str = "Times for 100 vertices and 200 connections: Serial: 50 Parallel: 20";

/// Creates an empty project directory with a `tmp` subdirectory.
pub fn setup_project() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    fs::create_dir_all(temp_dir.path().join("tmp")).expect("Failed to create tmp directory");
    temp_dir
}

/// Writes an executable `gradlew` into `project`. The script logs its
/// arguments to `args.log` and its JVM-related environment to `env.log`
/// before running `body`.
#[cfg(unix)]
pub fn write_fake_gradlew(project: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
echo "$@" >> args.log
echo "JAVA_TOOL_OPTIONS=$JAVA_TOOL_OPTIONS" >> env.log
echo "GRADLE_OPTS=$GRADLE_OPTS" >> env.log
mkdir -p tmp
{body}
"#
    );
    let path = project.join("gradlew");
    fs::write(&path, script).expect("Failed to write gradlew");
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("Failed to chmod gradlew");
    path
}

/// A wrapper that only writes results when the CPU property is 2.
/// For `--cpu 1,2` this is the "first configuration produces nothing" case.
#[cfg(unix)]
pub fn write_wrapper_results_on_cpu_2(project: &Path) -> PathBuf {
    write_fake_gradlew(
        project,
        &format!(
            r#"case "$GRADLE_OPTS" in
  *-Dbfs.threads=2*) echo "{SAMPLE_BLOCK}" > tmp/results.txt ;;
esac
exit 0"#
        ),
    )
}

/// A wrapper that prints some output and exits 3 when the CPU property is 2.
#[cfg(unix)]
pub fn write_wrapper_failing_on_cpu_2(project: &Path) -> PathBuf {
    write_fake_gradlew(
        project,
        &format!(
            r#"case "$GRADLE_OPTS" in
  *-Dbfs.threads=2*) echo "BUILD FAILED: compilation error"; exit 3 ;;
esac
echo "{SAMPLE_BLOCK}" > tmp/results.txt
exit 0"#
        ),
    )
}

/// A wrapper that writes a results file without any timing block.
#[cfg(unix)]
pub fn write_wrapper_without_blocks(project: &Path) -> PathBuf {
    write_fake_gradlew(
        project,
        r#"echo "BUILD SUCCESSFUL, nothing measured" > tmp/results.txt
exit 0"#,
    )
}

pub fn read_log(project: &Path, name: &str) -> String {
    fs::read_to_string(project.join(name)).unwrap_or_default()
}

/// Writes a config file into the project root.
pub fn write_sweep_toml(project: &Path, content: &str) -> PathBuf {
    let path = project.join("Sweep.toml");
    fs::write(&path, content).expect("Failed to write Sweep.toml");
    path
}
