//! # CLI Tests / 命令行测试
//!
//! End-to-end tests that run the `sweep-runner` binary against a temporary
//! project whose `gradlew` is a small shell script.
//!
//! 针对临时项目运行 `sweep-runner` 二进制文件的端到端测试，
//! 该项目的 `gradlew` 是一个小型 shell 脚本。

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

mod common;

use common::*;

fn sweep_runner() -> Command {
    let mut cmd = Command::cargo_bin("sweep-runner").unwrap();
    cmd.arg("--lang").arg("en");
    cmd.env("NO_COLOR", "1")
        .env_remove("JAVA_TOOL_OPTIONS")
        .env_remove("GRADLE_OPTS");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    sweep_runner()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_run_requires_project() {
    sweep_runner()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn test_missing_project_directory_fails() {
    let temp = setup_project();
    sweep_runner()
        .arg("run")
        .arg("--project")
        .arg(temp.path().join("does-not-exist"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn test_missing_wrapper_fails() {
    let temp = setup_project();
    sweep_runner()
        .arg("run")
        .arg("--project")
        .arg(temp.path())
        .arg("--cpu")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build wrapper not found"));
}

#[test]
fn test_zero_cpu_is_rejected() {
    let temp = setup_project();
    sweep_runner()
        .arg("run")
        .arg("--project")
        .arg(temp.path())
        .arg("--cpu")
        .arg("0,2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[cfg(unix)]
mod sweep {
    use super::*;

    /// CPU=1 produces no results file and is skipped with a warning; CPU=2
    /// produces one block. The table ends up with exactly one row.
    ///
    /// CPU=1 没有生成结果文件，被跳过并打印警告；CPU=2 生成一个计时块。
    /// 最终表格恰好有一行。
    #[test]
    fn test_missing_artifact_is_skipped() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1,2")
            .assert()
            .success()
            .stderr(predicate::str::contains("CPU=1 :: "))
            .stderr(predicate::str::contains("not found after test run"))
            .stdout(predicate::str::contains("Sweep Summary"))
            .stdout(predicate::str::contains("1 SKIPPED CONFIGURATION"));

        let csv = fs::read_to_string(temp.path().join("tmp/perf_data.csv")).unwrap();
        assert_eq!(
            csv,
            "vertices,connections,cpu,serial_ms,parallel_ms\n100,200,2,50,20\n"
        );
        assert!(temp.path().join("tmp/results_2cpu.txt").exists());
        assert!(!temp.path().join("tmp/results_1cpu.txt").exists());
    }

    /// A non-zero exit stops the sweep: later CPU counts never run and no
    /// table is written, but earlier snapshots stay.
    ///
    /// 非零退出会停止扫描：之后的 CPU 数量不会运行，也不会写入表格，但先前的快照会保留。
    #[test]
    fn test_failure_aborts_without_table() {
        let temp = setup_project();
        write_wrapper_failing_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1,2,4")
            .assert()
            .failure()
            .stdout(predicate::str::contains("SWEEP ABORTED"))
            .stdout(predicate::str::contains("BUILD FAILED: compilation error"))
            .stderr(predicate::str::contains("exited with status 3"));

        assert!(!temp.path().join("tmp/perf_data.csv").exists());
        assert!(temp.path().join("tmp/results_1cpu.txt").exists());
        assert!(!temp.path().join("tmp/results_4cpu.txt").exists());
        assert_eq!(read_log(temp.path(), "args.log").lines().count(), 2);
    }

    #[test]
    fn test_results_without_blocks_are_skipped() {
        let temp = setup_project();
        write_wrapper_without_blocks(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1")
            .assert()
            .success()
            .stderr(predicate::str::contains("No blocks parsed for CPU=1"));

        let csv = fs::read_to_string(temp.path().join("tmp/perf_data.csv")).unwrap();
        assert_eq!(csv, "vertices,connections,cpu,serial_ms,parallel_ms\n");
        assert!(temp.path().join("tmp/results_1cpu.txt").exists());
    }

    #[test]
    fn test_wrapper_arguments() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("2")
            .arg("--test")
            .arg("org.example.GraphTest")
            .arg("--extra")
            .arg("--info -Pmode=\"fast run\" -Pmsg=it's")
            .assert()
            .success();

        // Quotes reach the wrapper verbatim; the value is split on whitespace only.
        let args = read_log(temp.path(), "args.log");
        assert_eq!(
            args.trim(),
            "clean test --no-daemon --tests org.example.GraphTest --info -Pmode=\"fast run\" -Pmsg=it's"
        );
    }

    #[test]
    fn test_no_clean_skips_clean_step() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("2")
            .arg("--no-clean")
            .assert()
            .success()
            .stdout(predicate::str::contains("Clean step disabled"));

        let args = read_log(temp.path(), "args.log");
        assert_eq!(args.trim(), "test --no-daemon --tests org.itmo.BFSTest");
    }

    /// Inherited JVM options are kept and the CPU-specific flags are appended.
    /// 继承的 JVM 选项被保留，并追加特定于 CPU 的标志。
    #[test]
    fn test_inherited_environment_is_preserved() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .env("JAVA_TOOL_OPTIONS", "-Dinherited.java=yes")
            .env("GRADLE_OPTS", "-Dinherited.gradle=yes")
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1,2")
            .assert()
            .success();

        let env_log = read_log(temp.path(), "env.log");
        let lines: Vec<&str> = env_log.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "JAVA_TOOL_OPTIONS=-Dinherited.java=yes -Xms4g -Xmx4g -XX:+UseG1GC -XX:ParallelGCThreads=1 \
             -XX:ConcGCThreads=1 -XX:+AlwaysPreTouch -Dbfs.threads=1 -Dfile.encoding=UTF-8"
        );
        assert_eq!(lines[1], "GRADLE_OPTS=-Dinherited.gradle=yes -Dbfs.threads=1");
        // CPU=2 starts again from the inherited values, not from CPU=1's.
        assert_eq!(lines[3], "GRADLE_OPTS=-Dinherited.gradle=yes -Dbfs.threads=2");
    }

    #[test]
    fn test_stale_results_are_not_reused() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());
        fs::write(
            temp.path().join("tmp/results.txt"),
            "Times for 999 vertices and 999 connections: Serial: 1 Parallel: 1",
        )
        .unwrap();

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1,2")
            .assert()
            .success();

        let csv = fs::read_to_string(temp.path().join("tmp/perf_data.csv")).unwrap();
        assert!(!csv.contains("999"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_config_file_supplies_defaults() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());
        write_sweep_toml(
            temp.path(),
            r#"
test_filter = "org.example.FromConfig"
cpus = [2]
clean = false
"#,
        );

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Loading configuration from"));

        let args = read_log(temp.path(), "args.log");
        assert_eq!(args.trim(), "test --no-daemon --tests org.example.FromConfig");
    }

    #[cfg(feature = "charts")]
    #[test]
    fn test_plot_writes_both_charts() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("2")
            .arg("--plot")
            .assert()
            .success();

        let scaling = fs::read_to_string(temp.path().join("tmp/plot_parallel_vs_cpu.svg")).unwrap();
        assert!(scaling.contains("<svg"));
        assert!(scaling.contains("V=100, E=200"));
        assert!(
            temp.path()
                .join("tmp/plot_serial_vs_parallel_vs_size.svg")
                .exists()
        );
    }

    #[cfg(feature = "charts")]
    #[test]
    fn test_plot_with_empty_dataset_is_skipped() {
        let temp = setup_project();
        write_wrapper_without_blocks(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("1")
            .arg("--plot")
            .assert()
            .success()
            .stdout(predicate::str::contains("No data, skipping"));

        assert!(!temp.path().join("tmp/plot_parallel_vs_cpu.svg").exists());
    }

    #[cfg(not(feature = "charts"))]
    #[test]
    fn test_plot_without_chart_support_still_succeeds() {
        let temp = setup_project();
        write_wrapper_results_on_cpu_2(temp.path());

        sweep_runner()
            .arg("run")
            .arg("--project")
            .arg(temp.path())
            .arg("--cpu")
            .arg("2")
            .arg("--plot")
            .assert()
            .success()
            .stderr(predicate::str::contains("not available in this build"));

        let csv = fs::read_to_string(temp.path().join("tmp/perf_data.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(!temp.path().join("tmp/plot_parallel_vs_cpu.svg").exists());
        assert!(
            !temp
                .path()
                .join("tmp/plot_serial_vs_parallel_vs_size.svg")
                .exists()
        );
    }
}

mod init {
    use super::*;

    #[test]
    fn test_init_non_interactive_writes_default() {
        let temp = setup_project();
        let output = temp.path().join("Sweep.toml");

        sweep_runner()
            .arg("init")
            .arg("--non-interactive")
            .arg("--output")
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("test_filter = \"org.itmo.BFSTest\""));
        assert!(content.contains("cpus = [1, 2, 4, 6, 8]"));
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let temp = setup_project();
        let output = temp.path().join("Sweep.toml");
        fs::write(&output, "cpus = [3]\n").unwrap();

        sweep_runner()
            .arg("init")
            .arg("--non-interactive")
            .arg("--output")
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("File already exists"))
            .stdout(predicate::str::contains("--force"));

        assert_eq!(fs::read_to_string(&output).unwrap(), "cpus = [3]\n");
    }

    #[test]
    fn test_init_force_overwrites() {
        let temp = setup_project();
        let output = temp.path().join("Sweep.toml");
        fs::write(&output, "cpus = [3]\n").unwrap();

        sweep_runner()
            .arg("init")
            .arg("--non-interactive")
            .arg("--force")
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        assert!(fs::read_to_string(&output).unwrap().contains("[jvm]"));
    }
}
