//! # Command Execution Module / 命令执行模块
//!
//! Spawns the collaborator process, echoes its stdout and stderr to the
//! console line by line while it runs, and keeps a combined copy of the
//! output for failure reports.
//!
//! 派生协作进程，在其运行时逐行将 stdout 和 stderr 回显到控制台，
//! 并保留合并后的输出副本用于失败报告。

use colored::*;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

use crate::infra::t;

/// Number of trailing output lines kept in failure details.
/// 失败详情中保留的末尾输出行数。
pub const FAILURE_TAIL_LINES: usize = 50;

/// Spawns `cmd`, streams its output to the console, and waits for it to exit.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `echo` - Whether to print each output line as it arrives.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生 `cmd`，将其输出流式输出到控制台，并等待其退出。
///
/// # Returns
/// 一个元组，包含：
/// - 进程的 `ExitStatus`（包装在 `io::Result` 中）。
/// - 合并的 stdout 和 stderr，为一个 `String`。
pub async fn spawn_and_stream(
    mut cmd: tokio::process::Command,
    echo: bool,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stdout_failed").to_string())),
                String::new(),
            );
        }
    };
    let stderr = match child.stderr.take() {
        Some(stderr) => stderr,
        None => {
            return (
                Err(std::io::Error::other(t!("command.capture_stderr_failed").to_string())),
                String::new(),
            );
        }
    };

    // Both pipes append to the same buffer so interleaving roughly follows arrival order.
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));
    let stdout_handle = pump_lines(stdout, Arc::clone(&output), echo);
    let stderr_handle = pump_lines(stderr, Arc::clone(&output), echo);

    let status = child.wait().await;

    if let Err(e) = stdout_handle.await {
        eprintln!("{}", t!("command.join_failed", stream = "stdout", error = e).yellow());
    }
    if let Err(e) = stderr_handle.await {
        eprintln!("{}", t!("command.join_failed", stream = "stderr", error = e).yellow());
    }

    let combined = output.lock().await.clone();
    (status, combined)
}

fn pump_lines<R>(
    reader: R,
    sink: Arc<tokio::sync::Mutex<String>>,
    echo: bool,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if echo {
                println!("  {} {}", "│".dimmed(), line);
            }
            let mut output = sink.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    })
}

/// The last `max_lines` lines of `output`.
/// `output` 的最后 `max_lines` 行。
pub fn output_tail(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
