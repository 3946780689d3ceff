//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the end-of-sweep summary and the details of a hard
//! failure to the console, with colors and internationalization support.
//!
//! 此模块在控制台打印扫描结束摘要和硬失败的详细信息，支持颜色和国际化。

use colored::*;

use crate::core::models::{AbortReason, RunStatus, RunSummary};
use crate::infra::command::{FAILURE_TAIL_LINES, output_tail};
use crate::infra::t;

/// Prints a formatted summary of every configuration that ran.
///
/// 打印每个已运行配置的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Sweep Summary ---
///   - CPU |  Status              | Records |   Duration
///   -   1 |  Collected           |       4 |     12.30s
///   -   2 |  Missing results     |       0 |     11.02s
/// ```
pub fn print_summary(runs: &[RunSummary]) {
    println!("\n{}", t!("report.summary_banner").bold());
    println!(
        "  - {:>3} |  {:<20} | {:>7} | {:>10}",
        t!("report.column_cpu"),
        t!("report.column_status"),
        t!("report.column_records"),
        t!("report.column_duration")
    );

    for run in runs {
        let label = run.status.label();
        let status_colored = match run.status {
            RunStatus::Collected => label.green(),
            RunStatus::MissingArtifact | RunStatus::NoRecords => label.yellow(),
        };
        println!(
            "  - {:>3} |  {:<20} | {:>7} | {:>9.2}s",
            run.cpu,
            status_colored,
            run.record_count,
            run.duration.as_secs_f64()
        );
    }
}

/// Prints why the sweep stopped at `cpu`, including the tail of the
/// collaborator's output when there is one.
///
/// 打印扫描在 `cpu` 处停止的原因，如果有协作进程输出则包括其末尾部分。
pub fn print_abort_details(cpu: u32, reason: &AbortReason) {
    println!("\n{}", t!("report.abort_banner").red().bold());
    println!("{}", "-".repeat(80));

    match reason {
        AbortReason::CollaboratorFailed { code, output } => {
            let code = code
                .map(|c| c.to_string())
                .unwrap_or_else(|| t!("report.killed_by_signal").to_string());
            println!(
                "{}",
                t!("report.abort_exit_status", cpu = cpu, code = code).red()
            );
            if !output.trim().is_empty() {
                println!(
                    "\n--- {} ---\n",
                    t!("report.output_tail", lines = FAILURE_TAIL_LINES).yellow()
                );
                println!("{}", output_tail(output, FAILURE_TAIL_LINES));
            }
        }
        AbortReason::Interrupted => {
            println!("{}", t!("report.abort_interrupted", cpu = cpu).yellow());
        }
    }

    println!("{}", "-".repeat(80));
    println!("{}", t!("report.no_table_written").yellow());
}
