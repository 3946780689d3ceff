//! # Run Driver Module / 运行驱动模块
//!
//! Runs the collaborator once for a single CPU count and turns what happened
//! into a [`RunOutcome`]:
//!
//! 1. remove a stale results file
//! 2. invoke the collaborator and wait for it
//! 3. look for a fresh results file
//! 4. snapshot it to `tmp/results_<cpu>cpu.txt`
//! 5. parse it and tag the measurements with the CPU count
//!
//! 为单个 CPU 数量运行一次协作进程，并将结果转换为 [`RunOutcome`]：
//! 删除过期结果文件、调用并等待协作进程、查找新的结果文件、
//! 创建快照、解析并用 CPU 数量标记测量值。

use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::core::config::SweepPlan;
use crate::core::environment::{InheritedEnv, Invocation};
use crate::core::models::{AbortReason, MeasurementRecord, RunOutcome, SkipReason};
use crate::core::parser::parse_results_file;
use crate::infra::{command, t};

/// How a collaborator invocation ended.
/// 协作进程调用的结束方式。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStatus {
    Succeeded,
    Failed { code: Option<i32>, output: String },
    Interrupted,
}

/// The external build/test process the sweep drives.
///
/// An `Err` means the collaborator could not be started at all; a started
/// process that exits non-zero is `Ok(InvocationStatus::Failed { .. })`.
///
/// 扫描所驱动的外部构建/测试进程。
///
/// `Err` 表示协作进程根本无法启动；已启动但以非零状态退出的进程返回
/// `Ok(InvocationStatus::Failed { .. })`。
#[allow(async_fn_in_trait)]
pub trait Collaborator {
    async fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationStatus>;
}

/// Runs the wrapper script as a child process.
/// 将包装脚本作为子进程运行。
#[derive(Debug, Clone)]
pub struct ProcessCollaborator {
    stop_token: CancellationToken,
    echo_output: bool,
}

impl ProcessCollaborator {
    pub fn new(stop_token: CancellationToken) -> Self {
        Self {
            stop_token,
            echo_output: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.echo_output = false;
        self
    }
}

impl Collaborator for ProcessCollaborator {
    async fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationStatus> {
        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&invocation.working_dir)
            .kill_on_drop(true);

        tokio::select! {
            biased;
            _ = self.stop_token.cancelled() => Ok(InvocationStatus::Interrupted),
            (status_res, output) = command::spawn_and_stream(cmd, self.echo_output) => {
                let status = status_res.with_context(|| {
                    t!("run.spawn_failed", program = invocation.program.display()).to_string()
                })?;
                if status.success() {
                    Ok(InvocationStatus::Succeeded)
                } else {
                    Ok(InvocationStatus::Failed { code: status.code(), output })
                }
            }
        }
    }
}

/// Runs one configuration of the sweep.
///
/// Only I/O failures around the results file and malformed numbers in it
/// come back as `Err`; collaborator failures are reported as
/// [`RunOutcome::Aborted`] so the sweep loop decides what to do with them.
///
/// 运行扫描的一个配置。
///
/// 只有结果文件相关的 I/O 失败和其中格式错误的数字会以 `Err` 返回；
/// 协作进程失败以 [`RunOutcome::Aborted`] 报告，由扫描循环决定如何处理。
pub async fn run_configuration<C: Collaborator>(
    collaborator: &mut C,
    plan: &SweepPlan,
    inherited: &InheritedEnv,
    cpu: u32,
) -> Result<RunOutcome> {
    let layout = &plan.layout;
    if layout.clear_stale_results()? {
        println!(
            "{}",
            t!("run.removed_stale", path = layout.raw_results().display()).dimmed()
        );
    }

    let invocation = plan.invocation_for(cpu, inherited);
    println!(
        "{}",
        t!("run.invoking", cpu = cpu, command = invocation.display_command()).blue()
    );

    let start_time = Instant::now();
    let status = collaborator.invoke(&invocation).await?;
    let duration = start_time.elapsed();

    match status {
        InvocationStatus::Succeeded => {}
        InvocationStatus::Failed { code, output } => {
            println!(
                "{}",
                t!("run.invocation_failed", cpu = cpu, duration = format!("{:.1}", duration.as_secs_f64())).red()
            );
            return Ok(RunOutcome::Aborted {
                cpu,
                reason: AbortReason::CollaboratorFailed { code, output },
                duration,
            });
        }
        InvocationStatus::Interrupted => {
            return Ok(RunOutcome::Aborted {
                cpu,
                reason: AbortReason::Interrupted,
                duration,
            });
        }
    }

    println!(
        "{}",
        t!("run.invocation_finished", cpu = cpu, duration = format!("{:.1}", duration.as_secs_f64())).green()
    );

    let raw_results = layout.raw_results();
    if !raw_results.exists() {
        return Ok(RunOutcome::Skipped {
            cpu,
            reason: SkipReason::MissingArtifact { path: raw_results },
            duration,
        });
    }

    let snapshot = layout.snapshot_results(cpu)?;
    println!("{}", t!("run.snapshot_saved", path = snapshot.display()).dimmed());

    let measurements = parse_results_file(&snapshot)?;
    if measurements.is_empty() {
        return Ok(RunOutcome::Skipped {
            cpu,
            reason: SkipReason::NoRecords { snapshot },
            duration,
        });
    }

    let records = measurements
        .into_iter()
        .map(|m| MeasurementRecord::new(m, cpu))
        .collect();

    Ok(RunOutcome::Collected {
        cpu,
        records,
        snapshot,
        duration,
    })
}
