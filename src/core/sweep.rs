//! # Sweep Module / 扫描模块
//!
//! The control loop over all requested CPU counts. This is the single place
//! where the failure policy lives: a skipped configuration prints a warning
//! and the loop moves on, an aborted one stops the sweep with a
//! [`SweepAborted`] error before anything is persisted.
//!
//! 遍历所有请求的 CPU 数量的控制循环。这是失败策略所在的唯一位置：
//! 被跳过的配置打印警告并继续循环，被中止的配置在持久化任何内容之前以
//! [`SweepAborted`] 错误停止扫描。

use anyhow::Result;
use colored::*;

use crate::core::config::SweepPlan;
use crate::core::dataset::Dataset;
use crate::core::driver::{Collaborator, run_configuration};
use crate::core::environment::InheritedEnv;
use crate::core::models::{RunOutcome, RunStatus, RunSummary, SkipReason, SweepAborted};
use crate::infra::t;
use crate::reporting::console::print_abort_details;

/// Everything a completed sweep produced.
/// 一次完成的扫描所产生的全部内容。
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub dataset: Dataset,
    pub runs: Vec<RunSummary>,
}

impl SweepReport {
    pub fn skipped_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| r.status != RunStatus::Collected)
            .count()
    }
}

/// Runs every CPU count of `plan` in order.
///
/// Returns `Err` carrying [`SweepAborted`] as soon as one configuration hits
/// a hard failure; later configurations are not attempted.
///
/// 按顺序运行 `plan` 中的每个 CPU 数量。
///
/// 一旦某个配置遇到硬失败，立即返回携带 [`SweepAborted`] 的 `Err`；
/// 之后的配置不会被尝试。
pub async fn run_sweep<C: Collaborator>(
    collaborator: &mut C,
    plan: &SweepPlan,
    inherited: &InheritedEnv,
) -> Result<SweepReport> {
    let mut report = SweepReport::default();
    let total = plan.cpus.len();

    for (index, &cpu) in plan.cpus.iter().enumerate() {
        println!(
            "\n{}",
            t!("sweep.configuration_header", index = index + 1, total = total, cpu = cpu).bold()
        );

        match run_configuration(collaborator, plan, inherited, cpu).await? {
            RunOutcome::Collected {
                cpu,
                records,
                duration,
                ..
            } => {
                println!(
                    "{}",
                    t!("sweep.records_collected", cpu = cpu, count = records.len()).green()
                );
                report.runs.push(RunSummary {
                    cpu,
                    status: RunStatus::Collected,
                    record_count: records.len(),
                    duration,
                });
                report.dataset.extend(records);
            }
            RunOutcome::Skipped {
                cpu,
                reason,
                duration,
            } => {
                let status = match &reason {
                    SkipReason::MissingArtifact { path } => {
                        eprintln!(
                            "{}",
                            t!("sweep.warn_missing_artifact", cpu = cpu, path = path.display()).yellow()
                        );
                        RunStatus::MissingArtifact
                    }
                    SkipReason::NoRecords { snapshot } => {
                        eprintln!(
                            "{}",
                            t!("sweep.warn_no_records", cpu = cpu, path = snapshot.display()).yellow()
                        );
                        RunStatus::NoRecords
                    }
                };
                report.runs.push(RunSummary {
                    cpu,
                    status,
                    record_count: 0,
                    duration,
                });
            }
            RunOutcome::Aborted { cpu, reason, .. } => {
                print_abort_details(cpu, &reason);
                return Err(SweepAborted { cpu, reason }.into());
            }
        }
    }

    Ok(report)
}
