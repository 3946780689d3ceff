//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures that flow through a sweep:
//! parsed measurements, cpu-tagged records, and the outcome of running the
//! collaborator for a single configuration.
//!
//! 此模块定义了贯穿整个扫描过程的数据结构：
//! 解析出的测量值、带 CPU 标记的记录，以及单个配置运行的结果。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::infra::t;

/// A single timing block scraped from a results file, before it is tagged
/// with the configuration that produced it.
/// 从结果文件中抓取的单个计时块，尚未标记产生它的配置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub vertices: u64,
    pub connections: u64,
    pub serial_ms: u64,
    pub parallel_ms: u64,
}

/// A measurement tagged with the CPU count active when it was parsed.
/// This is one row of the aggregated table.
///
/// 标记了解析时 CPU 数量的测量值。
/// 这是汇总表中的一行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub vertices: u64,
    pub connections: u64,
    pub cpu: u32,
    pub serial_ms: u64,
    pub parallel_ms: u64,
}

impl MeasurementRecord {
    pub fn new(measurement: Measurement, cpu: u32) -> Self {
        Self {
            vertices: measurement.vertices,
            connections: measurement.connections,
            cpu,
            serial_ms: measurement.serial_ms,
            parallel_ms: measurement.parallel_ms,
        }
    }

    /// Ordering key of the persisted table: (vertices, connections, cpu).
    /// 持久化表的排序键：(vertices, connections, cpu)。
    pub fn sort_key(&self) -> (u64, u64, u32) {
        (self.vertices, self.connections, self.cpu)
    }
}

/// Why a configuration contributed no records while the sweep carries on.
/// 某个配置没有贡献记录但扫描继续进行的原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The collaborator exited cleanly but never wrote the results file.
    /// 协作进程正常退出，但从未写入结果文件。
    MissingArtifact { path: PathBuf },
    /// The results file was produced but holds no recognizable block.
    /// 结果文件已生成，但不包含可识别的计时块。
    NoRecords { snapshot: PathBuf },
}

/// Why the whole sweep stops at this configuration.
/// 整个扫描在此配置处停止的原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// Non-zero exit status. `code` is `None` when the process was killed by a signal.
    /// 非零退出状态。当进程被信号终止时 `code` 为 `None`。
    CollaboratorFailed { code: Option<i32>, output: String },
    /// The operator pressed Ctrl-C while the collaborator was running.
    /// 协作进程运行期间操作员按下了 Ctrl-C。
    Interrupted,
}

/// The result of running the collaborator once for one CPU count.
///
/// `Skipped` is a soft failure and the sweep moves on; `Aborted` is a hard
/// failure and nothing after it runs.
///
/// 为一个 CPU 数量运行一次协作进程的结果。
///
/// `Skipped` 是软失败，扫描继续；`Aborted` 是硬失败，之后的配置都不会运行。
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Collected {
        cpu: u32,
        records: Vec<MeasurementRecord>,
        snapshot: PathBuf,
        duration: Duration,
    },
    Skipped {
        cpu: u32,
        reason: SkipReason,
        duration: Duration,
    },
    Aborted {
        cpu: u32,
        reason: AbortReason,
        duration: Duration,
    },
}

impl RunOutcome {
    pub fn cpu(&self) -> u32 {
        match self {
            RunOutcome::Collected { cpu, .. }
            | RunOutcome::Skipped { cpu, .. }
            | RunOutcome::Aborted { cpu, .. } => *cpu,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            RunOutcome::Collected { duration, .. }
            | RunOutcome::Skipped { duration, .. }
            | RunOutcome::Aborted { duration, .. } => *duration,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }
}

/// The status column of the end-of-sweep summary.
/// 扫描结束摘要中的状态列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Collected,
    MissingArtifact,
    NoRecords,
}

impl RunStatus {
    pub fn label(&self) -> String {
        match self {
            RunStatus::Collected => t!("report.status_collected").to_string(),
            RunStatus::MissingArtifact => t!("report.status_missing_artifact").to_string(),
            RunStatus::NoRecords => t!("report.status_no_records").to_string(),
        }
    }
}

/// One row of the end-of-sweep summary.
/// 扫描结束摘要中的一行。
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cpu: u32,
    pub status: RunStatus,
    pub record_count: usize,
    pub duration: Duration,
}

/// Error carried out of the sweep when a configuration hits a hard failure.
/// 当某个配置遇到硬失败时从扫描中返回的错误。
#[derive(Debug, Clone)]
pub struct SweepAborted {
    pub cpu: u32,
    pub reason: AbortReason,
}

impl fmt::Display for SweepAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            AbortReason::CollaboratorFailed { code: Some(code), .. } => write!(
                f,
                "{}",
                t!("sweep.aborted_exit_code", cpu = self.cpu, code = code)
            ),
            AbortReason::CollaboratorFailed { code: None, .. } => {
                write!(f, "{}", t!("sweep.aborted_signal", cpu = self.cpu))
            }
            AbortReason::Interrupted => {
                write!(f, "{}", t!("sweep.aborted_interrupted", cpu = self.cpu))
            }
        }
    }
}

impl std::error::Error for SweepAborted {}
