//! # File System Operations Module / 文件系统操作模块
//!
//! This module owns the fixed file layout under the target project's `tmp`
//! directory and the file operations the sweep performs on it: clearing a
//! stale results file, snapshotting a fresh one, and writing the final
//! table atomically.
//!
//! 此模块管理目标项目 `tmp` 目录下的固定文件布局，以及扫描对其执行的文件操作：
//! 清除过期的结果文件、为新结果文件创建快照，以及原子地写入最终表格。

use anyhow::{Context, Result};
use fs_extra::file::{CopyOptions, copy};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::infra::t;

pub const TMP_DIR_NAME: &str = "tmp";
pub const RESULTS_FILE_NAME: &str = "results.txt";
pub const TABLE_FILE_NAME: &str = "perf_data.csv";
pub const SCALING_CHART_FILE_NAME: &str = "plot_parallel_vs_cpu.svg";
pub const SIZE_CHART_FILE_NAME: &str = "plot_serial_vs_parallel_vs_size.svg";

/// Paths of every file the sweep reads or writes inside a project.
/// 扫描在项目内读取或写入的每个文件的路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    tmp_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: PathBuf) -> Self {
        let tmp_dir = root.join(TMP_DIR_NAME);
        Self { root, tmp_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// The file the collaborator is expected to write on every run.
    /// 协作进程每次运行时预期写入的文件。
    pub fn raw_results(&self) -> PathBuf {
        self.tmp_dir.join(RESULTS_FILE_NAME)
    }

    pub fn snapshot_for(&self, cpu: u32) -> PathBuf {
        self.tmp_dir.join(format!("results_{cpu}cpu.txt"))
    }

    pub fn table(&self) -> PathBuf {
        self.tmp_dir.join(TABLE_FILE_NAME)
    }

    pub fn scaling_chart(&self) -> PathBuf {
        self.tmp_dir.join(SCALING_CHART_FILE_NAME)
    }

    pub fn size_chart(&self) -> PathBuf {
        self.tmp_dir.join(SIZE_CHART_FILE_NAME)
    }

    pub fn ensure_tmp_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.tmp_dir).with_context(|| {
            t!("fs.create_tmp_failed", path = self.tmp_dir.display()).to_string()
        })
    }

    /// Removes a results file left over from an earlier run, so that its
    /// absence after the next run can only mean the run produced nothing.
    ///
    /// 删除先前运行遗留的结果文件，使下一次运行后文件缺失只可能意味着该次运行没有产出。
    pub fn clear_stale_results(&self) -> Result<bool> {
        let path = self.raw_results();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| t!("fs.remove_stale_failed", path = path.display()).to_string())?;
        Ok(true)
    }

    /// Copies the raw results file to the per-CPU snapshot path, overwriting
    /// any snapshot from an earlier sweep.
    ///
    /// 将原始结果文件复制到每个 CPU 的快照路径，覆盖先前扫描的快照。
    pub fn snapshot_results(&self, cpu: u32) -> Result<PathBuf> {
        let from = self.raw_results();
        let to = self.snapshot_for(cpu);
        let mut options = CopyOptions::new();
        options.overwrite = true;
        copy(&from, &to, &options).with_context(|| {
            t!("fs.snapshot_failed", from = from.display(), to = to.display()).to_string()
        })?;
        Ok(to)
    }
}

/// Writes `contents` to a temporary file next to `path`, then renames it
/// into place. Readers never observe a half-written file.
///
/// 将 `contents` 写入 `path` 旁边的临时文件，然后重命名到目标位置。
/// 读取者永远不会看到写了一半的文件。
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::Builder::new()
        .prefix(".sweep_runner_")
        .tempfile_in(dir)
        .with_context(|| t!("fs.write_failed", path = path.display()).to_string())?;
    file.write_all(contents.as_bytes())
        .with_context(|| t!("fs.write_failed", path = path.display()).to_string())?;
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| t!("fs.write_failed", path = path.display()).to_string())?;
    Ok(())
}

/// Expands `~` and environment variables in a user-supplied project path and
/// resolves it to an absolute path. The directory must exist.
///
/// 展开用户提供的项目路径中的 `~` 和环境变量，并将其解析为绝对路径。该目录必须存在。
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| t!("fs.expand_failed", path = raw).to_string())?;
    let resolved = fs::canonicalize(expanded.as_ref())
        .with_context(|| t!("fs.project_not_found", path = path.display()).to_string())?;
    if !resolved.is_dir() {
        anyhow::bail!("{}", t!("fs.project_not_dir", path = resolved.display()));
    }
    Ok(resolved)
}
