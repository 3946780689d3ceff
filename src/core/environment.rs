//! # Invocation Environment Module / 调用环境模块
//!
//! Builds the command line and environment for one collaborator run.
//! The inherited `JAVA_TOOL_OPTIONS` and `GRADLE_OPTS` are captured once at
//! start-up; every invocation derives a fresh, immutable [`Invocation`] from
//! that snapshot, so nothing carries over between CPU counts and the runner's
//! own process environment is never modified.
//!
//! 构建一次协作进程运行的命令行和环境变量。
//! 继承的 `JAVA_TOOL_OPTIONS` 和 `GRADLE_OPTS` 在启动时捕获一次；
//! 每次调用都从该快照派生一个全新的、不可变的 [`Invocation`]，
//! 因此不同 CPU 数量之间不会相互影响，运行器自身的进程环境也不会被修改。

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const JAVA_TOOL_OPTIONS: &str = "JAVA_TOOL_OPTIONS";
pub const GRADLE_OPTS: &str = "GRADLE_OPTS";

/// Snapshot of the environment variables the runner appends to.
/// 运行器追加内容的环境变量快照。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritedEnv {
    pub java_tool_options: Option<String>,
    pub gradle_opts: Option<String>,
}

impl InheritedEnv {
    /// Captures the current process values. Non-UTF-8 values are treated as unset.
    /// 捕获当前进程的值。非 UTF-8 值视为未设置。
    pub fn capture() -> Self {
        Self {
            java_tool_options: env::var(JAVA_TOOL_OPTIONS).ok(),
            gradle_opts: env::var(GRADLE_OPTS).ok(),
        }
    }

    /// The two variables for `cpu`, each appended to its inherited value.
    /// 针对 `cpu` 的两个变量，各自追加到其继承值之后。
    pub fn for_cpu(&self, cpu: u32, jvm: &JvmProfile) -> Vec<(String, String)> {
        let property = jvm.cpu_property(cpu);
        vec![
            (
                JAVA_TOOL_OPTIONS.to_string(),
                append_flags(self.java_tool_options.as_deref(), &jvm.tool_options(cpu)),
            ),
            (
                GRADLE_OPTS.to_string(),
                append_flags(self.gradle_opts.as_deref(), &property),
            ),
        ]
    }
}

fn append_flags(inherited: Option<&str>, flags: &str) -> String {
    format!("{} {}", inherited.unwrap_or(""), flags)
        .trim()
        .to_string()
}

/// JVM tuning applied to every collaborator run.
/// 应用于每次协作进程运行的 JVM 调优参数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JvmProfile {
    /// System property that carries the CPU count, e.g. `bfs.threads`.
    /// 携带 CPU 数量的系统属性，例如 `bfs.threads`。
    pub thread_property: String,
    /// Used for both `-Xms` and `-Xmx`.
    /// 同时用于 `-Xms` 和 `-Xmx`。
    pub heap: String,
    /// GC and pre-touch flags placed between the heap flags and the CPU property.
    pub gc_flags: Vec<String>,
    /// Flags placed after the CPU property.
    pub extra_flags: Vec<String>,
}

impl Default for JvmProfile {
    fn default() -> Self {
        Self {
            thread_property: "bfs.threads".to_string(),
            heap: "4g".to_string(),
            gc_flags: vec![
                "-XX:+UseG1GC".to_string(),
                "-XX:ParallelGCThreads=1".to_string(),
                "-XX:ConcGCThreads=1".to_string(),
                "-XX:+AlwaysPreTouch".to_string(),
            ],
            extra_flags: vec!["-Dfile.encoding=UTF-8".to_string()],
        }
    }
}

impl JvmProfile {
    pub fn cpu_property(&self, cpu: u32) -> String {
        format!("-D{}={}", self.thread_property, cpu)
    }

    /// The full `JAVA_TOOL_OPTIONS` fragment for `cpu`.
    pub fn tool_options(&self, cpu: u32) -> String {
        let mut parts = vec![format!("-Xms{}", self.heap), format!("-Xmx{}", self.heap)];
        parts.extend(self.gc_flags.iter().cloned());
        parts.push(self.cpu_property(cpu));
        parts.extend(self.extra_flags.iter().cloned());
        parts.join(" ")
    }
}

/// Everything needed to launch the collaborator once.
/// 启动一次协作进程所需的全部信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub cpu: u32,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Human-readable command line for logs.
    /// 用于日志的可读命令行。
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
