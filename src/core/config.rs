//! # Configuration Module / 配置模块
//!
//! Loads the optional `Sweep.toml` file and merges it with command-line
//! overrides into a fully resolved [`SweepPlan`]. Precedence is
//! command line, then config file, then built-in defaults.
//!
//! 加载可选的 `Sweep.toml` 文件，并将其与命令行覆盖项合并为完全解析的
//! [`SweepPlan`]。优先级依次为：命令行、配置文件、内置默认值。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::environment::{InheritedEnv, Invocation, JvmProfile};
use crate::infra::fs::ProjectLayout;
use crate::infra::t;

/// File name looked up in the project root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Sweep.toml";
pub const DEFAULT_TEST_FILTER: &str = "org.itmo.BFSTest";
pub const DEFAULT_CPUS: &str = "1,2,4,6,8";

/// Name of the build wrapper script in the project root.
/// 项目根目录中构建包装脚本的名称。
pub fn default_wrapper() -> String {
    if cfg!(windows) {
        "gradlew.bat".to_string()
    } else {
        "gradlew".to_string()
    }
}

/// The contents of a `Sweep.toml` file. Every field is optional in the file.
/// `Sweep.toml` 文件的内容。文件中的每个字段都是可选的。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Value passed to `--tests`.
    pub test_filter: String,
    pub cpus: Vec<u32>,
    /// Run `clean` before `test` for every CPU count.
    /// 每个 CPU 数量运行前是否先执行 `clean`。
    pub clean: bool,
    pub plot: bool,
    pub extra_args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,
    pub jvm: JvmProfile,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            language: None,
            test_filter: DEFAULT_TEST_FILTER.to_string(),
            cpus: vec![1, 2, 4, 6, 8],
            clean: true,
            plot: false,
            extra_args: vec![],
            wrapper: None,
            jvm: JvmProfile::default(),
        }
    }
}

/// Parses a `Sweep.toml` file.
/// 解析 `Sweep.toml` 文件。
pub fn load_sweep_config(path: &Path) -> Result<SweepConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    toml::from_str(&content)
        .with_context(|| t!("config.parse_failed", path = path.display()).to_string())
}

/// Picks the config file to load: the explicit one if given, otherwise
/// `Sweep.toml` in the project root when it exists.
///
/// 选择要加载的配置文件：如果显式指定则使用指定文件，
/// 否则在项目根目录中存在 `Sweep.toml` 时使用它。
pub fn resolve_config_path(explicit: Option<&Path>, project_root: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let candidate = project_root.join(DEFAULT_CONFIG_FILE);
            candidate.is_file().then_some(candidate)
        }
    }
}

/// Parses a comma-separated CPU list such as `1,2,4`. Empty entries are
/// ignored; zero and non-integers are rejected.
///
/// 解析以逗号分隔的 CPU 列表，例如 `1,2,4`。空项会被忽略；零和非整数会被拒绝。
pub fn parse_cpu_list(raw: &str) -> Result<Vec<u32>> {
    let mut cpus = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let cpu: u32 = item
            .parse()
            .with_context(|| t!("config.invalid_cpu", value = item).to_string())?;
        if cpu == 0 {
            bail!("{}", t!("config.zero_cpu"));
        }
        cpus.push(cpu);
    }
    Ok(cpus)
}

/// Splits the passthrough argument string on whitespace. Quotes and
/// backslashes are passed through untouched.
/// 按空白拆分透传参数字符串。引号和反斜杠原样保留。
pub fn parse_extra_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Settings given on the command line. `None` / `false` defer to the config file.
/// 命令行上给出的设置。`None` / `false` 表示使用配置文件中的值。
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub test_filter: Option<String>,
    pub cpus: Option<Vec<u32>>,
    pub no_clean: bool,
    pub plot: bool,
    pub extra_args: Option<Vec<String>>,
}

/// The fully resolved settings of one sweep.
/// 一次扫描的完全解析后的设置。
#[derive(Debug, Clone)]
pub struct SweepPlan {
    pub layout: ProjectLayout,
    pub wrapper: String,
    pub test_filter: String,
    pub cpus: Vec<u32>,
    pub clean: bool,
    pub plot: bool,
    pub extra_args: Vec<String>,
    pub jvm: JvmProfile,
}

impl SweepPlan {
    pub fn resolve(project_root: PathBuf, config: SweepConfig, overrides: RunOverrides) -> Result<Self> {
        let cpus = overrides.cpus.unwrap_or(config.cpus);
        if cpus.is_empty() {
            bail!("{}", t!("config.empty_cpu_list"));
        }
        if cpus.contains(&0) {
            bail!("{}", t!("config.zero_cpu"));
        }

        Ok(Self {
            layout: ProjectLayout::new(project_root),
            wrapper: config.wrapper.unwrap_or_else(default_wrapper),
            test_filter: overrides.test_filter.unwrap_or(config.test_filter),
            cpus,
            clean: config.clean && !overrides.no_clean,
            plot: config.plot || overrides.plot,
            extra_args: overrides.extra_args.unwrap_or(config.extra_args),
            jvm: config.jvm,
        })
    }

    /// Arguments passed to the wrapper script, without the program itself.
    /// 传递给包装脚本的参数，不包括程序本身。
    pub fn wrapper_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.clean {
            args.push("clean".to_string());
        }
        args.extend(
            ["test", "--no-daemon", "--tests"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.push(self.test_filter.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    pub fn invocation_for(&self, cpu: u32, inherited: &InheritedEnv) -> Invocation {
        Invocation {
            cpu,
            program: self.layout.root().join(&self.wrapper),
            args: self.wrapper_args(),
            working_dir: self.layout.root().to_path_buf(),
            env: inherited.for_cpu(cpu, &self.jvm),
        }
    }
}
