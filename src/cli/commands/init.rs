//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a starter
//! `Sweep.toml`. Without `--non-interactive` a short wizard asks for the
//! test filter, the CPU list and the default flags.
//!
//! 此模块实现 `init` 命令，用于写出初始的 `Sweep.toml`。
//! 未指定 `--non-interactive` 时，一个简短的向导会询问测试过滤器、CPU 列表和默认标志。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{
    DEFAULT_CPUS, DEFAULT_TEST_FILTER, SweepConfig, parse_cpu_list, parse_extra_args,
};
use crate::infra::t;

pub const DEFAULT_CONFIG: &str = r#"# Sweep Runner configuration / Sweep Runner 配置
# Every key is optional; command-line flags override these values.
# 每个键都是可选的；命令行参数会覆盖这些值。

# Language for console messages ("en", "zh-CN") / 控制台消息的语言
# language = "en"

# Passed to `gradlew test --tests <filter>` / 传递给 `--tests` 的过滤器
test_filter = "org.itmo.BFSTest"

# CPU counts to sweep, in order / 按顺序扫描的 CPU 数量
cpus = [1, 2, 4, 6, 8]

# Run `clean` before every test run / 每次测试前执行 `clean`
clean = true

# Render SVG charts after the sweep / 扫描结束后渲染 SVG 图表
plot = false

# Extra arguments appended to the Gradle command line / 追加到 Gradle 命令行的额外参数
extra_args = []

# Wrapper script in the project root (default: gradlew, gradlew.bat on Windows)
# 项目根目录中的包装脚本（默认：gradlew，Windows 上为 gradlew.bat）
# wrapper = "gradlew"

# JVM settings sent through JAVA_TOOL_OPTIONS / 通过 JAVA_TOOL_OPTIONS 传递的 JVM 设置
[jvm]
thread_property = "bfs.threads"
heap = "4g"
gc_flags = ["-XX:+UseG1GC", "-XX:ParallelGCThreads=1", "-XX:ConcGCThreads=1", "-XX:+AlwaysPreTouch"]
extra_flags = ["-Dfile.encoding=UTF-8"]
"#;

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file without asking
/// * `non_interactive` - Write the commented default instead of running the wizard
///
/// 执行 init 命令。
pub fn execute(output: &Path, force: bool, non_interactive: bool) -> Result<()> {
    let theme = ColorfulTheme::default();

    if output.exists() && !force {
        if non_interactive {
            println!("{}", t!("init.file_exists", path = output.display()).red());
            println!("{}", t!("init.use_force").yellow());
            return Ok(());
        }
        let overwrite = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", path = output.display()).to_string())
            .default(false)
            .interact()
            .context(t!("init.confirmation_failed").to_string())?;
        if !overwrite {
            println!("{}", t!("init.aborted"));
            return Ok(());
        }
    }

    let contents = if non_interactive {
        DEFAULT_CONFIG.to_string()
    } else {
        println!("\n{}", t!("init.wizard_welcome").cyan().bold());
        let config = run_wizard(&theme)?;
        toml::to_string_pretty(&config).context(t!("init.serialize_failed").to_string())?
    };

    write_config(output, &contents)
}

fn run_wizard(theme: &ColorfulTheme) -> Result<SweepConfig> {
    let test_filter: String = Input::with_theme(theme)
        .with_prompt(t!("init.prompt_test_filter").to_string())
        .default(DEFAULT_TEST_FILTER.to_string())
        .interact_text()
        .context(t!("init.confirmation_failed").to_string())?;

    let cpus: String = Input::with_theme(theme)
        .with_prompt(t!("init.prompt_cpus").to_string())
        .default(DEFAULT_CPUS.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            match parse_cpu_list(input) {
                Ok(cpus) if !cpus.is_empty() => Ok(()),
                Ok(_) => Err(t!("config.empty_cpu_list").to_string()),
                Err(e) => Err(format!("{e:#}")),
            }
        })
        .interact_text()
        .context(t!("init.confirmation_failed").to_string())?;

    let clean = Confirm::with_theme(theme)
        .with_prompt(t!("init.prompt_clean").to_string())
        .default(true)
        .interact()
        .context(t!("init.confirmation_failed").to_string())?;

    let plot = Confirm::with_theme(theme)
        .with_prompt(t!("init.prompt_plot").to_string())
        .default(false)
        .interact()
        .context(t!("init.confirmation_failed").to_string())?;

    let extra: String = Input::with_theme(theme)
        .with_prompt(t!("init.prompt_extra").to_string())
        .allow_empty(true)
        .interact_text()
        .context(t!("init.confirmation_failed").to_string())?;

    Ok(SweepConfig {
        language: Some(rust_i18n::locale().to_string()),
        test_filter,
        cpus: parse_cpu_list(&cpus)?,
        clean,
        plot,
        extra_args: parse_extra_args(&extra),
        ..SweepConfig::default()
    })
}

fn write_config(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;
    }
    fs::write(path, contents)
        .with_context(|| t!("init.write_failed", path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success_created", path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint"));
    Ok(())
}
