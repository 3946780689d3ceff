//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it resolves the sweep settings,
//! drives the collaborator once per CPU count, writes `tmp/perf_data.csv`
//! and, when asked, renders the charts.
//!
//! 此模块实现 `run` 命令：解析扫描设置，针对每个 CPU 数量驱动一次协作进程，
//! 写出 `tmp/perf_data.csv`，并在需要时渲染图表。

use anyhow::{Result, bail};
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{
            self, RunOverrides, SweepConfig, SweepPlan, parse_cpu_list, parse_extra_args,
        },
        driver::ProcessCollaborator,
        environment::InheritedEnv,
        sweep::run_sweep,
    },
    infra::{fs::absolute_path, t},
    reporting::{charts::render_charts, console::print_summary},
};

/// Raw `run` arguments as given on the command line.
/// 命令行上给出的原始 `run` 参数。
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub project: PathBuf,
    pub config: Option<PathBuf>,
    pub test: Option<String>,
    pub cpu: Option<String>,
    pub no_clean: bool,
    pub plot: bool,
    pub extra: Option<String>,
    /// `--lang` was given, so the config file's `language` is ignored.
    pub lang_explicit: bool,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// An error if the project cannot be found, the settings are invalid, any
/// collaborator invocation fails, or the table cannot be written.
///
/// 使用提供的参数执行 run 命令。
pub async fn execute(args: RunArgs) -> Result<()> {
    let plan = resolve_plan(&args)?;
    plan.layout.ensure_tmp_dir()?;

    println!(
        "{}",
        t!("run.project_root", path = plan.layout.root().display())
    );
    println!("{}", t!("run.test_filter", filter = plan.test_filter.yellow()));
    println!(
        "{}",
        t!("run.cpu_list", cpus = format_cpus(&plan.cpus)).cyan()
    );
    if !plan.clean {
        println!("{}", t!("run.clean_disabled").cyan());
    }
    warn_if_oversubscribed(&plan.cpus, num_cpus::get());

    let wrapper = plan.layout.root().join(&plan.wrapper);
    if !wrapper.is_file() {
        bail!("{}", t!("run.wrapper_not_found", path = wrapper.display()));
    }

    let stop_token = setup_signal_handler();
    let mut collaborator = ProcessCollaborator::new(stop_token);
    let inherited = InheritedEnv::capture();

    let report = run_sweep(&mut collaborator, &plan, &inherited).await?;

    print_summary(&report.runs);

    let table = plan.layout.table();
    report.dataset.write_csv(&table)?;
    println!(
        "\n{}",
        t!("run.table_written", path = table.display(), rows = report.dataset.len()).green()
    );

    if plan.plot {
        render_charts(report.dataset.records(), &plan.layout)?;
    }

    if report.skipped_count() > 0 {
        println!(
            "\n{}",
            t!("run.finished_with_warnings", count = report.skipped_count()).yellow().bold()
        );
    } else {
        println!("\n{}", t!("run.finished").green().bold());
    }
    Ok(())
}

/// Merges the config file and the command line into a [`SweepPlan`].
/// 将配置文件和命令行合并为 [`SweepPlan`]。
pub fn resolve_plan(args: &RunArgs) -> Result<SweepPlan> {
    let project_root = absolute_path(&args.project)?;

    let sweep_config = match config::resolve_config_path(args.config.as_deref(), &project_root) {
        Some(path) => {
            println!("{}", t!("run.loading_config", path = path.display()));
            config::load_sweep_config(&path)?
        }
        None => SweepConfig::default(),
    };

    if !args.lang_explicit {
        if let Some(language) = &sweep_config.language {
            crate::init_locale(Some(language));
        }
    }

    let overrides = RunOverrides {
        test_filter: args.test.clone(),
        cpus: args.cpu.as_deref().map(parse_cpu_list).transpose()?,
        no_clean: args.no_clean,
        plot: args.plot,
        extra_args: args.extra.as_deref().map(parse_extra_args),
    };

    SweepPlan::resolve(project_root, sweep_config, overrides)
}

fn format_cpus(cpus: &[u32]) -> String {
    cpus.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Warns about CPU counts above the number of logical CPUs on this host.
/// The sweep still runs them.
///
/// 对超过本机逻辑 CPU 数量的 CPU 数量发出警告。扫描仍会运行它们。
fn warn_if_oversubscribed(cpus: &[u32], available: usize) {
    let over: Vec<u32> = cpus
        .iter()
        .copied()
        .filter(|&cpu| cpu as usize > available)
        .collect();
    if !over.is_empty() {
        eprintln!(
            "{}",
            t!("run.warn_oversubscribed", cpus = format_cpus(&over), available = available).yellow()
        );
    }
}

/// Sets up a Ctrl-C handler that stops the in-flight collaborator.
/// 设置一个 Ctrl-C 处理器，用于停止正在运行的协作进程。
fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
