//! # Command Line Interface / 命令行接口
//!
//! Builds the `clap` command tree and dispatches to the `run` and `init`
//! subcommands. Help texts are localized, so the language is resolved from
//! `--lang` before the parser is built.
//!
//! 构建 `clap` 命令树并分发到 `run` 和 `init` 子命令。
//! 帮助文本是本地化的，因此在构建解析器之前先从 `--lang` 解析语言。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::{DEFAULT_CONFIG_FILE, DEFAULT_CPUS, DEFAULT_TEST_FILTER};
use crate::infra::t;

pub mod commands;

use commands::run::RunArgs;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
///
/// 预解析命令行参数以查找语言设置。
/// 这使得 i18n 可以在构建完整 CLI 之前初始化。
pub fn pre_parse_language<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            return args.next();
        }
        if let Some(lang) = arg.strip_prefix("--lang=") {
            return Some(lang.to_string());
        }
    }
    None
}

pub fn build_cli() -> Command {
    Command::new("sweep-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cli.run_about").to_string())
                .arg(
                    Arg::new("project")
                        .short('p')
                        .long("project")
                        .help(t!("cli.arg_project").to_string())
                        .value_name("PROJECT_DIR")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("test")
                        .short('t')
                        .long("test")
                        .help(t!("cli.arg_test", default = DEFAULT_TEST_FILTER).to_string())
                        .value_name("FILTER")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("cpu")
                        .long("cpu")
                        .help(t!("cli.arg_cpu", default = DEFAULT_CPUS).to_string())
                        .value_name("LIST")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no-clean")
                        .long("no-clean")
                        .help(t!("cli.arg_no_clean").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("plot")
                        .long("plot")
                        .help(t!("cli.arg_plot").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("extra")
                        .long("extra")
                        .help(t!("cli.arg_extra").to_string())
                        .value_name("ARGS")
                        .allow_hyphen_values(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help(t!("cli.arg_config", file = DEFAULT_CONFIG_FILE).to_string())
                        .value_name("CONFIG")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cli.init_about").to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("cli.arg_output").to_string())
                        .value_name("FILE")
                        .default_value(DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("cli.arg_force").to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("cli.arg_non_interactive").to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn run_args(matches: &ArgMatches, lang_explicit: bool) -> RunArgs {
    RunArgs {
        project: matches
            .get_one::<PathBuf>("project")
            .cloned()
            .unwrap_or_default(), // Required by clap
        config: matches.get_one::<PathBuf>("config").cloned(),
        test: matches.get_one::<String>("test").cloned(),
        cpu: matches.get_one::<String>("cpu").cloned(),
        no_clean: matches.get_flag("no-clean"),
        plot: matches.get_flag("plot"),
        extra: matches.get_one::<String>("extra").cloned(),
        lang_explicit,
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let explicit_language = pre_parse_language(env::args());
    crate::init_locale(explicit_language.as_deref());

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            commands::run::execute(run_args(run_matches, explicit_language.is_some())).await?;
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)); // Has default
            let force = init_matches.get_flag("force");
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::execute(&output, force, non_interactive)?;
        }
        _ => {
            // `subcommand_required` makes clap print help and exit before we get here.
        }
    }
    Ok(())
}
