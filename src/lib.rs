//! # Sweep Runner Library / Sweep Runner 库
//!
//! This library provides the core functionality for the Sweep Runner tool,
//! which runs a Gradle test suite once per CPU count, scrapes the timing
//! blocks it writes into a CSV table, and optionally charts the results.
//!
//! 此库为 Sweep Runner 工具提供核心功能：
//! 针对每个 CPU 数量运行一次 Gradle 测试套件，将其写出的计时块抓取为 CSV 表格，
//! 并可选地将结果绘制为图表。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration, result parser, run driver, aggregator and the sweep loop
//! - `infra` - Process execution and file system operations
//! - `reporting` - Console summaries and SVG charts
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置、结果解析器、运行驱动、汇总器和扫描循环
//! - `infra` - 进程执行和文件系统操作
//! - `reporting` - 控制台摘要和 SVG 图表
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::models;
pub use core::parser;

/// Initializes the application's internationalization (i18n) and returns the
/// locale that was selected.
///
/// An explicitly requested language wins. Otherwise the system locale is
/// used: first the full locale (e.g. "zh-CN"), then just the language code
/// (e.g. "en"), and finally the default language ("en").
///
/// 初始化应用程序的国际化（i18n）并返回所选的语言环境。
/// 显式请求的语言优先；否则使用系统语言环境：先尝试完整区域（如 "zh-CN"），
/// 再尝试语言代码（如 "en"），最后回退到默认语言（"en"）。
pub fn init_locale(preferred: Option<&str>) -> String {
    let requested = preferred
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let lang = match_locale(&requested);
    rust_i18n::set_locale(&lang);
    lang
}

/// Maps a requested locale onto one of the bundled translations.
/// 将请求的语言环境映射到内置翻译之一。
pub fn match_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.iter().any(|locale| *locale == requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .and_then(|code| {
            available_locales
                .iter()
                .find(|locale| locale.split('-').next() == Some(code))
        })
        .map(|locale| locale.to_string())
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
