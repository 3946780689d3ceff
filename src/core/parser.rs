//! # Result Parser Module / 结果解析模块
//!
//! Scrapes timing blocks of the form
//! `Times for <V> vertices and <E> connections: Serial: <S> Parallel: <P>`
//! out of free-form text. Matching ignores case and any whitespace,
//! including line breaks, between the fields.
//!
//! 从自由格式文本中抓取形如
//! `Times for <V> vertices and <E> connections: Serial: <S> Parallel: <P>`
//! 的计时块。匹配忽略大小写以及字段之间的任何空白（包括换行）。

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::core::models::Measurement;
use crate::infra::t;

static RESULTS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r"Times for\s+([0-9]+)\s+vertices\s+and\s+([0-9]+)\s+connections:\s*Serial:\s*([0-9]+)\s*Parallel:\s*([0-9]+)",
    )
    .case_insensitive(true)
    .build()
    .expect("results pattern is a valid regex")
});

/// Extracts every complete timing block from `text`, in order of appearance.
///
/// Blocks missing any of the four values, or written with non-ASCII digits,
/// simply do not match. A block that matches but carries a number that does
/// not fit in a `u64` is an error for the whole call.
///
/// 从 `text` 中按出现顺序提取所有完整的计时块。
///
/// 缺少四个值中任意一个或使用非 ASCII 数字的块不会匹配。匹配成功但数字
/// 无法放入 `u64` 的块会使整个调用返回错误。
pub fn parse_results(text: &str) -> Result<Vec<Measurement>> {
    RESULTS_PATTERN
        .captures_iter(text)
        .map(|caps| {
            let block = caps.get(0).map_or("", |m| m.as_str());
            let field = |index: usize| -> Result<u64> {
                let raw = caps.get(index).map_or("", |m| m.as_str());
                raw.parse::<u64>().with_context(|| {
                    t!("parse.malformed_number", value = raw, block = block.trim()).to_string()
                })
            };
            Ok(Measurement {
                vertices: field(1)?,
                connections: field(2)?,
                serial_ms: field(3)?,
                parallel_ms: field(4)?,
            })
        })
        .collect()
}

/// Reads a results file and parses it. Invalid UTF-8 is replaced rather
/// than rejected.
/// 读取结果文件并解析。无效的 UTF-8 会被替换而不是拒绝。
pub fn parse_results_file(path: &Path) -> Result<Vec<Measurement>> {
    let bytes = fs::read(path)
        .with_context(|| t!("parse.read_failed", path = path.display()).to_string())?;
    let text: Cow<'_, str> = String::from_utf8_lossy(&bytes);
    parse_results(&text).with_context(|| t!("parse.file_failed", path = path.display()).to_string())
}
