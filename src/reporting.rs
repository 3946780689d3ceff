//! # Reporting Module / 报告模块
//!
//! This module handles everything the operator sees after the sweep:
//! colorful console summaries and the optional SVG charts derived from the
//! aggregated dataset.
//!
//! 此模块处理扫描结束后操作员看到的所有内容：
//! 彩色控制台摘要以及从汇总数据集派生的可选 SVG 图表。

pub mod charts;
pub mod console;
#[cfg(feature = "charts")]
pub mod svg;

// Re-export common reporting functions
pub use charts::render_charts;
pub use console::{print_abort_details, print_summary};
