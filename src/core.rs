//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Sweep Runner:
//! configuration, the result parser, the run driver, the aggregator and
//! the sweep loop that ties them together.
//!
//! 此模块包含 Sweep Runner 的核心功能：
//! 配置、结果解析器、运行驱动、汇总器以及将它们串联起来的扫描循环。

pub mod config;
pub mod dataset;
pub mod driver;
pub mod environment;
pub mod models;
pub mod parser;
pub mod sweep;

// Re-exports
pub use config::SweepPlan;
pub use dataset::Dataset;
pub use models::MeasurementRecord;
pub use sweep::run_sweep;
