//! # Commands / 子命令
//!
//! - `run` - Sweep the configured CPU counts and aggregate the results
//! - `init` - Write a starter `Sweep.toml`
//!
//! - `run` - 扫描配置的 CPU 数量并汇总结果
//! - `init` - 写出初始的 `Sweep.toml`

pub mod init;
pub mod run;
