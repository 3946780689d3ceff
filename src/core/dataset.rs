//! # Aggregator Module / 汇总模块
//!
//! Accumulates records from every configuration of a sweep and writes them
//! once, at the end, as `tmp/perf_data.csv`.
//!
//! 累积扫描中每个配置的记录，并在结束时一次性写入 `tmp/perf_data.csv`。

use anyhow::Result;
use std::path::Path;

use crate::core::models::MeasurementRecord;
use crate::infra::fs::write_atomic;

pub const CSV_HEADER: &str = "vertices,connections,cpu,serial_ms,parallel_ms";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MeasurementRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = MeasurementRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were appended.
    /// 按追加顺序排列的记录。
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Records ordered by (vertices, connections, cpu). The sort is stable,
    /// so duplicate keys keep their parse order.
    ///
    /// 按 (vertices, connections, cpu) 排序的记录。排序是稳定的，
    /// 因此重复的键保持其解析顺序。
    pub fn sorted(&self) -> Vec<MeasurementRecord> {
        let mut rows = self.records.clone();
        rows.sort_by_key(MeasurementRecord::sort_key);
        rows
    }

    pub fn to_csv(&self) -> String {
        let rows: String = self
            .sorted()
            .iter()
            .map(|row| {
                format!(
                    "{},{},{},{},{}\n",
                    row.vertices, row.connections, row.cpu, row.serial_ms, row.parallel_ms
                )
            })
            .collect();
        format!("{CSV_HEADER}\n{rows}")
    }

    /// Writes the sorted table to `path`, replacing any previous table.
    /// 将排序后的表写入 `path`，替换任何先前的表。
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_csv())
    }
}
