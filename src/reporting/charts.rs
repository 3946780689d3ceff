//! # Charts Module / 图表模块
//!
//! Derives the two summary views of a sweep and renders each as an SVG
//! chart under the project's `tmp` directory:
//!
//! - **scaling curve**: parallel time against CPU count for the largest
//!   problem size (most vertices, then most connections)
//! - **size comparison**: best serial and best parallel time against vertex
//!   count at the largest CPU count
//!
//! Rendering needs the `charts` cargo feature. Without it the reporter
//! prints a warning and writes nothing.
//!
//! 派生扫描的两个摘要视图，并将每个视图渲染为项目 `tmp` 目录下的 SVG 图表：
//! 扩展曲线（最大问题规模下并行时间随 CPU 数量的变化）和规模对比
//! （最大 CPU 数量下最佳串行与并行时间随顶点数的变化）。
//! 渲染需要 `charts` cargo feature；没有它时仅打印警告而不写入任何文件。

use anyhow::Result;
use colored::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::models::MeasurementRecord;
use crate::infra::fs::ProjectLayout;
use crate::infra::t;

/// Parallel time per CPU count for one problem size.
/// 单个问题规模下每个 CPU 数量的并行时间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingCurve {
    pub vertices: u64,
    pub connections: u64,
    /// `(cpu, parallel_ms)`, ascending by CPU.
    pub points: Vec<(u32, u64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePoint {
    pub vertices: u64,
    pub serial_ms: u64,
    pub parallel_ms: u64,
}

/// Best serial and parallel time per vertex count at one CPU count.
/// 在一个 CPU 数量下每个顶点数的最佳串行和并行时间。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeComparison {
    pub cpu: u32,
    /// Ascending by vertex count.
    pub points: Vec<SizePoint>,
}

/// Picks the (vertices, connections) pair with the most vertices, breaking
/// ties by the most connections, and lists its parallel times by CPU.
/// Returns `None` for an empty dataset.
///
/// 选择顶点数最多的 (vertices, connections) 组合（顶点数相同时取连接数最多的），
/// 并按 CPU 列出其并行时间。数据集为空时返回 `None`。
pub fn scaling_curve(records: &[MeasurementRecord]) -> Option<ScalingCurve> {
    let (vertices, connections) = records.iter().map(|r| (r.vertices, r.connections)).max()?;

    let mut points: Vec<(u32, u64)> = records
        .iter()
        .filter(|r| r.vertices == vertices && r.connections == connections)
        .map(|r| (r.cpu, r.parallel_ms))
        .collect();
    points.sort_by_key(|&(cpu, _)| cpu);

    Some(ScalingCurve {
        vertices,
        connections,
        points,
    })
}

/// Takes the records of the largest CPU count, groups them by vertex count
/// and keeps the minimum serial and minimum parallel time of each group.
/// Returns `None` for an empty dataset.
///
/// 取最大 CPU 数量的记录，按顶点数分组，并保留每组的最小串行和最小并行时间。
/// 数据集为空时返回 `None`。
pub fn size_comparison(records: &[MeasurementRecord]) -> Option<SizeComparison> {
    let cpu = records.iter().map(|r| r.cpu).max()?;

    let mut groups: BTreeMap<u64, (u64, u64)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.cpu == cpu) {
        groups
            .entry(record.vertices)
            .and_modify(|(serial, parallel)| {
                *serial = (*serial).min(record.serial_ms);
                *parallel = (*parallel).min(record.parallel_ms);
            })
            .or_insert((record.serial_ms, record.parallel_ms));
    }

    let points = groups
        .into_iter()
        .map(|(vertices, (serial_ms, parallel_ms))| SizePoint {
            vertices,
            serial_ms,
            parallel_ms,
        })
        .collect();

    Some(SizeComparison { cpu, points })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub marker: Marker,
    pub points: Vec<(f64, f64)>,
}

/// A renderer-independent description of a line chart.
/// 与渲染器无关的折线图描述。
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// May contain `\n`; each line is drawn separately.
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub show_legend: bool,
}

impl ScalingCurve {
    pub fn to_chart(&self) -> LineChart {
        LineChart {
            title: t!(
                "charts.scaling_title",
                vertices = self.vertices,
                connections = self.connections
            )
            .to_string(),
            x_label: t!("charts.scaling_x_label").to_string(),
            y_label: t!("charts.scaling_y_label").to_string(),
            series: vec![Series {
                label: t!("charts.series_parallel").to_string(),
                marker: Marker::Circle,
                points: self
                    .points
                    .iter()
                    .map(|&(cpu, ms)| (f64::from(cpu), ms as f64))
                    .collect(),
            }],
            show_legend: false,
        }
    }
}

impl SizeComparison {
    pub fn to_chart(&self) -> LineChart {
        let serial = self
            .points
            .iter()
            .map(|p| (p.vertices as f64, p.serial_ms as f64))
            .collect();
        let parallel = self
            .points
            .iter()
            .map(|p| (p.vertices as f64, p.parallel_ms as f64))
            .collect();

        LineChart {
            title: t!("charts.size_title", cpu = self.cpu).to_string(),
            x_label: t!("charts.size_x_label").to_string(),
            y_label: t!("charts.size_y_label").to_string(),
            series: vec![
                Series {
                    label: t!("charts.series_serial").to_string(),
                    marker: Marker::Circle,
                    points: serial,
                },
                Series {
                    label: t!("charts.series_parallel").to_string(),
                    marker: Marker::Square,
                    points: parallel,
                },
            ],
            show_legend: true,
        }
    }
}

/// Renders both views into the project's `tmp` directory and returns the
/// paths written. A view with no data is skipped.
///
/// 将两个视图渲染到项目的 `tmp` 目录，并返回写入的路径。没有数据的视图会被跳过。
#[cfg(feature = "charts")]
pub fn render_charts(records: &[MeasurementRecord], layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
    use crate::infra::fs::write_atomic;
    use crate::reporting::svg::render_svg;

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let charts = [
        (scaling_curve(records).map(|v| v.to_chart()), layout.scaling_chart()),
        (size_comparison(records).map(|v| v.to_chart()), layout.size_chart()),
    ];

    let mut written = Vec::new();
    for (chart, path) in charts {
        let Some(chart) = chart else {
            println!("{}", t!("charts.skipped_empty", path = path.display()).dimmed());
            continue;
        };
        write_atomic(&path, &render_svg(&chart, &generated_at))?;
        println!("{}", t!("charts.written", path = path.display()).green());
        written.push(path);
    }
    Ok(written)
}

/// Built without the `charts` feature: reporting is skipped with a warning.
/// 未启用 `charts` feature 构建：报告会被跳过并打印警告。
#[cfg(not(feature = "charts"))]
pub fn render_charts(_records: &[MeasurementRecord], _layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
    eprintln!("{}", t!("charts.unavailable").yellow());
    Ok(Vec::new())
}
