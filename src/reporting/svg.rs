//! # SVG Rendering Module / SVG 渲染模块
//!
//! Turns a [`LineChart`] into a standalone SVG document using `maud`
//! templates: title, axes with ticks, one polyline per series with point
//! markers, and an optional legend.
//!
//! 使用 `maud` 模板将 [`LineChart`] 转换为独立的 SVG 文档：
//! 标题、带刻度的坐标轴、每个系列一条带点标记的折线，以及可选的图例。

use maud::{Markup, html};

use crate::reporting::charts::{LineChart, Marker, Series};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 70.0;
const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728"];
/// Above this many distinct x values the axis switches to evenly spaced ticks.
const MAX_DATA_TICKS: usize = 12;

/// Maps data coordinates to SVG pixel coordinates.
struct Scale {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Scale {
    fn fit(series: &[Series]) -> Self {
        let points = || series.iter().flat_map(|s| s.points.iter());
        let x_min = points().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = points().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let y_max = points().map(|p| p.1).fold(0.0, f64::max);

        let (x_min, x_max) = if !x_min.is_finite() || !x_max.is_finite() {
            (0.0, 1.0)
        } else if x_min == x_max {
            (x_min - 1.0, x_max + 1.0)
        } else {
            let pad = (x_max - x_min) * 0.05;
            (x_min - pad, x_max + pad)
        };
        let y_max = if y_max <= 0.0 { 1.0 } else { y_max * 1.1 };

        Self {
            x_min,
            x_max,
            y_min: 0.0,
            y_max,
        }
    }

    fn x(&self, value: f64) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (value - self.x_min) / (self.x_max - self.x_min) * plot_width
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - (value - self.y_min) / (self.y_max - self.y_min) * plot_height
    }
}

/// Step of roughly `raw` rounded to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction < 1.5 {
        1.0
    } else if fraction < 3.0 {
        2.0
    } else if fraction < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced tick values inside `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = nice_step((max - min) / count.max(1) as f64);
    let mut ticks = Vec::new();
    let mut tick = (min / step).ceil() * step;
    while tick <= max + step * 1e-9 {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

/// Ticks on the x axis: the data values themselves when there are few of
/// them, evenly spaced ticks otherwise.
fn x_ticks(series: &[Series], scale: &Scale) -> Vec<f64> {
    let mut values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.0))
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    if !values.is_empty() && values.len() <= MAX_DATA_TICKS {
        values
    } else {
        nice_ticks(scale.x_min, scale.x_max, 6)
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn polyline_points(series: &Series, scale: &Scale) -> String {
    series
        .points
        .iter()
        .map(|&(x, y)| format!("{:.1},{:.1}", scale.x(x), scale.y(y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn marker(kind: Marker, cx: f64, cy: f64, color: &str) -> Markup {
    html! {
        @match kind {
            Marker::Circle => {
                circle cx=(format!("{cx:.1}")) cy=(format!("{cy:.1}")) r="4" fill=(color) {}
            }
            Marker::Square => {
                rect x=(format!("{:.1}", cx - 4.0)) y=(format!("{:.1}", cy - 4.0)) width="8" height="8" fill=(color) {}
            }
        }
    }
}

/// Renders `chart` as an SVG document. `footer` is printed small in the
/// bottom-right corner (typically a timestamp).
///
/// 将 `chart` 渲染为 SVG 文档。`footer` 以小字打印在右下角（通常是时间戳）。
pub fn render_svg(chart: &LineChart, footer: &str) -> String {
    let scale = Scale::fit(&chart.series);
    let x_ticks = x_ticks(&chart.series, &scale);
    let y_ticks = nice_ticks(scale.y_min, scale.y_max, 6);
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    let markup = html! {
        svg xmlns="http://www.w3.org/2000/svg" width=(WIDTH) height=(HEIGHT)
            viewBox=(format!("0 0 {WIDTH} {HEIGHT}")) font-family="sans-serif" {
            rect width="100%" height="100%" fill="white" {}

            @for (i, line) in chart.title.lines().enumerate() {
                text x=(WIDTH / 2.0) y=(26.0 + i as f64 * 20.0) text-anchor="middle" font-size="16" {
                    (line)
                }
            }

            // grid and y ticks
            @for tick in &y_ticks {
                @let y = format!("{:.1}", scale.y(*tick));
                line x1=(left) y1=(y) x2=(right) y2=(y) stroke="#e0e0e0" {}
                text x=(left - 8.0) y=(y) text-anchor="end" dominant-baseline="middle" font-size="12" {
                    (format_tick(*tick))
                }
            }
            @for tick in &x_ticks {
                @let x = format!("{:.1}", scale.x(*tick));
                line x1=(x) y1=(bottom) x2=(x) y2=(bottom + 5.0) stroke="black" {}
                text x=(x) y=(bottom + 20.0) text-anchor="middle" font-size="12" {
                    (format_tick(*tick))
                }
            }

            line x1=(left) y1=(bottom) x2=(right) y2=(bottom) stroke="black" {}
            line x1=(left) y1=(top) x2=(left) y2=(bottom) stroke="black" {}

            text x=((left + right) / 2.0) y=(HEIGHT - 20.0) text-anchor="middle" font-size="14" {
                (chart.x_label)
            }
            text x="20" y=((top + bottom) / 2.0) text-anchor="middle" font-size="14"
                transform=(format!("rotate(-90 20 {:.1})", (top + bottom) / 2.0)) {
                (chart.y_label)
            }

            @for (index, series) in chart.series.iter().enumerate() {
                @let color = PALETTE[index % PALETTE.len()];
                polyline points=(polyline_points(series, &scale)) fill="none" stroke=(color) stroke-width="2" {}
                @for &(x, y) in &series.points {
                    (marker(series.marker, scale.x(x), scale.y(y), color))
                }
            }

            @if chart.show_legend {
                @for (index, series) in chart.series.iter().enumerate() {
                    @let color = PALETTE[index % PALETTE.len()];
                    @let y = top + 12.0 + index as f64 * 20.0;
                    g class="legend" {
                        line x1=(right - 130.0) y1=(y) x2=(right - 100.0) y2=(y) stroke=(color) stroke-width="2" {}
                        (marker(series.marker, right - 115.0, y, color))
                        text x=(right - 92.0) y=(y) dominant-baseline="middle" font-size="12" {
                            (series.label)
                        }
                    }
                }
            }

            text x=(WIDTH - 8.0) y=(HEIGHT - 6.0) text-anchor="end" font-size="10" fill="#888888" {
                (footer)
            }
        }
    };

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
        markup.into_string()
    )
}
