//! Bar and doughnut charts for widgets, plus the registry that repaints them together.

use crate::svg::{fmt, svg_root, text_el};
use crate::theme::Palette;
use crate::{Error, Result};
use folio_core::{ChartData, ChartKind, FolioConfig, Motion, Theme};
use indexmap::IndexMap;

pub const DEFAULT_ANIMATION_MS: u64 = 420;

const BAR_WIDTH: f64 = 320.0;
const BAR_HEIGHT: f64 = 190.0;
const BAR_MARGIN_LEFT: f64 = 40.0;
const BAR_MARGIN_RIGHT: f64 = 8.0;
const BAR_MARGIN_TOP: f64 = 10.0;
const BAR_MARGIN_BOTTOM: f64 = 24.0;
const BAR_RADIUS: f64 = 10.0;
const GRID_LINES: usize = 4;

const DOUGHNUT_SIZE: f64 = 190.0;
const DOUGHNUT_OUTER: f64 = 80.0;
const DOUGHNUT_CUTOUT: f64 = 0.62;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub palette: Palette,
    /// `None` disables animation.
    pub animation_ms: Option<u64>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: Palette::for_theme(Theme::Light),
            animation_ms: Some(DEFAULT_ANIMATION_MS),
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Rounds `max` up so each of the grid steps is 1, 2, 2.5 or 5 times a power of ten.
fn nice_max(max: f64) -> f64 {
    if max <= 0.0 {
        return 1.0;
    }
    let raw_step = max / GRID_LINES as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(magnitude * 10.0);
    step * GRID_LINES as f64
}

fn tick_label(v: f64) -> String {
    if v >= 1_000_000.0 {
        format!("{}M", fmt((v / 100_000.0).round() / 10.0))
    } else if v >= 1_000.0 {
        format!("{}k", fmt((v / 100.0).round() / 10.0))
    } else {
        fmt((v * 100.0).round() / 100.0)
    }
}

fn render_bar(data: &ChartData, style: &ChartStyle) -> folio_core::Element {
    let palette = &style.palette;
    let mut svg = svg_root("chart-svg", &format!("0 0 {} {}", fmt(BAR_WIDTH), fmt(BAR_HEIGHT)))
        .with_attr("role", "img")
        .with_attr("data-kind", "bar");

    let plot_w = BAR_WIDTH - BAR_MARGIN_LEFT - BAR_MARGIN_RIGHT;
    let plot_h = BAR_HEIGHT - BAR_MARGIN_TOP - BAR_MARGIN_BOTTOM;
    let base_y = BAR_MARGIN_TOP + plot_h;
    let data_max = data.values.iter().copied().map(finite_or_zero).fold(0.0, f64::max);
    let max = nice_max(data_max.max(data.suggested_max.map(finite_or_zero).unwrap_or(0.0)));

    let mut grid = folio_core::Element::new("g").with_class("chart-grid");
    for i in 0..=GRID_LINES {
        let v = max * i as f64 / GRID_LINES as f64;
        let y = base_y - plot_h * i as f64 / GRID_LINES as f64;
        grid.push(
            folio_core::Element::new("line")
                .with_attr("x1", fmt(BAR_MARGIN_LEFT))
                .with_attr("x2", fmt(BAR_WIDTH - BAR_MARGIN_RIGHT))
                .with_attr("y1", fmt(y))
                .with_attr("y2", fmt(y))
                .with_attr("stroke", palette.faint.as_str()),
        );
        grid.push(
            text_el("chart-tick", BAR_MARGIN_LEFT - 6.0, y + 4.0, &tick_label(v))
                .with_attr("text-anchor", "end")
                .with_attr("fill", palette.muted.as_str()),
        );
    }
    svg.push(grid);

    let n = data.values.len().max(1);
    let slot = plot_w / n as f64;
    let bar_w = slot * 0.6;
    let mut bars = folio_core::Element::new("g").with_class("chart-bars");
    for (i, value) in data.values.iter().enumerate() {
        let h = plot_h * finite_or_zero(*value) / max;
        let x = BAR_MARGIN_LEFT + slot * i as f64 + (slot - bar_w) / 2.0;
        bars.push(
            folio_core::Element::new("rect")
                .with_class("chart-bar")
                .with_attr("data-index", i.to_string())
                .with_attr("x", fmt(x))
                .with_attr("y", fmt(base_y - h))
                .with_attr("width", fmt(bar_w))
                .with_attr("height", fmt(h))
                .with_attr("rx", fmt(BAR_RADIUS.min(bar_w / 2.0)))
                .with_attr("fill", palette.tone(data.tone_at(i)))
                .with_attr("stroke", palette.faint.as_str())
                .with_attr("stroke-width", "1"),
        );
        if let Some(label) = data.labels.get(i) {
            bars.push(
                text_el("chart-label", x + bar_w / 2.0, BAR_HEIGHT - 6.0, label)
                    .with_attr("text-anchor", "middle")
                    .with_attr("fill", palette.muted.as_str()),
            );
        }
    }
    svg.push(bars);
    svg
}

fn render_doughnut(data: &ChartData, style: &ChartStyle) -> folio_core::Element {
    let palette = &style.palette;
    let c = DOUGHNUT_SIZE / 2.0;
    let inner = DOUGHNUT_OUTER * DOUGHNUT_CUTOUT;
    let r = (DOUGHNUT_OUTER + inner) / 2.0;
    let thickness = DOUGHNUT_OUTER - inner;
    let circumference = std::f64::consts::TAU * r;

    let mut svg = svg_root(
        "chart-svg",
        &format!("0 0 {} {}", fmt(DOUGHNUT_SIZE), fmt(DOUGHNUT_SIZE)),
    )
    .with_attr("role", "img")
    .with_attr("data-kind", "doughnut");

    let ring = |stroke: &str| {
        folio_core::Element::new("circle")
            .with_attr("cx", fmt(c))
            .with_attr("cy", fmt(c))
            .with_attr("r", fmt(r))
            .with_attr("fill", "none")
            .with_attr("stroke", stroke.to_string())
            .with_attr("stroke-width", fmt(thickness))
    };
    svg.push(ring(palette.faint.as_str()).with_class("chart-track"));

    let total: f64 = data.values.iter().copied().map(finite_or_zero).sum();
    if total > 0.0 {
        let mut offset = 0.0;
        for (i, value) in data.values.iter().enumerate() {
            let len = circumference * finite_or_zero(*value) / total;
            svg.push(
                ring(palette.tone(data.tone_at(i)))
                    .with_class("chart-seg")
                    .with_attr("data-index", i.to_string())
                    .with_attr("stroke-dasharray", format!("{} {}", fmt(len), fmt(circumference - len)))
                    .with_attr("stroke-dashoffset", fmt(-offset))
                    .with_attr("transform", format!("rotate(-90 {} {})", fmt(c), fmt(c))),
            );
            offset += len;
        }
    }
    svg
}

/// Paints one chart. The animation duration is exposed as `data-animation-ms` for the host.
pub fn render_chart(data: &ChartData, style: &ChartStyle) -> folio_core::Element {
    let mut svg = match data.kind {
        ChartKind::Bar => render_bar(data, style),
        ChartKind::Doughnut => render_doughnut(data, style),
    };
    svg.set_attr("data-theme", style.palette.theme.as_str());
    match style.animation_ms {
        Some(ms) => svg.set_attr("data-animation-ms", ms.to_string()),
        None => svg.set_attr("data-animation-ms", "0"),
    }
    svg
}

#[derive(Debug, Clone)]
struct Chart {
    data: ChartData,
    resizes: usize,
}

/// Every chart on the page, keyed by its widget id, in registration order.
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    charts: IndexMap<String, Chart>,
    style: ChartStyle,
    animation_ms: u64,
}

impl Default for ChartRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_MS)
    }
}

impl ChartRegistry {
    pub fn new(animation_ms: u64) -> Self {
        Self {
            charts: IndexMap::new(),
            style: ChartStyle {
                animation_ms: Some(animation_ms),
                ..ChartStyle::default()
            },
            animation_ms,
        }
    }

    pub fn from_config(config: &FolioConfig) -> Self {
        Self::new(config.get_u64("chart.animationMs").unwrap_or(DEFAULT_ANIMATION_MS))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn data(&self, id: &str) -> Option<&ChartData> {
        self.charts.get(id).map(|c| &c.data)
    }

    /// Adds or replaces a chart.
    pub fn register(&mut self, id: impl Into<String>, data: ChartData) {
        let id = id.into();
        tracing::debug!(chart = %id, kind = ?data.kind, "registered chart");
        self.charts.insert(id, Chart { data, resizes: 0 });
    }

    pub fn update_data(&mut self, id: &str, data: ChartData) -> Result<()> {
        match self.charts.get_mut(id) {
            Some(chart) => {
                chart.data = data;
                Ok(())
            }
            None => Err(Error::UnknownChart { id: id.to_string() }),
        }
    }

    /// Repaints every chart for the current theme and motion. Data is left as is.
    pub fn restyle(&mut self, palette: &Palette, motion: Motion) {
        self.style = ChartStyle {
            palette: palette.clone(),
            animation_ms: motion.is_on().then_some(self.animation_ms),
        };
        tracing::debug!(
            charts = self.charts.len(),
            theme = palette.theme.as_str(),
            motion = motion.as_str(),
            "restyled charts"
        );
    }

    /// Records a resize request. A chart that does not exist is ignored.
    pub fn resize(&mut self, id: &str) -> bool {
        match self.charts.get_mut(id) {
            Some(chart) => {
                chart.resizes += 1;
                true
            }
            None => {
                tracing::debug!(chart = id, "resize for missing chart ignored");
                false
            }
        }
    }

    pub fn resize_count(&self, id: &str) -> usize {
        self.charts.get(id).map_or(0, |c| c.resizes)
    }

    pub fn render(&self, id: &str) -> Option<folio_core::Element> {
        self.charts
            .get(id)
            .map(|c| render_chart(&c.data, &self.style))
    }
}
