use serde::{Deserialize, Serialize};

use crate::core::bar::bar_radius;
use crate::core::color::{ColorMapping, GradientStop};
use crate::core::label::{escape_label, format_label};
use crate::core::primitives::{finite_extent, format_grouped_number, format_number};
use crate::core::scale::{BandScale, ContinuousScale};
use crate::core::scale_type::ScaleType;
use crate::core::shape::{CornerEdges, rounded_rect};
use crate::core::types::{DataValue, Series};

/// Type-7 quantile (linear interpolation between closest ranks) of an
/// ascending slice.
#[must_use]
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !p.is_finite() {
        return None;
    }
    if p <= 0.0 || n == 1 {
        return Some(sorted[0]);
    }
    if p >= 1.0 {
        return Some(sorted[n - 1]);
    }
    let index = (n - 1) as f64 * p;
    let lower = index.floor() as usize;
    let low = sorted[lower];
    let high = sorted[(lower + 1).min(n - 1)];
    Some(low + (high - low) * (index - lower as f64))
}

/// First quartile, median and third quartile; `None` for no finite values.
#[must_use]
pub fn box_quartiles(values: &[f64]) -> Option<[f64; 3]> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|value| value.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    Some([
        quantile_sorted(&sorted, 0.25)?,
        quantile_sorted(&sorted, 0.5)?,
        quantile_sorted(&sorted, 0.75)?,
    ])
}

/// Straight segment from `v1` to `v2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// The four lines of a box: vertical whisker, top whisker cap, median and
/// bottom whisker cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxLines {
    pub vertical: LineSegment,
    pub top: LineSegment,
    pub median: LineSegment,
    pub bottom: LineSegment,
}

impl BoxLines {
    /// All four lines collapsed onto the median, the entry state.
    #[must_use]
    pub fn collapsed(self) -> Self {
        let y = self.median.y1;
        let flatten = |line: LineSegment| LineSegment { y1: y, y2: y, ..line };
        Self {
            vertical: flatten(self.vertical),
            top: flatten(self.top),
            median: self.median,
            bottom: flatten(self.bottom),
        }
    }
}

/// Whisker and median lines of a box centered in a band.
#[must_use]
pub fn box_lines(
    band_start: f64,
    bar_width: f64,
    whiskers: (f64, f64),
    quartiles: [f64; 3],
    y_scale: ContinuousScale,
    stroke_width: f64,
) -> BoxLines {
    let center = band_start + bar_width / 2.0;
    let median_width = (bar_width + 4.0 * stroke_width).max(1.0);
    let whisker_width = (bar_width / 3.0).max(1.0);
    let low = y_scale.apply(whiskers.0);
    let high = y_scale.apply(whiskers.1);
    let median = y_scale.apply(quartiles[1]);
    let cap = |y: f64, width: f64| LineSegment {
        x1: center + width / 2.0,
        y1: y,
        x2: center - width / 2.0,
        y2: y,
    };
    BoxLines {
        vertical: LineSegment {
            x1: center,
            y1: low,
            x2: center,
            y2: high,
        },
        top: cap(low, whisker_width),
        median: cap(median, median_width),
        bottom: cap(high, whisker_width),
    }
}

/// Box plot of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub label: String,
    pub formatted_label: String,
    /// Median.
    pub value: f64,
    pub quartiles: [f64; 3],
    pub whiskers: (f64, f64),
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub path: String,
    pub lines: BoxLines,
    pub color: String,
    pub gradient_stops: Option<Vec<GradientStop>>,
    pub aria_label: String,
    pub tooltip_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxOptions {
    pub stroke_width: f64,
    pub round_edges: bool,
    pub tooltip_disabled: bool,
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            round_edges: true,
            tooltip_disabled: false,
        }
    }
}

/// Y extent of a box chart: every value of every series.
#[must_use]
pub fn box_value_domain(results: &[Series]) -> (f64, f64) {
    finite_extent(
        results
            .iter()
            .flat_map(|group| group.series.iter().map(|point| point.value)),
    )
    .unwrap_or((0.0, 0.0))
}

/// Box of one series; `None` when it has no finite values.
#[must_use]
pub fn box_geometry(
    series: &Series,
    x_scale: &BandScale,
    y_scale: ContinuousScale,
    colors: &dyn ColorMapping,
    options: &BoxOptions,
) -> Option<BoxGeometry> {
    let values = series.values();
    let quartiles = box_quartiles(&values)?;
    let whiskers = finite_extent(values.iter().copied())?;
    let key = DataValue::Text(series.name.clone());
    let width = x_scale.bandwidth().round();
    let x = x_scale.apply(&key).unwrap_or(0.0);
    let y = y_scale.apply(quartiles[2]);
    let height = (y_scale.apply(quartiles[0]) - y).abs();
    let lines = box_lines(x, width, whiskers, quartiles, y_scale, options.stroke_width);
    let formatted_label = format_label(&key);

    let (color, gradient_stops) = match colors.scale_type() {
        ScaleType::Ordinal => (colors.get_color(&key), None),
        _ => (
            colors.get_color(&DataValue::Number(quartiles[1])),
            Some(colors.linear_gradient_stops(quartiles[0], Some(quartiles[2]))),
        ),
    };

    let edges: CornerEdges = [options.round_edges; 4];
    let radius = bar_radius(options.round_edges, width, height);
    let n = format_number;
    let tooltip_text = (!options.tooltip_disabled).then(|| {
        format!(
            "<span class=\"tooltip-label\">{}</span><span class=\"tooltip-val\">\u{2022} Q1: {} \u{2022} Q2: {} \u{2022} Q3: {}<br>\u{2022} Min: {} \u{2022} Max: {}</span>",
            escape_label(&formatted_label),
            n(quartiles[0]),
            n(quartiles[1]),
            n(quartiles[2]),
            n(whiskers.0),
            n(whiskers.1)
        )
    });

    Some(BoxGeometry {
        label: series.name.clone(),
        aria_label: format!("{formatted_label} - Median: {}", format_grouped_number(quartiles[1])),
        formatted_label,
        value: quartiles[1],
        quartiles,
        whiskers,
        x,
        y,
        width,
        height,
        radius,
        path: rounded_rect(x, y, width, height, height.min(radius), edges),
        lines,
        color,
        gradient_stops,
        tooltip_text,
    })
}
