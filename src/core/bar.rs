use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::{ColorMapping, GradientStop, fade_in_stops};
use crate::core::label::{escape_label, format_label};
use crate::core::primitives::{format_grouped_number, format_percent};
use crate::core::scale::{BandScale, ContinuousScale, Scale, calculate_inner_padding};
use crate::core::scale_type::ScaleType;
use crate::core::shape::{CornerEdges, NO_EDGES, rounded_rect};
use crate::core::stack::{StackMode, StackOffsets, stack_values};
use crate::core::types::{DataPoint, DataValue};

/// Minimum bar extent (pixels, both axes) before corners get rounded.
const ROUND_EDGE_MIN_EXTENT_PX: f64 = 5.0;
const MAX_CORNER_RADIUS_PX: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarOrientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Per-group projection switches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarOptions {
    #[serde(default)]
    pub orientation: BarOrientation,
    #[serde(default)]
    pub mode: StackMode,
    #[serde(default = "default_true")]
    pub round_edges: bool,
    #[serde(default = "default_true")]
    pub no_bar_when_zero: bool,
    #[serde(default)]
    pub tooltip_disabled: bool,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            orientation: BarOrientation::Vertical,
            mode: StackMode::Standard,
            round_edges: true,
            no_bar_when_zero: true,
            tooltip_disabled: false,
        }
    }
}

impl BarOptions {
    #[must_use]
    pub fn new(orientation: BarOrientation, mode: StackMode) -> Self {
        Self {
            orientation,
            mode,
            ..Self::default()
        }
    }
}

fn default_true() -> bool {
    true
}

/// Pixel geometry and presentation data of one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub value: f64,
    pub label: DataValue,
    pub formatted_label: String,
    /// Value text shown on the bar: the grouped value, or the percentage
    /// span for normalized bars.
    pub value_label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub offsets: Option<StackOffsets>,
    pub color: String,
    pub gradient_stops: Option<Vec<GradientStop>>,
    pub round_edges: bool,
    pub edges: CornerEdges,
    pub radius: f64,
    pub path: String,
    pub starting_path: String,
    pub hide_bar: bool,
    pub series: Option<String>,
    pub aria_label: String,
    pub tooltip_text: Option<String>,
}

impl BarGeometry {
    /// Stops to paint the bar with: the color-mapped stops, or a fade-in of
    /// the fill color.
    #[must_use]
    pub fn gradient(&self) -> Vec<GradientStop> {
        match &self.gradient_stops {
            Some(stops) => stops.clone(),
            None => fade_in_stops(&self.color, if self.round_edges { 0.2 } else { 0.5 }),
        }
    }

    /// Moves the bar `offset` pixels along the category axis and rebuilds
    /// its paths.
    pub fn translate(&mut self, orientation: BarOrientation, offset: f64) {
        match orientation {
            BarOrientation::Vertical => self.x += offset,
            BarOrientation::Horizontal => self.y += offset,
        }
        let rect = (self.x, self.y, self.width, self.height);
        self.path = bar_path(orientation, rect, self.radius, self.edges);
        self.starting_path = starting_bar_path(orientation, rect, self.edges);
    }
}

/// Corner radius for a bar of the given pixel size.
#[must_use]
pub fn bar_radius(round_edges: bool, width: f64, height: f64) -> f64 {
    if round_edges && height > ROUND_EDGE_MIN_EXTENT_PX && width > ROUND_EDGE_MIN_EXTENT_PX {
        MAX_CORNER_RADIUS_PX
            .min(height / 2.0)
            .min(width / 2.0)
            .floor()
    } else {
        0.0
    }
}

/// Rounded corners sit on the edge facing away from the zero baseline.
#[must_use]
pub fn bar_edges(round_edges: bool, orientation: BarOrientation, value: f64) -> CornerEdges {
    if !round_edges {
        return NO_EDGES;
    }
    match (orientation, value > 0.0) {
        (BarOrientation::Vertical, true) => [true, true, false, false],
        (BarOrientation::Vertical, false) => [false, false, true, true],
        (BarOrientation::Horizontal, true) => [false, true, false, true],
        (BarOrientation::Horizontal, false) => [true, false, true, false],
    }
}

/// Whether a zero-extent bar is dropped instead of drawn as a hairline.
#[must_use]
pub fn should_hide_bar(no_bar_when_zero: bool, orientation: BarOrientation, width: f64, height: f64) -> bool {
    no_bar_when_zero
        && match orientation {
            BarOrientation::Vertical => height == 0.0,
            BarOrientation::Horizontal => width == 0.0,
        }
}

/// Outline path of a placed bar.
#[must_use]
pub fn bar_path(
    orientation: BarOrientation,
    (x, y, width, height): (f64, f64, f64, f64),
    radius: f64,
    edges: CornerEdges,
) -> String {
    let radius = match orientation {
        BarOrientation::Vertical => height.min(radius),
        BarOrientation::Horizontal => width.min(radius),
    };
    rounded_rect(x, y, width, height, radius, edges)
}

/// Collapsed one-pixel path a bar grows from on entry.
#[must_use]
pub fn starting_bar_path(
    orientation: BarOrientation,
    (x, y, width, height): (f64, f64, f64, f64),
    edges: CornerEdges,
) -> String {
    match orientation {
        BarOrientation::Vertical => rounded_rect(x, y + height, width, 1.0, 0.0, edges),
        BarOrientation::Horizontal => rounded_rect(x, y, 1.0, height, 0.0, edges),
    }
}

/// Projects one group of points into bars.
///
/// `category_scale` places the bars across (by display key) in standard mode
/// and provides the bar thickness in every mode; stacked and normalized bars
/// sit at zero on that axis, the caller translating the whole group.
#[must_use]
pub fn project_bars(
    points: &[DataPoint],
    category_scale: &Scale,
    value_scale: ContinuousScale,
    colors: &dyn ColorMapping,
    options: &BarOptions,
    series_name: Option<&str>,
) -> Vec<BarGeometry> {
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    let offsets = stack_values(&values, options.mode);
    let thickness = match options.orientation {
        BarOrientation::Vertical => category_scale.bandwidth().round(),
        BarOrientation::Horizontal => category_scale.bandwidth(),
    };
    let baseline = value_scale.domain().0.max(0.0);
    let round_edges = options.round_edges && options.mode == StackMode::Standard;

    let bars: Vec<BarGeometry> = points
        .iter()
        .zip(offsets)
        .map(|(point, offsets)| {
            let label = point.display_key();
            let across = match options.mode {
                StackMode::Standard => category_scale.position(&label),
                StackMode::Stacked | StackMode::Normalized => 0.0,
            };
            let (along, extent) = match options.mode {
                StackMode::Standard => {
                    let to_value = value_scale.apply(point.value);
                    let to_base = value_scale.apply(baseline);
                    let start = match options.orientation {
                        BarOrientation::Vertical if point.value < 0.0 => value_scale.apply(0.0),
                        BarOrientation::Vertical => to_value,
                        BarOrientation::Horizontal if point.value < 0.0 => to_value,
                        BarOrientation::Horizontal => to_base,
                    };
                    (start, (to_value - to_base).abs())
                }
                StackMode::Stacked | StackMode::Normalized => {
                    let p0 = value_scale.apply(offsets.offset0);
                    let p1 = value_scale.apply(offsets.offset1);
                    (p0.min(p1), (p0 - p1).abs())
                }
            };
            let rect = match options.orientation {
                BarOrientation::Vertical => (across, along, thickness, extent),
                BarOrientation::Horizontal => (along, across, extent, thickness),
            };
            build_bar(point, label, rect, offsets, colors, options, round_edges, series_name)
        })
        .collect();

    trace!(count = bars.len(), mode = ?options.mode, "projected bar group");
    bars
}

#[allow(clippy::too_many_arguments)]
fn build_bar(
    point: &DataPoint,
    label: DataValue,
    rect: (f64, f64, f64, f64),
    offsets: StackOffsets,
    colors: &dyn ColorMapping,
    options: &BarOptions,
    round_edges: bool,
    series_name: Option<&str>,
) -> BarGeometry {
    let (x, y, width, height) = rect;
    let value = point.value;
    let formatted_label = format_label(&label);
    let stacked = options.mode != StackMode::Standard;

    let (color, gradient_stops) = match colors.scale_type() {
        ScaleType::Linear if stacked => (
            colors.get_color(&DataValue::Number(offsets.offset1)),
            Some(colors.linear_gradient_stops(offsets.offset1, Some(offsets.offset0))),
        ),
        ScaleType::Linear => (
            colors.get_color(&DataValue::Number(value)),
            Some(colors.linear_gradient_stops(value, None)),
        ),
        _ => (colors.get_color(&label), None),
    };

    let value_label = match options.mode {
        StackMode::Normalized => format_percent(offsets.span()),
        _ => format_grouped_number(value),
    };

    let mut tooltip_label = formatted_label.clone();
    let mut aria_label = format!("{formatted_label} {}", format_grouped_number(value));
    if let Some(series) = series_name {
        tooltip_label = format!("{series} \u{2022} {formatted_label}");
        aria_label = format!("{series} {aria_label}");
    }
    let tooltip_text = (!options.tooltip_disabled).then(|| {
        format!(
            "<span class=\"tooltip-label\">{}</span><span class=\"tooltip-val\">{}</span>",
            escape_label(&tooltip_label),
            value_label
        )
    });

    let edges = bar_edges(round_edges, options.orientation, value);
    let radius = bar_radius(round_edges, width, height);

    BarGeometry {
        value,
        label,
        formatted_label,
        value_label,
        x,
        y,
        width,
        height,
        offsets: stacked.then_some(offsets),
        color,
        gradient_stops,
        round_edges,
        edges,
        radius,
        path: bar_path(options.orientation, rect, radius, edges),
        starting_path: starting_bar_path(options.orientation, rect, edges),
        hide_bar: should_hide_bar(options.no_bar_when_zero, options.orientation, width, height),
        series: series_name.map(str::to_owned),
        aria_label,
        tooltip_text,
    }
}

/// Pixel gap between groups of grouped bar charts.
pub const DEFAULT_GROUP_PADDING_PX: f64 = 16.0;
/// Pixel gap between bars of a group, or between standalone bars.
pub const DEFAULT_BAR_PADDING_PX: f64 = 8.0;

/// Band scale placing the groups of a grouped chart along `length` pixels.
#[must_use]
pub fn group_band_scale(groups: Vec<DataValue>, length: f64, group_padding: f64) -> BandScale {
    let spacing = calculate_inner_padding(groups.len(), length, group_padding);
    BandScale::new(groups, (0.0, length))
        .with_round(true)
        .with_padding_inner(spacing)
        .with_padding_outer(spacing / 2.0)
}

/// Band scale placing the bars of one group inside the group's band.
#[must_use]
pub fn inner_band_scale(keys: Vec<DataValue>, group_bandwidth: f64, bar_padding: f64) -> BandScale {
    let spacing = calculate_inner_padding(keys.len(), group_bandwidth, bar_padding);
    BandScale::new(keys, (0.0, group_bandwidth))
        .with_round(true)
        .with_padding_inner(spacing)
}

/// Band scale of stacked and normalized charts: one column per group.
#[must_use]
pub fn stacked_group_scale(groups: Vec<DataValue>, length: f64, bar_padding: f64) -> BandScale {
    let spacing = calculate_inner_padding(groups.len(), length, bar_padding);
    BandScale::new(groups, (0.0, length))
        .with_round(true)
        .with_padding_inner(spacing)
}
