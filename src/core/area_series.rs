use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::{ColorMapping, GradientStop, fade_in_stops};
use crate::core::label::format_label;
use crate::core::primitives::finite_extent;
use crate::core::scale::{ContinuousScale, Scale};
use crate::core::scale_type::ScaleType;
use crate::core::shape::{AreaPoint, PathPoint, area_path, line_path};
use crate::core::stack::{StackMode, StackOffsets};
use crate::core::types::{DataPoint, DataValue, Series};

const CIRCLE_RADIUS_PX: f64 = 5.0;

/// Order in which a series is drawn along a positional axis, as indices
/// into `points`. The source slice is never reordered.
///
/// Time and linear axes sort by value; ordinal axes follow `x_set`, keys
/// missing from it going last in their original order.
#[must_use]
pub fn sorted_indices(points: &[DataPoint], scale_type: ScaleType, x_set: &[DataValue]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    match scale_type {
        ScaleType::Time | ScaleType::Linear => {
            order.sort_by(|&a, &b| points[a].name.natural_cmp(&points[b].name));
        }
        ScaleType::Ordinal => {
            let rank = |index: usize| {
                x_set
                    .iter()
                    .position(|key| points[index].name.matches_key(key))
                    .unwrap_or(usize::MAX)
            };
            order.sort_by_key(|&index| rank(index));
        }
    }
    order
}

/// Sorted copy of `points`.
#[must_use]
pub fn sorted_points(points: &[DataPoint], scale_type: ScaleType, x_set: &[DataValue]) -> Vec<DataPoint> {
    sorted_indices(points, scale_type, x_set)
        .into_iter()
        .map(|index| points[index].clone())
        .collect()
}

/// Area-fill switches for one series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaOptions {
    #[serde(default)]
    pub mode: StackMode,
    /// Fill floor of standard areas; the bottom of the y range when `None`.
    #[serde(default)]
    pub base_value: Option<f64>,
}

/// Paths and paint of one area series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSeriesGeometry {
    pub series: String,
    pub path: String,
    /// Flat area at the floor, the shape the fill animates from.
    pub starting_path: String,
    /// Top outline of the area.
    pub line_path: String,
    pub color: String,
    pub gradient_id: Option<String>,
    pub gradient_stops: Option<Vec<GradientStop>>,
}

/// Projects one area series.
///
/// `offsets` must mirror `series.series` when the mode is stacked or
/// normalized. `gradient_key` is a caller-owned unique prefix for the
/// gradient identifier.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn area_series_geometry(
    series: &Series,
    offsets: Option<&[StackOffsets]>,
    x_scale: &Scale,
    y_scale: ContinuousScale,
    x_set: &[DataValue],
    colors: &dyn ColorMapping,
    options: &AreaOptions,
    gradient_key: &str,
) -> AreaSeriesGeometry {
    let stacked = options.mode != StackMode::Standard && offsets.is_some();
    let floor = options
        .base_value
        .map_or(y_scale.range().0, |base| y_scale.apply(base));
    let order = sorted_indices(&series.series, x_scale.scale_type(), x_set);

    let mut area = Vec::with_capacity(order.len());
    let mut flat = Vec::with_capacity(order.len());
    let mut top = Vec::with_capacity(order.len());
    for index in order {
        let point = &series.series[index];
        let x = x_scale.position(&point.name);
        let (y0, y1) = match offsets.and_then(|offsets| offsets.get(index)) {
            Some(pair) if stacked => (y_scale.apply(pair.offset0), y_scale.apply(pair.offset1)),
            _ => (floor, y_scale.apply(point.value)),
        };
        area.push(AreaPoint::new(x, y0, y1));
        flat.push(AreaPoint::new(x, y0, y0));
        top.push(PathPoint::new(x, y1));
    }

    let gradient_stops = (colors.scale_type() == ScaleType::Linear).then(|| {
        if stacked {
            let pairs = offsets.unwrap_or(&[]);
            let max = finite_extent(pairs.iter().map(|pair| pair.offset1)).map_or(0.0, |e| e.1);
            let min = finite_extent(pairs.iter().map(|pair| pair.offset0)).map_or(0.0, |e| e.0);
            colors.linear_gradient_stops(max, Some(min))
        } else {
            let max = finite_extent(series.values()).map_or(0.0, |e| e.1);
            colors.linear_gradient_stops(max, None)
        }
    });

    trace!(series = %series.name, points = area.len(), "projected area series");
    AreaSeriesGeometry {
        series: series.name.clone(),
        path: area_path(&area),
        starting_path: area_path(&flat),
        line_path: line_path(&top),
        color: series_color(series, colors),
        gradient_id: gradient_stops
            .as_ref()
            .map(|_| gradient_id(gradient_key, &series.name)),
        gradient_stops,
    }
}

/// Paths and paint of one line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesGeometry {
    pub series: String,
    pub path: String,
    /// Band between each point's `min` and `max`, when the chart has ranges.
    pub range_path: Option<String>,
    pub color: String,
    pub gradient_id: Option<String>,
    pub gradient_stops: Option<Vec<GradientStop>>,
    pub range_gradient_stops: Option<Vec<GradientStop>>,
}

/// Projects one line series and, when `has_range`, its min/max band.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn line_series_geometry(
    series: &Series,
    x_scale: &Scale,
    y_scale: ContinuousScale,
    x_set: &[DataValue],
    colors: &dyn ColorMapping,
    has_range: bool,
    gradient_key: &str,
) -> LineSeriesGeometry {
    let points = sorted_points(&series.series, x_scale.scale_type(), x_set);
    let line: Vec<PathPoint> = points
        .iter()
        .map(|point| PathPoint::new(x_scale.position(&point.name), y_scale.apply(point.value)))
        .collect();

    let range_path = has_range.then(|| {
        let band: Vec<AreaPoint> = points
            .iter()
            .map(|point| {
                let low = point.min.unwrap_or(point.value);
                let high = point.max.unwrap_or(point.value);
                AreaPoint::new(
                    x_scale.position(&point.name),
                    y_scale.apply(low),
                    y_scale.apply(high),
                )
            })
            .collect();
        area_path(&band)
    });

    let (gradient_stops, range_gradient_stops) = if colors.scale_type() == ScaleType::Linear {
        let (min, max) = finite_extent(series.values()).unwrap_or((0.0, 0.0));
        (
            Some(colors.linear_gradient_stops(max, Some(min))),
            Some(colors.linear_gradient_stops(max, None)),
        )
    } else {
        (None, None)
    };

    LineSeriesGeometry {
        series: series.name.clone(),
        path: line_path(&line),
        range_path,
        color: series_color(series, colors),
        gradient_id: gradient_stops
            .as_ref()
            .map(|_| gradient_id(gradient_key, &series.name)),
        gradient_stops,
        range_gradient_stops,
    }
}

/// Marker for one data point of a line or area series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    pub value: f64,
    pub label: DataValue,
    pub tooltip_label: String,
    pub series: String,
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    /// Distance from the circle down to the bottom of the y range.
    pub height: f64,
    pub color: String,
    pub gradient_stops: Vec<GradientStop>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Circle markers for every point of a series.
#[must_use]
pub fn series_circles(
    series: &Series,
    offsets: Option<&[StackOffsets]>,
    x_scale: &Scale,
    y_scale: ContinuousScale,
    colors: &dyn ColorMapping,
    mode: StackMode,
) -> Vec<CircleGeometry> {
    series
        .series
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let pair = offsets.and_then(|offsets| offsets.get(index)).copied();
            circle_for_point(series, point, pair, x_scale, y_scale, colors, mode)
        })
        .collect()
}

/// Circle of the point whose name matches `x_value`, if the series has one.
#[must_use]
pub fn active_circle(
    series: &Series,
    offsets: Option<&[StackOffsets]>,
    x_value: &DataValue,
    x_scale: &Scale,
    y_scale: ContinuousScale,
    colors: &dyn ColorMapping,
    mode: StackMode,
) -> Option<CircleGeometry> {
    let index = series.series.iter().position(|point| point.name.matches_key(x_value))?;
    let pair = offsets.and_then(|offsets| offsets.get(index)).copied();
    Some(circle_for_point(
        series,
        &series.series[index],
        pair,
        x_scale,
        y_scale,
        colors,
        mode,
    ))
}

fn circle_for_point(
    series: &Series,
    point: &DataPoint,
    offsets: Option<StackOffsets>,
    x_scale: &Scale,
    y_scale: ContinuousScale,
    colors: &dyn ColorMapping,
    mode: StackMode,
) -> CircleGeometry {
    let plotted = match (mode, offsets) {
        (StackMode::Standard, _) | (_, None) => point.value,
        (_, Some(pair)) => pair.offset1,
    };
    let cy = y_scale.apply(plotted);
    let color = match colors.scale_type() {
        ScaleType::Linear => colors.get_color(&DataValue::Number(plotted)),
        _ => colors.get_color(&DataValue::Text(series.name.clone())),
    };

    CircleGeometry {
        value: point.value,
        label: point.name.clone(),
        tooltip_label: format_label(&point.name),
        series: series.name.clone(),
        cx: x_scale.position(&point.name),
        cy,
        radius: CIRCLE_RADIUS_PX,
        height: y_scale.range().0 - cy,
        gradient_stops: fade_in_stops(&color, 0.2),
        color,
        min: point.min,
        max: point.max,
    }
}

/// Solid color of a series: its name on ordinal schemes, its largest value
/// on linear ones.
fn series_color(series: &Series, colors: &dyn ColorMapping) -> String {
    match colors.scale_type() {
        ScaleType::Linear => {
            let max = finite_extent(series.values()).map_or(0.0, |e| e.1);
            colors.get_color(&DataValue::Number(max))
        }
        _ => colors.get_color(&DataValue::Text(series.name.clone())),
    }
}

fn gradient_id(key: &str, series: &str) -> String {
    let slug: String = series
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{key}-{slug}")
}
