use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::arc::{LABEL_MIN_DISTANCE_PX, push_apart_labels};
use crate::core::area_series::sorted_points;
use crate::core::color::ColorMapping;
use crate::core::domain::{Domain, XDomain};
use crate::core::label::{TextAnchor, format_label};
use crate::core::primitives::{finite_extent, format_number};
use crate::core::scale::{ContinuousScale, OrdinalLayout, Scale, ScaleOptions, build_scale};
use crate::core::scale_type::ScaleType;
use crate::core::types::{DataValue, Series};
use crate::error::ChartResult;

/// Theta tick labels sit this many radii from the center.
const THETA_LABEL_FACTOR: f64 = 1.1;

/// Radius of the plot inside a `width` by `height` area, leaving room for
/// the theta labels.
#[must_use]
pub fn polar_outer_radius(width: f64, height: f64) -> f64 {
    let half_width = (width / 2.0).floor();
    let half_height = (height / 2.0).floor();
    (half_height / 1.5).min(half_width / 1.5).max(0.0)
}

/// Radius domain: data values and range bounds, floored at zero.
///
/// Without auto-scaling the domain always starts at zero; `y_axis_min_scale`
/// guarantees a minimum extent on the top end.
#[must_use]
pub fn polar_y_domain(results: &[Series], auto_scale: bool, y_axis_min_scale: Option<f64>) -> (f64, f64) {
    let values = results.iter().flat_map(|group| {
        group
            .series
            .iter()
            .flat_map(|point| [Some(point.value), point.min, point.max].into_iter().flatten())
    });
    let (data_min, data_max) = finite_extent(values).unwrap_or((0.0, 0.0));
    let min = if auto_scale { data_min.max(0.0) } else { 0.0 };
    let max = data_max.max(y_axis_min_scale.unwrap_or(0.0));
    (min, max)
}

/// Angular scale over the x domain.
///
/// The last key stops one slot short of a full turn so that it does not
/// land on top of the first.
pub fn polar_x_scale(x_domain: &XDomain, round: bool) -> ChartResult<Scale> {
    let slots = match &x_domain.domain {
        Domain::Categorical(keys) => keys.len(),
        _ => x_domain.x_set.len(),
    };
    let end = if slots > 0 { TAU - TAU / slots as f64 } else { TAU };
    let options = ScaleOptions {
        round,
        ordinal: OrdinalLayout::Point { padding: 0.0 },
    };
    build_scale(&x_domain.domain, (0.0, end), x_domain.scale_type, options)
}

/// Maps values to distances from the center.
pub fn polar_radius_scale(domain: (f64, f64), outer_radius: f64, round: bool) -> ChartResult<ContinuousScale> {
    let scale = ContinuousScale::linear(domain, (0.0, outer_radius))?;
    Ok(if round { scale.nice(10) } else { scale })
}

/// Cartesian point at `radius` along `angle`, zero pointing up.
#[must_use]
pub fn radial_point(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Spoke and label of one x key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaTick {
    pub value: DataValue,
    pub label: String,
    pub angle: f64,
    /// End of the spoke on the outer circle.
    pub start: (f64, f64),
    /// Label position, pushed apart from its neighbours.
    pub position: (f64, f64),
    pub text_anchor: TextAnchor,
}

/// Theta ticks for every key of `x_values`.
#[must_use]
pub fn theta_ticks(
    x_values: &[DataValue],
    x_scale: &Scale,
    outer_radius: f64,
    formatter: Option<&dyn Fn(&DataValue) -> String>,
) -> Vec<ThetaTick> {
    let mut ticks: Vec<ThetaTick> = x_values
        .iter()
        .map(|value| {
            let angle = x_scale.position(value);
            let side = if angle > PI { -1.0 } else { 1.0 };
            let start = radial_point(angle, outer_radius);
            ThetaTick {
                label: formatter.map_or_else(|| format_label(value), |format| format(value)),
                value: value.clone(),
                angle,
                start,
                position: (
                    THETA_LABEL_FACTOR * outer_radius * side,
                    THETA_LABEL_FACTOR * start.1,
                ),
                text_anchor: if side < 0.0 {
                    TextAnchor::End
                } else {
                    TextAnchor::Start
                },
            }
        })
        .collect();

    let mut positions: Vec<(f64, f64)> = ticks.iter().map(|tick| tick.position).collect();
    push_apart_labels(&mut positions, &[], LABEL_MIN_DISTANCE_PX);
    for (tick, position) in ticks.iter_mut().zip(positions) {
        tick.position = position;
    }
    ticks
}

/// Radii of the concentric grid circles, outermost first.
#[must_use]
pub fn radius_ticks(radius_scale: ContinuousScale, height: f64) -> Vec<f64> {
    let count = (height / 50.0).floor().max(0.0) as usize;
    let mut ticks: Vec<f64> = radius_scale
        .ticks(count)
        .into_iter()
        .map(|tick| radius_scale.apply(tick))
        .collect();
    ticks.reverse();
    ticks
}

/// Closed outline of one polar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarSeriesGeometry {
    pub series: String,
    pub path: String,
    pub points: Vec<(f64, f64)>,
    pub color: String,
}

#[must_use]
pub fn polar_series_geometry(
    series: &Series,
    x_scale: &Scale,
    radius_scale: ContinuousScale,
    x_set: &[DataValue],
    colors: &dyn ColorMapping,
) -> PolarSeriesGeometry {
    let points: Vec<(f64, f64)> = sorted_points(&series.series, x_scale.scale_type(), x_set)
        .iter()
        .map(|point| radial_point(x_scale.position(&point.name), radius_scale.apply(point.value)))
        .collect();

    let mut path = String::new();
    for (index, (x, y)) in points.iter().enumerate() {
        path.push(if index == 0 { 'M' } else { 'L' });
        path.push_str(&format_number(*x));
        path.push(',');
        path.push_str(&format_number(*y));
    }
    if !points.is_empty() {
        path.push('Z');
    }

    let color = match colors.scale_type() {
        ScaleType::Linear => {
            let max = finite_extent(series.values()).map_or(0.0, |extent| extent.1);
            colors.get_color(&DataValue::Number(max))
        }
        _ => colors.get_color(&DataValue::Text(series.name.clone())),
    };

    trace!(series = %series.name, points = points.len(), "projected polar series");
    PolarSeriesGeometry {
        series: series.name.clone(),
        path,
        points,
        color,
    }
}
