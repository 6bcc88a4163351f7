use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::arc::{ArcAngles, ArcDescriptor};
use crate::core::color::ColorMapping;
use crate::core::label::{TextAnchor, format_label};
use crate::core::primitives::{finite_extent, format_grouped_number, format_number};
use crate::core::scale::ContinuousScale;
use crate::core::types::{DataPoint, DataValue};
use crate::error::ChartResult;

const ARC_RADIUS_SHARE: f64 = 0.7;
const MAX_RADIUS_PER_ARC_PX: f64 = 10.0;
const TICK_LENGTH_PX: f64 = 20.0;
const TICK_GAP_PX: f64 = 10.0;

fn default_start_angle() -> f64 {
    -120.0
}

fn default_angle_span() -> f64 {
    240.0
}

fn default_big_segments() -> usize {
    10
}

fn default_small_segments() -> usize {
    5
}

/// Angular frame and axis density of a radial gauge, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeOptions {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_start_angle")]
    pub start_angle: f64,
    #[serde(default = "default_angle_span")]
    pub angle_span: f64,
    #[serde(default = "default_big_segments")]
    pub big_segments: usize,
    #[serde(default = "default_small_segments")]
    pub small_segments: usize,
}

impl Default for GaugeOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            start_angle: default_start_angle(),
            angle_span: default_angle_span(),
            big_segments: default_big_segments(),
            small_segments: default_small_segments(),
        }
    }
}

impl GaugeOptions {
    /// Span actually swept by the arcs; never more than a full turn.
    #[must_use]
    pub fn effective_span(&self) -> f64 {
        self.angle_span.clamp(0.0, 360.0)
    }

    /// Rotation, in degrees, applied to the whole gauge so that angle zero
    /// sits at `start_angle`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        if self.start_angle < 0.0 {
            self.start_angle % 360.0 + 360.0
        } else {
            self.start_angle
        }
    }
}

/// Value domain of a gauge: the data extent, widened to the overrides.
#[must_use]
pub fn gauge_domain(values: &[f64], min: Option<f64>, max: Option<f64>) -> (f64, f64) {
    let (data_min, data_max) = finite_extent(values.iter().copied()).unwrap_or((0.0, 0.0));
    (
        min.map_or(data_min, |min| min.min(data_min)),
        max.map_or(data_max, |max| max.max(data_max)),
    )
}

/// Domain of a linear gauge; the previous value, when shown, stays in view.
#[must_use]
pub fn linear_gauge_domain(value: f64, previous: Option<f64>, min: Option<f64>, max: Option<f64>) -> (f64, f64) {
    let mut low = min.unwrap_or(0.0).min(value);
    let mut high = max.unwrap_or(100.0).max(value);
    if let Some(previous) = previous {
        low = low.min(previous);
        high = high.max(previous);
    }
    (low, high)
}

/// Maps gauge values to degrees along the swept span.
pub fn gauge_value_scale(domain: (f64, f64), options: &GaugeOptions) -> ChartResult<ContinuousScale> {
    ContinuousScale::linear(domain, (0.0, options.effective_span()))
}

/// Radii shared by the concentric arcs of a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeLayout {
    pub outer_radius: f64,
    pub radius_per_arc: f64,
    pub arc_width: f64,
    /// Room left in the middle for the value text.
    pub text_radius: f64,
    pub corner_radius: f64,
}

/// Ring sizes for `count` series inside a `width` by `height` area.
#[must_use]
pub fn gauge_layout(width: f64, height: f64, count: usize) -> GaugeLayout {
    let outer_radius = width.min(height).max(0.0) / 2.0;
    let radius_per_arc = if count == 0 {
        MAX_RADIUS_PER_ARC_PX
    } else {
        (outer_radius * ARC_RADIUS_SHARE / count as f64).min(MAX_RADIUS_PER_ARC_PX)
    };
    let arc_width = radius_per_arc * ARC_RADIUS_SHARE;
    GaugeLayout {
        outer_radius,
        radius_per_arc,
        arc_width,
        text_radius: outer_radius - count as f64 * radius_per_arc,
        corner_radius: (arc_width / 2.0).floor(),
    }
}

/// Background track and value arc of one gauge series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeArc {
    pub name: DataValue,
    pub value: f64,
    pub background: ArcDescriptor,
    pub background_path: String,
    pub arc: ArcDescriptor,
    pub path: String,
    pub color: String,
    pub aria_label: String,
}

/// One ring per point, outermost first.
#[must_use]
pub fn gauge_arcs(
    points: &[DataPoint],
    value_scale: ContinuousScale,
    layout: &GaugeLayout,
    options: &GaugeOptions,
    colors: &dyn ColorMapping,
) -> Vec<GaugeArc> {
    let span = options.effective_span();
    let track_end = span * PI / 180.0;

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let outer = layout.outer_radius - index as f64 * layout.radius_per_arc;
            let inner = outer - layout.arc_width;
            let value_end = value_scale.apply(point.value).min(span).max(0.0) * PI / 180.0;
            let background = ArcDescriptor::new(ArcAngles::new(0.0, track_end), inner, outer);
            let arc = ArcDescriptor::new(ArcAngles::new(0.0, value_end), inner, outer);
            let name = point.display_key();

            GaugeArc {
                color: colors.get_color(&name),
                aria_label: format!("{} - {}", format_label(&name), format_grouped_number(point.value)),
                name,
                value: point.value,
                background_path: background.path(),
                background,
                path: arc.path(),
                arc,
            }
        })
        .collect()
}

/// Text in the middle of the gauge: the caller's text, or the summed value.
#[must_use]
pub fn gauge_display_value(points: &[DataPoint], text_value: Option<&str>) -> String {
    match text_value {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => format_grouped_number(points.iter().map(|point| point.value).sum()),
    }
}

/// Labelled major tick of the gauge axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeTick {
    pub text: String,
    pub text_anchor: TextAnchor,
    pub path: String,
    pub text_x: f64,
    pub text_y: f64,
    /// Counter-rotation, in degrees, that keeps the text upright.
    pub text_rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GaugeTicks {
    pub big: Vec<GaugeTick>,
    pub small: Vec<String>,
}

/// Tick label anchor for a tick at `angle` degrees into the span.
#[must_use]
pub fn gauge_tick_anchor(angle: f64, start_angle: f64) -> TextAnchor {
    let actual = (start_angle + angle) % 360.0;
    if actual > 45.0 && actual <= 135.0 {
        TextAnchor::Start
    } else if actual > 225.0 && actual <= 315.0 {
        TextAnchor::End
    } else {
        TextAnchor::Middle
    }
}

/// Radial tick segment starting `start_distance` from the center.
#[must_use]
pub fn gauge_tick_path(start_distance: f64, tick_length: f64, angle: f64) -> String {
    let end = start_distance + tick_length;
    let n = format_number;
    format!(
        "M{},{}L{},{}",
        n(start_distance * angle.cos()),
        n(start_distance * angle.sin()),
        n(end * angle.cos()),
        n(end * angle.sin())
    )
}

/// Major and minor ticks around a gauge of `radius`.
///
/// A full-turn gauge drops the first major tick, which would overlap the
/// last one.
#[must_use]
pub fn gauge_ticks(
    value_scale: ContinuousScale,
    radius: f64,
    options: &GaugeOptions,
    formatter: Option<&dyn Fn(f64) -> String>,
) -> GaugeTicks {
    let mut ticks = GaugeTicks::default();
    if options.big_segments == 0 {
        debug!("gauge axis has no segments");
        return ticks;
    }

    let span = options.effective_span();
    let big_segment = span / options.big_segments as f64;
    let small_segment = big_segment / options.small_segments.max(1) as f64;
    let start_distance = radius + TICK_GAP_PX;
    let text_distance = start_distance + TICK_LENGTH_PX + TICK_GAP_PX;
    let rotation = -90.0 + options.start_angle;

    for i in 0..=options.big_segments {
        let angle_deg = i as f64 * big_segment;
        let angle = angle_deg.to_radians();

        if !(i == 0 && span == 360.0) {
            let value = value_scale.invert(angle_deg);
            ticks.big.push(GaugeTick {
                text: formatter.map_or_else(|| format_grouped_number(value), |format| format(value)),
                text_anchor: gauge_tick_anchor(angle_deg, options.start_angle),
                path: gauge_tick_path(start_distance, TICK_LENGTH_PX, angle),
                text_x: text_distance * angle.cos(),
                text_y: text_distance * angle.sin(),
                text_rotation: -rotation,
            });
        }

        if i == options.big_segments {
            continue;
        }
        for j in 1..=options.small_segments {
            let small_angle = (angle_deg + j as f64 * small_segment).to_radians();
            ticks
                .small
                .push(gauge_tick_path(start_distance, TICK_LENGTH_PX / 2.0, small_angle));
        }
    }
    ticks
}
