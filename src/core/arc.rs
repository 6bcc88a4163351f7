use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::ColorMapping;
use crate::core::label::{TextAnchor, format_label};
use crate::core::primitives::{finite_extent, format_grouped_number, format_number};
use crate::core::types::{DataPoint, DataValue};

const EPSILON: f64 = 1e-12;
/// Labels sit on a ring this many outer radii from the center.
const LABEL_RADIUS_FACTOR: f64 = 1.5;
/// Minimum vertical gap between two labels on the same side.
pub const LABEL_MIN_DISTANCE_PX: f64 = 10.0;

/// Angular span in radians, measured clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcAngles {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcAngles {
    #[must_use]
    pub fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
        }
    }

    #[must_use]
    pub fn mid_angle(self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Annular sector centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcDescriptor {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcDescriptor {
    #[must_use]
    pub fn new(angles: ArcAngles, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            start_angle: angles.start_angle,
            end_angle: angles.end_angle,
            inner_radius,
            outer_radius,
        }
    }

    #[must_use]
    pub fn angles(self) -> ArcAngles {
        ArcAngles::new(self.start_angle, self.end_angle)
    }

    /// Point halfway along both the angle and the radius.
    #[must_use]
    pub fn centroid(self) -> (f64, f64) {
        let radius = (self.inner_radius + self.outer_radius) / 2.0;
        polar_to_xy(radius, self.angles().mid_angle())
    }

    /// SVG path of the sector; a full turn is drawn as two half arcs.
    #[must_use]
    pub fn path(self) -> String {
        let (mut r0, mut r1) = (self.inner_radius, self.outer_radius);
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        if !(r1 > EPSILON) {
            return "M0,0Z".to_owned();
        }

        let a0 = self.start_angle - FRAC_PI_2;
        let a1 = self.end_angle - FRAC_PI_2;
        let delta = (a1 - a0).abs();
        let clockwise = u8::from(a1 > a0);
        let counter = 1 - clockwise;
        let n = format_number;

        if delta > TAU - EPSILON {
            let mut path = format!("M{},{}", n(r1 * a0.cos()), n(r1 * a0.sin()));
            push_half_turns(&mut path, r1, a0, clockwise);
            if r0 > EPSILON {
                path.push_str(&format!("M{},{}", n(r0 * a1.cos()), n(r0 * a1.sin())));
                push_half_turns(&mut path, r0, a1, counter);
            }
            path.push('Z');
            return path;
        }

        let large = u8::from(delta >= PI);
        let mut path = format!(
            "M{},{}A{},{},0,{large},{clockwise},{},{}",
            n(r1 * a0.cos()),
            n(r1 * a0.sin()),
            n(r1),
            n(r1),
            n(r1 * a1.cos()),
            n(r1 * a1.sin()),
        );
        if r0 > EPSILON {
            path.push_str(&format!(
                "L{},{}A{},{},0,{large},{counter},{},{}",
                n(r0 * a1.cos()),
                n(r0 * a1.sin()),
                n(r0),
                n(r0),
                n(r0 * a0.cos()),
                n(r0 * a0.sin()),
            ));
        } else {
            path.push_str("L0,0");
        }
        path.push('Z');
        path
    }
}

fn push_half_turns(path: &mut String, radius: f64, angle: f64, sweep: u8) {
    let n = format_number;
    let (x, y) = (radius * angle.cos(), radius * angle.sin());
    path.push_str(&format!(
        "A{r},{r},0,1,{sweep},{},{}A{r},{r},0,1,{sweep},{},{}",
        n(-x),
        n(-y),
        n(x),
        n(y),
        r = n(radius),
    ));
}

/// Cartesian point of `radius` at `angle` (clockwise from 12 o'clock).
#[must_use]
pub fn polar_to_xy(radius: f64, angle: f64) -> (f64, f64) {
    let a = angle - FRAC_PI_2;
    (radius * a.cos(), radius * a.sin())
}

/// Cumulative angular spans over a full turn, in input order.
///
/// Non-positive and non-finite values get an empty span; an all-zero input
/// collapses every span to zero.
#[must_use]
pub fn pie_angles(values: &[f64]) -> Vec<ArcAngles> {
    let usable = |value: f64| if value.is_finite() && value > 0.0 { value } else { 0.0 };
    let sum: f64 = values.iter().map(|value| usable(*value)).sum();
    let factor = if sum > 0.0 { TAU / sum } else { 0.0 };

    let mut angle = 0.0;
    values
        .iter()
        .map(|value| {
            let start = angle;
            angle += usable(*value) * factor;
            ArcAngles::new(start, angle)
        })
        .collect()
}

/// Linear transition between two angular states at `t` in `[0, 1]`.
#[must_use]
pub fn interpolate_angles(from: ArcAngles, to: ArcAngles, t: f64) -> ArcAngles {
    let t = t.clamp(0.0, 1.0);
    ArcAngles::new(
        from.start_angle + (to.start_angle - from.start_angle) * t,
        from.end_angle + (to.end_angle - from.end_angle) * t,
    )
}

/// Outer radius of a slice when exploded slices are enabled: proportional
/// to `value / max` for plain pies, unchanged for doughnuts.
#[must_use]
pub fn exploded_outer_radius(outer_radius: f64, inner_radius: f64, value: f64, max: f64, explode: bool) -> f64 {
    if explode && inner_radius == 0.0 && max > 0.0 {
        outer_radius * value / max
    } else {
        outer_radius
    }
}

/// `(inner, outer)` pie radii for a drawing area.
///
/// Labels need room around the pie, so the outer radius shrinks to a third
/// of the short side instead of half. Doughnuts keep an `arc_width` fraction
/// of the radius.
#[must_use]
pub fn pie_radii(width: f64, height: f64, show_labels: bool, doughnut: bool, arc_width: f64) -> (f64, f64) {
    let side = width.min(height).max(0.0);
    let outer = if show_labels { side / 3.0 } else { side / 2.0 };
    let inner = if doughnut {
        outer * (1.0 - arc_width.clamp(0.0, 1.0))
    } else {
        0.0
    };
    (inner, outer)
}

/// Whether a slice is wide enough to carry a label.
#[must_use]
pub fn label_visible(show_labels: bool, angles: ArcAngles) -> bool {
    show_labels && angles.span() > PI / 30.0
}

#[must_use]
pub fn text_anchor_for(angles: ArcAngles) -> TextAnchor {
    if angles.mid_angle() < PI {
        TextAnchor::Start
    } else {
        TextAnchor::End
    }
}

/// Pushes overlapping labels apart, keeping at least `min_distance`
/// vertically between labels on the same side. Hidden labels are skipped.
pub fn push_apart_labels(positions: &mut [(f64, f64)], visible: &[bool], min_distance: f64) {
    let is_visible = |index: usize| visible.get(index).copied().unwrap_or(true);
    for i in 0..positions.len().saturating_sub(1) {
        if !is_visible(i) {
            continue;
        }
        for j in i + 1..positions.len() {
            if !is_visible(j) {
                continue;
            }
            let a = positions[i];
            let b = positions[j];
            if a.0 * b.0 > 0.0 {
                let overlap = min_distance - (b.1 - a.1).abs();
                if overlap > 0.0 {
                    positions[j].1 += b.0.signum() * overlap;
                }
            }
        }
    }
}

/// Label anchor of every slice: on the outer label ring at the slice's mid
/// angle, pulled to the left or right edge of the ring.
#[must_use]
pub fn pie_label_positions(angles: &[ArcAngles], outer_radius: f64, show_labels: bool) -> Vec<(f64, f64)> {
    let ring = LABEL_RADIUS_FACTOR * outer_radius;
    let mut positions: Vec<(f64, f64)> = angles
        .iter()
        .map(|angles| {
            let (_, y) = polar_to_xy(ring, angles.mid_angle());
            let side = if angles.mid_angle() < PI { 1.0 } else { -1.0 };
            (ring * side, y)
        })
        .collect();
    let visible: Vec<bool> = angles
        .iter()
        .map(|angles| label_visible(show_labels, *angles))
        .collect();
    push_apart_labels(&mut positions, &visible, LABEL_MIN_DISTANCE_PX);
    positions
}

/// Leader line from the slice edge, out to the label ring, then across to
/// the label.
#[must_use]
pub fn pie_label_line(angles: ArcAngles, start_radius: f64, label_position: (f64, f64)) -> String {
    let inner = ArcDescriptor::new(angles, start_radius, start_radius).centroid();
    let scale = if label_position.1 == 0.0 || inner.1 == 0.0 {
        1.0
    } else {
        label_position.1 / inner.1
    };
    let outer = (inner.0 * scale, inner.1 * scale);
    let n = format_number;
    format!(
        "M{},{}L{},{}L{},{}",
        n(inner.0),
        n(inner.1),
        n(outer.0),
        n(outer.1),
        n(label_position.0),
        n(label_position.1)
    )
}

/// Label of one pie slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub text_anchor: TextAnchor,
    pub line: String,
}

/// Slice of a pie or doughnut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: DataValue,
    pub formatted_label: String,
    pub value: f64,
    pub arc: ArcDescriptor,
    pub path: String,
    pub centroid: (f64, f64),
    pub color: String,
    pub aria_label: String,
    pub label_visible: bool,
    pub text_label: Option<PieLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieLayout {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub explode_slices: bool,
    pub show_labels: bool,
}

/// Lays out every point of a pie as a slice, with labels when enabled.
#[must_use]
pub fn pie_slices(points: &[DataPoint], colors: &dyn ColorMapping, layout: &PieLayout) -> Vec<PieSlice> {
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    let angles = pie_angles(&values);
    let max = finite_extent(values.iter().copied()).map_or(0.0, |extent| extent.1);
    let positions = pie_label_positions(&angles, layout.outer_radius, layout.show_labels);

    let slices: Vec<PieSlice> = points
        .iter()
        .zip(angles)
        .zip(positions)
        .map(|((point, angles), position)| {
            let outer = exploded_outer_radius(
                layout.outer_radius,
                layout.inner_radius,
                point.value,
                max,
                layout.explode_slices,
            );
            let arc = ArcDescriptor::new(angles, layout.inner_radius, outer);
            let label = point.display_key();
            let formatted_label = format_label(&label);
            let visible = label_visible(layout.show_labels, angles);
            let text_label = visible.then(|| PieLabel {
                text: formatted_label.clone(),
                x: position.0,
                y: position.1,
                text_anchor: text_anchor_for(angles),
                line: pie_label_line(angles, outer, position),
            });

            PieSlice {
                color: colors.get_color(&label),
                aria_label: format!("{formatted_label} - {}", format_grouped_number(point.value)),
                label,
                formatted_label,
                value: point.value,
                path: arc.path(),
                centroid: arc.centroid(),
                arc,
                label_visible: visible,
                text_label,
            }
        })
        .collect();

    trace!(slices = slices.len(), "laid out pie");
    slices
}
