use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::primitives::format_number;

/// Rounded flags per corner, in `[top-left, top-right, bottom-left,
/// bottom-right]` order.
pub type CornerEdges = [bool; 4];

pub const NO_EDGES: CornerEdges = [false; 4];

/// Vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Area vertex: `y0` is the floor, `y1` the top line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaPoint {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

impl AreaPoint {
    #[must_use]
    pub fn new(x: f64, y0: f64, y1: f64) -> Self {
        Self { x, y0, y1 }
    }
}

/// SVG path of a rectangle with selectively rounded corners.
///
/// Width and height are floored to whole pixels, and a zero dimension is
/// drawn as one pixel so the shape never vanishes.
#[must_use]
pub fn rounded_rect(x: f64, y: f64, width: f64, height: f64, radius: f64, edges: CornerEdges) -> String {
    let [top_left, top_right, bottom_left, bottom_right] = edges;
    let w = one_if_zero(width.floor());
    let h = one_if_zero(height.floor());
    let r = radius;
    let n = format_number;

    let mut path = format!("M{},{}h{}", n(x + r), n(y), n(w - 2.0 * r));
    if top_right {
        path.push_str(&format!("a{},{} 0 0 1 {},{}", n(r), n(r), n(r), n(r)));
    } else {
        path.push_str(&format!("h{}v{}", n(r), n(r)));
    }
    path.push_str(&format!("v{}", n(h - 2.0 * r)));
    if bottom_right {
        path.push_str(&format!("a{},{} 0 0 1 {},{}", n(r), n(r), n(-r), n(r)));
    } else {
        path.push_str(&format!("v{}h{}", n(r), n(-r)));
    }
    path.push_str(&format!("h{}", n(2.0 * r - w)));
    if bottom_left {
        path.push_str(&format!("a{},{} 0 0 1 {},{}", n(r), n(r), n(-r), n(-r)));
    } else {
        path.push_str(&format!("h{}v{}", n(-r), n(-r)));
    }
    path.push_str(&format!("v{}", n(2.0 * r - h)));
    if top_left {
        path.push_str(&format!("a{},{} 0 0 1 {},{}", n(r), n(r), n(r), n(-r)));
    } else {
        path.push_str(&format!("v{}h{}", n(-r), n(r)));
    }
    path.push('z');
    path
}

fn one_if_zero(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

/// Straight-segment polyline path. Non-finite vertices are skipped.
#[must_use]
pub fn line_path(points: &[PathPoint]) -> String {
    let mut path = String::new();
    for point in points.iter().filter(|point| point.is_finite()) {
        path.push(if path.is_empty() { 'M' } else { 'L' });
        push_pair(&mut path, point.x, point.y);
    }
    path
}

/// Closed area path: along the top line, then back along the floor.
#[must_use]
pub fn area_path(points: &[AreaPoint]) -> String {
    let defined: SmallVec<[AreaPoint; 32]> = points
        .iter()
        .copied()
        .filter(|point| point.x.is_finite() && point.y0.is_finite() && point.y1.is_finite())
        .collect();
    if defined.is_empty() {
        return String::new();
    }

    let mut path = String::new();
    for point in &defined {
        path.push(if path.is_empty() { 'M' } else { 'L' });
        push_pair(&mut path, point.x, point.y1);
    }
    for point in defined.iter().rev() {
        path.push('L');
        push_pair(&mut path, point.x, point.y0);
    }
    path.push('Z');
    path
}

pub(crate) fn push_pair(path: &mut String, x: f64, y: f64) {
    path.push_str(&format_number(x));
    path.push(',');
    path.push_str(&format_number(y));
}
