use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::{ColorMapping, GradientStop, fade_in_stops};
use crate::core::label::{escape_label, format_label, trim_label};
use crate::core::primitives::format_grouped_number;
use crate::core::types::{DataPoint, DataValue};

/// Golden ratio, the target aspect ratio of squarified rows.
const PHI: f64 = 1.618_033_988_749_895;
const LABEL_TRIM_LENGTH: usize = 55;
/// Cells smaller than this (in either direction) get no text.
const MIN_LABEL_WIDTH_PX: f64 = 70.0;
const MIN_LABEL_HEIGHT_PX: f64 = 35.0;

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TileRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TileRect {
    #[must_use]
    pub fn width(self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y1 - self.y0
    }
}

fn tile_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Splits a horizontal strip left to right, proportionally to `values`.
fn dice(values: &[f64], total: f64, x0: f64, y0: f64, x1: f64, y1: f64, out: &mut Vec<TileRect>) {
    let k = if total > 0.0 { (x1 - x0) / total } else { 0.0 };
    let mut x = x0;
    for value in values {
        let next = x + value * k;
        out.push(TileRect { x0: x, y0, x1: next, y1 });
        x = next;
    }
}

/// Splits a vertical strip top to bottom, proportionally to `values`.
fn slice(values: &[f64], total: f64, x0: f64, y0: f64, x1: f64, y1: f64, out: &mut Vec<TileRect>) {
    let k = if total > 0.0 { (y1 - y0) / total } else { 0.0 };
    let mut y = y0;
    for value in values {
        let next = y + value * k;
        out.push(TileRect { x0, y0: y, x1, y1: next });
        y = next;
    }
}

/// Squarified treemap tiling of `values` into a `width` by `height` area,
/// keeping input order.
///
/// Rows grow while adding a value keeps their worst aspect ratio from
/// getting further from the golden ratio. Non-positive values get empty
/// tiles.
#[must_use]
pub fn squarify(values: &[f64], width: f64, height: f64) -> Vec<TileRect> {
    let weights: Vec<f64> = values.iter().map(|value| tile_weight(*value)).collect();
    let n = weights.len();
    let mut tiles = Vec::with_capacity(n);
    let (mut x0, mut y0, mut x1, mut y1) = (0.0, 0.0, width.max(0.0), height.max(0.0));
    let mut remaining: f64 = weights.iter().sum();

    let mut i0 = 0;
    let mut i1 = 0;
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        let mut sum;
        loop {
            sum = weights[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min_value = sum;
        let mut max_value = sum;
        let alpha = (dy / dx).max(dx / dy) / (remaining * PHI);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let value = weights[i1];
            sum += value;
            min_value = min_value.min(value);
            max_value = max_value.max(value);
            beta = sum * sum * alpha;
            let ratio = (max_value / beta).max(beta / min_value);
            if ratio > min_ratio {
                sum -= value;
                break;
            }
            min_ratio = ratio;
            i1 += 1;
        }

        let row = &weights[i0..i1];
        if dx < dy {
            let edge = if remaining > 0.0 { y0 + dy * sum / remaining } else { y1 };
            dice(row, sum, x0, y0, x1, edge, &mut tiles);
            if remaining > 0.0 {
                y0 = edge;
            }
        } else {
            let edge = if remaining > 0.0 { x0 + dx * sum / remaining } else { x1 };
            slice(row, sum, x0, y0, edge, y1, &mut tiles);
            if remaining > 0.0 {
                x0 = edge;
            }
        }
        remaining -= sum;
        i0 = i1;
    }

    for tile in &mut tiles {
        if tile.x1 < tile.x0 {
            let mid = (tile.x0 + tile.x1) / 2.0;
            tile.x0 = mid;
            tile.x1 = mid;
        }
        if tile.y1 < tile.y0 {
            let mid = (tile.y0 + tile.y1) / 2.0;
            tile.y0 = mid;
            tile.y1 = mid;
        }
    }
    tiles
}

/// One tree map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeMapCell {
    pub label: DataValue,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub gradient_stops: Vec<GradientStop>,
    pub formatted_label: String,
    pub formatted_value: String,
    /// Whether the cell is large enough for its label.
    pub show_label: bool,
    pub tooltip_text: String,
}

#[must_use]
pub fn tree_map_cells(points: &[DataPoint], width: f64, height: f64, colors: &dyn ColorMapping) -> Vec<TreeMapCell> {
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    let tiles = squarify(&values, width, height);

    let cells: Vec<TreeMapCell> = points
        .iter()
        .zip(tiles)
        .map(|(point, tile)| {
            let label = point.display_key();
            let text = format_label(&label);
            let fill = colors.get_color(&label);
            let formatted_value = format_grouped_number(point.value);
            TreeMapCell {
                value: point.value,
                x: tile.x0,
                y: tile.y0,
                width: tile.width(),
                height: tile.height(),
                gradient_stops: fade_in_stops(&fill, 0.3),
                fill,
                formatted_label: escape_label(&trim_label(&text, LABEL_TRIM_LENGTH)),
                show_label: tile.width() >= MIN_LABEL_WIDTH_PX && tile.height() >= MIN_LABEL_HEIGHT_PX,
                tooltip_text: format!(
                    "<span class=\"tooltip-label\">{}</span><span class=\"tooltip-val\">{formatted_value}</span>",
                    escape_label(&text)
                ),
                formatted_value,
                label,
            }
        })
        .collect();
    trace!(cells = cells.len(), "laid out tree map");
    cells
}
