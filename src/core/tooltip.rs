use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::ColorMapping;
use crate::core::primitives::{format_fixed2, format_grouped_number};
use crate::core::scale::Scale;
use crate::core::scale_type::ScaleType;
use crate::core::stack::StackOffsets;
use crate::core::types::{DataValue, Series};

/// Index into `x_set` whose scaled position is nearest `x_pos`.
///
/// `x_set` must be in scale order. The search halves the interval like a
/// binary search but remembers the best candidate seen on the way, so a
/// query between two keys resolves to the nearer one. An empty set yields 0.
#[must_use]
pub fn find_closest_point_index(x_pos: f64, x_set: &[DataValue], x_scale: &Scale) -> usize {
    let mut low: isize = 0;
    let mut high: isize = x_set.len() as isize - 1;
    let mut min_diff = f64::MAX;
    let mut closest = 0;

    while low <= high {
        let current = ((low + high) / 2) as usize;
        let position = x_scale.position(&x_set[current]);
        let diff = (position - x_pos).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = current;
        }

        if position < x_pos {
            low = current as isize + 1;
        } else if position > x_pos {
            high = current as isize - 1;
        } else {
            closest = current;
            break;
        }
    }
    closest
}

/// Value shown for one series in the shared tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TooltipValue {
    Number(f64),
    /// Preformatted text, such as a percentage span.
    Text(String),
}

impl fmt::Display for TooltipValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_grouped_number(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One row of the shared tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipItem {
    pub name: DataValue,
    pub series: Option<String>,
    pub value: Option<TooltipValue>,
    pub color: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub offsets: Option<StackOffsets>,
}

/// Rows for every series that has a point at `x_value`.
///
/// Points match the key the x scale uses, or failing that its displayed
/// text, so numbers and dates match however they were keyed. `offsets` mirrors `results` for stacked
/// series.
#[must_use]
pub fn tooltip_values(
    x_value: &DataValue,
    results: &[Series],
    offsets: Option<&[Vec<StackOffsets>]>,
    colors: &dyn ColorMapping,
    show_percentage: bool,
) -> Vec<TooltipItem> {
    let wanted = x_value.to_string();
    results
        .iter()
        .enumerate()
        .filter_map(|(series_index, group)| {
            let point_index = group
                .series
                .iter()
                .position(|point| point.name.matches_key(x_value) || point.name.to_string() == wanted)?;
            let point = &group.series[point_index];
            let pair = offsets
                .and_then(|offsets| offsets.get(series_index))
                .and_then(|pairs| pairs.get(point_index))
                .copied();

            let value = match pair {
                Some(pair) if show_percentage => {
                    TooltipValue::Text(format!("{}%", format_fixed2(pair.span())))
                }
                _ => TooltipValue::Number(point.value),
            };
            let color = match colors.scale_type() {
                ScaleType::Linear => {
                    let key = match pair {
                        Some(pair) if pair.offset1 != 0.0 => pair.offset1,
                        _ => point.value,
                    };
                    colors.get_color(&DataValue::Number(key))
                }
                _ => colors.get_color(&DataValue::Text(group.name.clone())),
            };

            Some(TooltipItem {
                name: point.name.clone(),
                series: Some(group.name.clone()),
                value: Some(value),
                color,
                min: point.min,
                max: point.max,
                offsets: pair,
            })
        })
        .collect()
}

/// Plain-text tooltip row: `series: value (min - max)`.
///
/// One-sided ranges print as `(≥min)` or `(≤max)`; a missing series name
/// prints as `???`.
#[must_use]
pub fn tooltip_area_text(item: &TooltipItem) -> String {
    let mut text = item.series.clone().unwrap_or_else(|| "???".to_owned());
    text.push_str(": ");
    if let Some(value) = &item.value {
        text.push_str(&value.to_string());
    }
    match (item.min, item.max) {
        (None, None) => {}
        (Some(min), None) => text.push_str(&format!(" (\u{2265}{})", format_grouped_number(min))),
        (None, Some(max)) => text.push_str(&format!(" (\u{2264}{})", format_grouped_number(max))),
        (Some(min), Some(max)) => text.push_str(&format!(
            " ({} - {})",
            format_grouped_number(min),
            format_grouped_number(max)
        )),
    }
    text
}

/// Result of resolving a pointer position over a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipAnchor {
    /// Pixel position of the vertical guide, clamped to the plot width.
    pub position: f64,
    pub index: usize,
    pub x_value: DataValue,
    pub items: Vec<TooltipItem>,
}

/// Resolves the pointer at `x_pos` to the nearest x key and its tooltip
/// rows; `None` when there are no keys.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn tooltip_anchor(
    x_pos: f64,
    x_set: &[DataValue],
    x_scale: &Scale,
    width: f64,
    results: &[Series],
    offsets: Option<&[Vec<StackOffsets>]>,
    colors: &dyn ColorMapping,
    show_percentage: bool,
) -> Option<TooltipAnchor> {
    if x_set.is_empty() {
        return None;
    }
    let index = find_closest_point_index(x_pos, x_set, x_scale);
    let x_value = x_set[index].clone();
    let position = x_scale.position(&x_value).max(0.0).min(width);
    trace!(x_pos, index, position, "resolved tooltip anchor");
    Some(TooltipAnchor {
        position,
        index,
        items: tooltip_values(&x_value, results, offsets, colors, show_percentage),
        x_value,
    })
}
