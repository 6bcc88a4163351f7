use serde::{Deserialize, Serialize};

use crate::core::color::ColorMapping;
use crate::core::label::{format_label, trim_label};
use crate::core::primitives::format_grouped_number;
use crate::core::types::{DataPoint, DataValue};

const ADVANCED_LABEL_TRIM_LENGTH: usize = 20;

/// One swatch of a categorical legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: DataValue,
    pub formatted_label: String,
    pub color: String,
}

/// Legend entries in domain order; keys that format identically are listed
/// once.
#[must_use]
pub fn legend_entries(domain: &[DataValue], colors: &dyn ColorMapping) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::with_capacity(domain.len());
    for key in domain {
        let formatted_label = format_label(key);
        if entries.iter().any(|entry| entry.formatted_label == formatted_label) {
            continue;
        }
        entries.push(LegendEntry {
            label: key.clone(),
            formatted_label,
            color: colors.get_color(key),
        });
    }
    entries
}

/// Row of the advanced legend: value, share of the total and color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedLegendItem {
    pub name: DataValue,
    pub value: f64,
    pub label: String,
    pub display_label: String,
    pub formatted_value: String,
    pub percentage: f64,
    pub formatted_percentage: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedLegend {
    pub items: Vec<AdvancedLegendItem>,
    pub total: f64,
    pub formatted_total: String,
}

/// Largest-remainder rounding of `values` to whole percentages summing to
/// exactly 100 (or all zero when the total is not positive).
#[must_use]
pub fn round_percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if !(total > 0.0) {
        return vec![0.0; values.len()];
    }
    let exact: Vec<f64> = values.iter().map(|value| value / total * 100.0).collect();
    let mut rounded: Vec<f64> = exact.iter().map(|share| share.floor()).collect();
    let missing = (100.0 - rounded.iter().sum::<f64>()).round().max(0.0) as usize;

    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| (exact[b] - rounded[b]).total_cmp(&(exact[a] - rounded[a])));
    for index in order.into_iter().take(missing) {
        rounded[index] += 1.0;
    }
    rounded
}

/// Advanced legend of a flat point list (pie and gauge style charts).
#[must_use]
pub fn advanced_legend(points: &[DataPoint], colors: &dyn ColorMapping, round: bool) -> AdvancedLegend {
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();
    let total: f64 = values.iter().sum();
    let percentages = if round {
        round_percentages(&values)
    } else {
        values
            .iter()
            .map(|value| if total > 0.0 { value / total * 100.0 } else { 0.0 })
            .collect()
    };

    let items = points
        .iter()
        .zip(percentages)
        .map(|(point, percentage)| {
            let key = point.display_key();
            let label = format_label(&key);
            AdvancedLegendItem {
                color: colors.get_color(&key),
                display_label: trim_label(&label, ADVANCED_LABEL_TRIM_LENGTH),
                label,
                name: point.name.clone(),
                value: point.value,
                formatted_value: format_grouped_number(point.value),
                percentage,
                formatted_percentage: format_grouped_number(percentage),
            }
        })
        .collect();

    AdvancedLegend {
        items,
        total,
        formatted_total: format_grouped_number(total),
    }
}
