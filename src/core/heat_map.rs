use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::color::{ColorMapping, GradientStop, fade_in_stops};
use crate::core::label::{escape_label, format_label};
use crate::core::primitives::{finite_extent, format_grouped_number};
use crate::core::scale::{BandScale, InnerPadding};
use crate::core::scale_type::{ScaleType, infer_scale_type_with};
use crate::core::types::{DataValue, Series};

const BACKGROUND_FILL: &str = "rgba(200,200,200,0.03)";
const BACKGROUND_CORNER_RADIUS_PX: f64 = 3.0;

/// Domains of a heat map: columns are series, rows are point names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapDomains {
    pub x_domain: Vec<DataValue>,
    pub y_domain: Vec<DataValue>,
    /// Unique cell values in first-seen order.
    pub value_domain: Vec<DataValue>,
}

#[must_use]
pub fn heat_map_domains(results: &[Series]) -> HeatMapDomains {
    let mut x_domain = IndexSet::new();
    let mut y_domain = IndexSet::new();
    let mut value_domain = IndexSet::new();
    for group in results {
        x_domain.insert(DataValue::Text(group.name.clone()));
        for point in &group.series {
            y_domain.insert(point.name.clone());
            value_domain.insert(DataValue::Number(point.value));
        }
    }
    HeatMapDomains {
        x_domain: x_domain.into_iter().collect(),
        y_domain: y_domain.into_iter().collect(),
        value_domain: value_domain.into_iter().collect(),
    }
}

/// Scale type of the color axis; dates are never considered here.
#[must_use]
pub fn heat_map_value_scale_type(domains: &HeatMapDomains) -> ScaleType {
    infer_scale_type_with(&domains.value_domain, false)
}

/// Color domain: `[min(0, values), max(values)]` for linear values, with
/// each end replaced by its override when given. Ordinal values pass
/// through unchanged.
#[must_use]
pub fn heat_map_color_domain(
    domains: &HeatMapDomains,
    scale_type: ScaleType,
    min: Option<f64>,
    max: Option<f64>,
) -> Vec<DataValue> {
    if scale_type != ScaleType::Linear {
        return domains.value_domain.clone();
    }
    let values = domains.value_domain.iter().filter_map(DataValue::as_number);
    let (data_min, data_max) = finite_extent(values).unwrap_or((0.0, 0.0));
    vec![
        DataValue::Number(min.unwrap_or(data_min.min(0.0))),
        DataValue::Number(max.unwrap_or(data_max)),
    ]
}

/// Inner padding per heat map axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatMapPadding {
    pub x: InnerPadding,
    pub y: InnerPadding,
}

impl HeatMapPadding {
    #[must_use]
    pub fn uniform(padding: InnerPadding) -> Self {
        Self {
            x: padding,
            y: padding,
        }
    }
}

impl Default for HeatMapPadding {
    fn default() -> Self {
        Self::uniform(InnerPadding::default())
    }
}

/// Column and row scales; rows run bottom to top.
#[must_use]
pub fn heat_map_scales(
    domains: &HeatMapDomains,
    width: f64,
    height: f64,
    padding: HeatMapPadding,
) -> (BandScale, BandScale) {
    let x_fraction = padding.x.fraction(domains.x_domain.len(), width);
    let y_fraction = padding.y.fraction(domains.y_domain.len(), height);
    let x_scale = BandScale::new(domains.x_domain.iter().cloned(), (0.0, width))
        .with_round(true)
        .with_padding_inner(x_fraction);
    let y_scale = BandScale::new(domains.y_domain.iter().cloned(), (height, 0.0))
        .with_round(true)
        .with_padding_inner(y_fraction);
    (x_scale, y_scale)
}

/// Faint placeholder rectangle under every possible cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub fill: String,
}

#[must_use]
pub fn heat_map_background(x_scale: &BandScale, y_scale: &BandScale) -> Vec<HeatMapRect> {
    let mut rects = Vec::with_capacity(x_scale.domain().len() * y_scale.domain().len());
    for column in x_scale.domain() {
        for row in y_scale.domain() {
            rects.push(HeatMapRect {
                x: x_scale.apply(column).unwrap_or(0.0),
                y: y_scale.apply(row).unwrap_or(0.0),
                width: x_scale.bandwidth(),
                height: y_scale.bandwidth(),
                rx: BACKGROUND_CORNER_RADIUS_PX,
                fill: BACKGROUND_FILL.to_owned(),
            });
        }
    }
    rects
}

/// One colored heat map cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapCell {
    pub series: String,
    pub name: DataValue,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub gradient_stops: Vec<GradientStop>,
    pub tooltip_text: String,
}

#[must_use]
pub fn heat_map_cells(
    results: &[Series],
    x_scale: &BandScale,
    y_scale: &BandScale,
    colors: &dyn ColorMapping,
) -> Vec<HeatMapCell> {
    let cells: Vec<HeatMapCell> = results
        .iter()
        .flat_map(|group| {
            let column = DataValue::Text(group.name.clone());
            let x = x_scale.apply(&column).unwrap_or(0.0);
            group.series.iter().map(move |point| {
                let fill = colors.get_color(&DataValue::Number(point.value));
                let label = format!("{} \u{2022} {}", group.name, format_label(&point.display_key()));
                HeatMapCell {
                    series: group.name.clone(),
                    name: point.name.clone(),
                    value: point.value,
                    x,
                    y: y_scale.apply(&point.name).unwrap_or(0.0),
                    width: x_scale.bandwidth(),
                    height: y_scale.bandwidth(),
                    gradient_stops: fade_in_stops(&fill, 0.2),
                    fill,
                    tooltip_text: format!(
                        "<span class=\"tooltip-label\">{}</span><span class=\"tooltip-val\">{}</span>",
                        escape_label(&label),
                        format_grouped_number(point.value)
                    ),
                }
            })
        })
        .collect();
    trace!(cells = cells.len(), "projected heat map cells");
    cells
}
