use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::primitives::{datetime_to_unix_millis, finite_extent, unix_millis_to_datetime};
use crate::core::scale_type::{ScaleType, infer_scale_type};
use crate::core::types::{DataPoint, DataValue, Series};

/// Input extent of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Domain {
    Continuous {
        min: f64,
        max: f64,
    },
    Time {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Unique keys in first-seen order.
    Categorical(Vec<DataValue>),
}

impl Domain {
    #[must_use]
    pub fn continuous(min: f64, max: f64) -> Self {
        Self::Continuous { min, max }
    }

    /// Domain as axis keys: both endpoints for continuous and time domains,
    /// every key for categorical ones.
    #[must_use]
    pub fn values(&self) -> Vec<DataValue> {
        match self {
            Self::Continuous { min, max } => vec![DataValue::Number(*min), DataValue::Number(*max)],
            Self::Time { start, end } => vec![DataValue::Date(*start), DataValue::Date(*end)],
            Self::Categorical(keys) => keys.clone(),
        }
    }

    /// Numeric bounds; time domains report unix milliseconds.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous { min, max } => Some((*min, *max)),
            Self::Time { start, end } => Some((
                datetime_to_unix_millis(*start),
                datetime_to_unix_millis(*end),
            )),
            Self::Categorical(_) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Continuous { .. } | Self::Time { .. } => 2,
            Self::Categorical(keys) => keys.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Categorical(keys) if keys.is_empty())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Self::Continuous { .. } => "continuous",
            Self::Time { .. } => "time",
            Self::Categorical(_) => "categorical",
        }
    }
}

/// Knobs shared by the value-axis domain builders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueDomainOptions {
    /// When false, zero is always part of the domain.
    #[serde(default)]
    pub auto_scale: bool,
    #[serde(default)]
    pub scale_min: Option<f64>,
    #[serde(default)]
    pub scale_max: Option<f64>,
    /// Caller tick values; folded in so none falls outside the domain.
    #[serde(default)]
    pub tick_values: Vec<f64>,
}

impl ValueDomainOptions {
    #[must_use]
    pub fn auto_scaled(mut self, auto_scale: bool) -> Self {
        self.auto_scale = auto_scale;
        self
    }

    #[must_use]
    pub fn with_scale_min(mut self, scale_min: f64) -> Self {
        self.scale_min = Some(scale_min);
        self
    }

    #[must_use]
    pub fn with_scale_max(mut self, scale_max: f64) -> Self {
        self.scale_max = Some(scale_max);
        self
    }

    #[must_use]
    pub fn with_tick_values(mut self, tick_values: Vec<f64>) -> Self {
        self.tick_values = tick_values;
        self
    }

    fn foldable_ticks(&self) -> &[f64] {
        if self.tick_values.iter().all(|tick| tick.is_finite()) {
            &self.tick_values
        } else {
            &[]
        }
    }
}

/// First-seen unique point names across every series.
#[must_use]
pub fn unique_names(results: &[Series]) -> Vec<DataValue> {
    let keys: IndexSet<DataValue> = results
        .iter()
        .flat_map(|group| group.series.iter().map(|point| point.name.clone()))
        .collect();
    keys.into_iter().collect()
}

/// First-seen unique display keys of a flat point list.
#[must_use]
pub fn categorical_domain(points: &[DataPoint]) -> Vec<DataValue> {
    let keys: IndexSet<DataValue> = points.iter().map(DataPoint::display_key).collect();
    keys.into_iter().collect()
}

/// Group axis of grouped and stacked charts: unique series names.
#[must_use]
pub fn group_domain(results: &[Series]) -> Vec<DataValue> {
    let keys: IndexSet<DataValue> = results
        .iter()
        .map(|group| DataValue::Text(group.name.clone()))
        .collect();
    keys.into_iter().collect()
}

/// Inner axis of grouped charts: unique point display keys across groups.
#[must_use]
pub fn inner_domain(results: &[Series]) -> Vec<DataValue> {
    let keys: IndexSet<DataValue> = results
        .iter()
        .flat_map(|group| group.series.iter().map(DataPoint::display_key))
        .collect();
    keys.into_iter().collect()
}

/// `[min, max]` over `values`, forcing zero in unless auto-scaled and
/// extending to include caller overrides.
///
/// An empty input yields `[0, 0]`.
#[must_use]
pub fn continuous_extent(
    values: impl IntoIterator<Item = f64>,
    options: &ValueDomainOptions,
) -> (f64, f64) {
    let zero = (!options.auto_scale).then_some(0.0);
    let extent = finite_extent(
        values
            .into_iter()
            .chain(zero)
            .chain(options.foldable_ticks().iter().copied()),
    );
    let (data_min, data_max) = extent.unwrap_or((0.0, 0.0));
    let min = options
        .scale_min
        .filter(|value| value.is_finite())
        .map_or(data_min, |scale_min| scale_min.min(data_min));
    let max = options
        .scale_max
        .filter(|value| value.is_finite())
        .map_or(data_max, |scale_max| scale_max.max(data_max));
    (min, max)
}

/// Value domain of standard (one bar per category) bar charts.
#[must_use]
pub fn standard_value_domain(values: &[f64], options: &ValueDomainOptions) -> Domain {
    let (min, max) = continuous_extent(values.iter().copied(), options);
    trace!(min, max, count = values.len(), "standard value domain");
    Domain::continuous(min, max)
}

/// Value domain of grouped (side by side) bar charts.
#[must_use]
pub fn grouped_value_domain(results: &[Series], options: &ValueDomainOptions) -> Domain {
    let values = results
        .iter()
        .flat_map(|group| group.series.iter().map(|point| point.value));
    let (min, max) = continuous_extent(values, &options.clone().auto_scaled(false));
    Domain::continuous(min, max)
}

/// Value domain of stacked bar charts.
///
/// Each group contributes its strictly-negative and strictly-positive sums;
/// the single most extreme values across all groups are kept as well.
#[must_use]
pub fn stacked_value_domain(results: &[Series], options: &ValueDomainOptions) -> Domain {
    let mut candidates = Vec::with_capacity(results.len() * 2 + 2);
    let mut smallest = 0.0_f64;
    let mut biggest = 0.0_f64;

    for group in results {
        let mut negative_sum = 0.0;
        let mut positive_sum = 0.0;
        for point in &group.series {
            let value = point.value;
            if !value.is_finite() {
                continue;
            }
            if value < 0.0 {
                negative_sum += value;
            } else if value > 0.0 {
                positive_sum += value;
            }
            smallest = smallest.min(value);
            biggest = biggest.max(value);
        }
        candidates.push(negative_sum);
        candidates.push(positive_sum);
    }
    candidates.push(smallest);
    candidates.push(biggest);

    let (min, max) = continuous_extent(candidates, &options.clone().auto_scaled(false));
    trace!(min, max, groups = results.len(), "stacked value domain");
    Domain::continuous(min, max)
}

/// Value domain of normalized (100%) charts.
#[must_use]
pub fn normalized_value_domain() -> Domain {
    Domain::continuous(0.0, 100.0)
}

/// Positional axis of line, area and polar charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XDomain {
    pub scale_type: ScaleType,
    pub domain: Domain,
    /// Every x key in scale order, used for closest-point lookup.
    pub x_set: Vec<DataValue>,
}

/// Builds the x domain from the point names of all series.
///
/// The scale type is inferred once here and carried in the result so
/// downstream consumers never re-derive it.
#[must_use]
pub fn x_domain(results: &[Series], scale_min: Option<f64>, scale_max: Option<f64>) -> XDomain {
    let values = unique_names(results);
    let scale_type = infer_scale_type(&values);
    x_domain_from_values(values, scale_type, scale_min, scale_max)
}

/// Same as [`x_domain`] for an already classified key list.
#[must_use]
pub fn x_domain_from_values(
    values: Vec<DataValue>,
    scale_type: ScaleType,
    scale_min: Option<f64>,
    scale_max: Option<f64>,
) -> XDomain {
    match scale_type {
        ScaleType::Time => {
            let mut x_set = values;
            x_set.sort_by(DataValue::natural_cmp);
            let (start, end) = x_extent(
                x_set.iter().filter_map(DataValue::as_continuous),
                scale_min,
                scale_max,
            );
            let domain = match (unix_millis_to_datetime(start), unix_millis_to_datetime(end)) {
                (Some(start), Some(end)) => Domain::Time { start, end },
                _ => Domain::continuous(start, end),
            };
            XDomain {
                scale_type,
                domain,
                x_set,
            }
        }
        ScaleType::Linear => {
            let mut x_set: Vec<DataValue> = values
                .iter()
                .filter_map(DataValue::as_number)
                .map(DataValue::Number)
                .collect();
            x_set.sort_by(DataValue::natural_cmp);
            let (min, max) =
                x_extent(x_set.iter().filter_map(DataValue::as_number), scale_min, scale_max);
            XDomain {
                scale_type,
                domain: Domain::continuous(min, max),
                x_set,
            }
        }
        ScaleType::Ordinal => XDomain {
            scale_type,
            domain: Domain::Categorical(values.clone()),
            x_set: values,
        },
    }
}

/// Data extent of an x axis with each explicit end replacing the computed
/// one, so callers can zoom in as well as out.
fn x_extent(
    values: impl IntoIterator<Item = f64>,
    scale_min: Option<f64>,
    scale_max: Option<f64>,
) -> (f64, f64) {
    let (data_min, data_max) = finite_extent(values).unwrap_or((0.0, 0.0));
    let min = scale_min.filter(|value| value.is_finite()).unwrap_or(data_min);
    let max = scale_max.filter(|value| value.is_finite()).unwrap_or(data_max);
    (min, max)
}

/// Y domain of a line chart and whether any point carries a min/max range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineYDomain {
    pub domain: Domain,
    pub has_range: bool,
}

/// Line chart y domain, including every point's range extents.
#[must_use]
pub fn line_y_domain(results: &[Series], options: &ValueDomainOptions) -> LineYDomain {
    let mut has_range = false;
    let mut values = Vec::new();
    for point in results.iter().flat_map(|group| group.series.iter()) {
        values.push(point.value);
        for bound in [point.min, point.max].into_iter().flatten() {
            has_range = true;
            values.push(bound);
        }
    }
    let (min, max) = continuous_extent(values, options);
    trace!(min, max, has_range, "line y domain");
    LineYDomain {
        domain: Domain::continuous(min, max),
        has_range,
    }
}

/// Area chart y domain; an explicit base value is always included.
#[must_use]
pub fn area_y_domain(
    results: &[Series],
    options: &ValueDomainOptions,
    base_value: Option<f64>,
) -> Domain {
    let values = results
        .iter()
        .flat_map(|group| group.series.iter().map(|point| point.value))
        .chain(base_value);
    let (min, max) = continuous_extent(values, options);
    Domain::continuous(min, max)
}

/// Stacked area y domain: per x key, the sign-bucketed sums across series.
#[must_use]
pub fn stacked_area_y_domain(
    results: &[Series],
    x_set: &[DataValue],
    options: &ValueDomainOptions,
) -> Domain {
    let mut candidates = Vec::with_capacity(x_set.len() * 2);
    for key in x_set {
        let mut positive = 0.0;
        let mut negative = 0.0;
        for group in results {
            if let Some(point) = group.series.iter().find(|point| point.name.matches_key(key)) {
                if point.value > 0.0 {
                    positive += point.value;
                } else if point.value < 0.0 {
                    negative += point.value;
                }
            }
        }
        candidates.push(positive);
        candidates.push(negative);
    }
    if candidates.is_empty() {
        debug!("stacked area domain built from empty input");
    }
    let (min, max) = continuous_extent(candidates, &options.clone().auto_scaled(false));
    Domain::continuous(min, max)
}
