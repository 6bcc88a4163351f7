use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, format_number};

/// Pixel size of the drawable chart area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn width_px(self) -> f64 {
        f64::from(self.width)
    }

    #[must_use]
    pub fn height_px(self) -> f64 {
        f64::from(self.height)
    }
}

/// Key of a data point on its positional axis.
///
/// Equality and hashing treat numbers by bit pattern (via `OrderedFloat`) and
/// dates by their millisecond timestamp so values can live in ordered sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DataValue {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
}

impl DataValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric reading of the value.
    ///
    /// Text participates when it parses as a finite number; dates never do.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            Self::Date(_) => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Continuous coordinate used by linear and time scales.
    ///
    /// Dates map to unix milliseconds.
    #[must_use]
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Self::Date(date) => Some(datetime_to_unix_millis(*date)),
            other => other.as_number(),
        }
    }

    /// Whether a point keyed by `self` sits at the axis key `key`.
    ///
    /// Linear x sets hold canonical numbers, so a numeric key also matches
    /// text that parses to the same number (`"2010"`).
    #[must_use]
    pub fn matches_key(&self, key: &Self) -> bool {
        match key {
            Self::Number(number) => self == key || self.as_number() == Some(*number),
            _ => self == key,
        }
    }

    /// Natural ordering for positional sorting: dates chronologically,
    /// numeric values numerically, everything else by display text.
    #[must_use]
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self.as_continuous(), other.as_continuous()) {
            (Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(lhs), Self::Text(rhs)) => lhs == rhs,
            (Self::Number(lhs), Self::Number(rhs)) => OrderedFloat(*lhs) == OrderedFloat(*rhs),
            (Self::Date(lhs), Self::Date(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for DataValue {}

impl Hash for DataValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(text) => text.hash(state),
            Self::Number(value) => OrderedFloat(*value).hash(state),
            Self::Date(date) => date.timestamp_millis().hash(state),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// One plotted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub name: DataValue,
    pub value: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub series: Option<String>,
}

impl DataPoint {
    #[must_use]
    pub fn new(name: impl Into<DataValue>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            label: None,
            min: None,
            max: None,
            series: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Key used on categorical axes: the explicit label when present, the
    /// name otherwise.
    #[must_use]
    pub fn display_key(&self) -> DataValue {
        match &self.label {
            Some(label) => DataValue::Text(label.clone()),
            None => self.name.clone(),
        }
    }
}

/// One named group of points (a line, a bar group, a stacked column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub series: Vec<DataPoint>,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, series: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.series.iter().map(|point| point.value).collect()
    }
}
