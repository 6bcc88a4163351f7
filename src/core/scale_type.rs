use serde::{Deserialize, Serialize};

use crate::core::types::DataValue;

/// Kind of position mapping that governs one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    Time,
    Linear,
    Ordinal,
}

impl ScaleType {
    #[must_use]
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Time | Self::Linear)
    }
}

/// Classifies raw axis values.
///
/// All dates give `Time`, all numeric (or numeric text) give `Linear`,
/// anything else, including mixed collections and the empty slice, gives
/// `Ordinal`.
#[must_use]
pub fn infer_scale_type(values: &[DataValue]) -> ScaleType {
    infer_scale_type_with(values, true)
}

/// Same as [`infer_scale_type`], optionally ignoring the `Time` branch.
#[must_use]
pub fn infer_scale_type_with(values: &[DataValue], check_dates: bool) -> ScaleType {
    if values.is_empty() {
        return ScaleType::Ordinal;
    }
    if check_dates && values.iter().all(DataValue::is_date) {
        return ScaleType::Time;
    }
    if values.iter().all(|value| value.as_number().is_some()) {
        return ScaleType::Linear;
    }
    ScaleType::Ordinal
}
