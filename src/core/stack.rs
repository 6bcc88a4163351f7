use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::types::{DataValue, Series};

/// How values of one group are laid out along the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackMode {
    #[default]
    Standard,
    Stacked,
    Normalized,
}

/// Interval covered by one stacked segment: the accumulator value before
/// (`offset0`) and after (`offset1`) adding the segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StackOffsets {
    pub offset0: f64,
    pub offset1: f64,
}

impl StackOffsets {
    #[must_use]
    pub fn new(offset0: f64, offset1: f64) -> Self {
        Self { offset0, offset1 }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.offset1 - self.offset0
    }
}

/// Which running total a value extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Positive,
    Negative,
}

impl Bucket {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

/// Per-traversal running totals, one per sign.
///
/// Lives only for one pass over a group; zero values land in the negative
/// bucket without moving it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StackAccumulator {
    positive: f64,
    negative: f64,
}

impl StackAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to its sign bucket and returns the covered interval.
    pub fn push(&mut self, value: f64) -> StackOffsets {
        let value = if value.is_finite() { value } else { 0.0 };
        let total = match Bucket::of(value) {
            Bucket::Positive => &mut self.positive,
            Bucket::Negative => &mut self.negative,
        };
        let offset0 = *total;
        *total += value;
        StackOffsets::new(offset0, *total)
    }

    #[must_use]
    pub fn positive_total(self) -> f64 {
        self.positive
    }

    #[must_use]
    pub fn negative_total(self) -> f64 {
        self.negative
    }
}

/// Sign-separated totals of one group, used for normalization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignTotals {
    pub positive: f64,
    /// Sum of the negative values (`<= 0`).
    pub negative: f64,
}

impl SignTotals {
    #[must_use]
    pub fn of(values: impl IntoIterator<Item = f64>) -> Self {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(Self::default(), |mut totals, value| {
                if value > 0.0 {
                    totals.positive += value;
                } else {
                    totals.negative += value;
                }
                totals
            })
    }

    /// Rescales a raw interval into percent of its own bucket's total.
    ///
    /// Positive intervals map into `[0, 100]`, negative ones into `[-100, 0]`.
    /// A zero total collapses the interval to `(0, 0)`.
    #[must_use]
    pub fn normalize(self, offsets: StackOffsets, value: f64) -> StackOffsets {
        let total = match Bucket::of(value) {
            Bucket::Positive => self.positive,
            Bucket::Negative => -self.negative,
        };
        if total > 0.0 {
            let factor = 100.0 / total;
            StackOffsets::new(offsets.offset0 * factor, offsets.offset1 * factor)
        } else {
            StackOffsets::default()
        }
    }
}

/// Offsets for one group's values in traversal order.
///
/// `Standard` returns `(0, value)` for every value; the other modes run a
/// fresh accumulator over the group.
#[must_use]
pub fn stack_values(values: &[f64], mode: StackMode) -> Vec<StackOffsets> {
    match mode {
        StackMode::Standard => values
            .iter()
            .map(|value| StackOffsets::new(0.0, *value))
            .collect(),
        StackMode::Stacked => {
            let mut accumulator = StackAccumulator::new();
            values.iter().map(|value| accumulator.push(*value)).collect()
        }
        StackMode::Normalized => {
            let totals = SignTotals::of(values.iter().copied());
            let mut accumulator = StackAccumulator::new();
            let offsets = values
                .iter()
                .map(|value| totals.normalize(accumulator.push(*value), *value))
                .collect();
            trace!(
                positive = totals.positive,
                negative = totals.negative,
                "normalized group offsets"
            );
            offsets
        }
    }
}

/// Stacks series on top of each other per x key (stacked and normalized
/// area charts).
///
/// The result mirrors `results`: `offsets[i][j]` belongs to
/// `results[i].series[j]`.
#[must_use]
pub fn stack_series_by_key(
    results: &[Series],
    x_set: &[DataValue],
    mode: StackMode,
) -> Vec<Vec<StackOffsets>> {
    let mut offsets: Vec<Vec<StackOffsets>> = results
        .iter()
        .map(|group| {
            group
                .series
                .iter()
                .map(|point| StackOffsets::new(0.0, point.value))
                .collect()
        })
        .collect();
    if mode == StackMode::Standard {
        return offsets;
    }

    for key in x_set {
        let members: Vec<(usize, usize, f64)> = results
            .iter()
            .enumerate()
            .filter_map(|(series_index, group)| {
                group
                    .series
                    .iter()
                    .position(|point| point.name.matches_key(key))
                    .map(|point_index| {
                        (series_index, point_index, group.series[point_index].value)
                    })
            })
            .collect();

        let totals = SignTotals::of(members.iter().map(|(_, _, value)| *value));
        let mut accumulator = StackAccumulator::new();
        for (series_index, point_index, value) in members {
            let raw = accumulator.push(value);
            offsets[series_index][point_index] = match mode {
                StackMode::Normalized => totals.normalize(raw, value),
                _ => raw,
            };
        }
    }
    offsets
}
