use chrono::{Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::scale::tick_step;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const WEEK_MS: f64 = 7.0 * DAY_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const YEAR_MS: f64 = 365.0 * DAY_MS;
// 1970-01-01 was a Thursday; weeks start on Sunday.
const WEEK_ORIGIN_MS: f64 = -4.0 * DAY_MS;

/// Calendar-aware tick interval for time axes (all arithmetic in UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeInterval {
    /// Fixed-duration steps aligned to `origin_ms + k * step_ms`.
    Fixed { step_ms: f64, origin_ms: f64 },
    Months(u32),
    Years(i32),
}

/// Ladder of candidate intervals with their approximate duration.
const TICK_LADDER: [(TimeInterval, f64); 17] = [
    (fixed(SECOND_MS), SECOND_MS),
    (fixed(5.0 * SECOND_MS), 5.0 * SECOND_MS),
    (fixed(15.0 * SECOND_MS), 15.0 * SECOND_MS),
    (fixed(30.0 * SECOND_MS), 30.0 * SECOND_MS),
    (fixed(MINUTE_MS), MINUTE_MS),
    (fixed(5.0 * MINUTE_MS), 5.0 * MINUTE_MS),
    (fixed(15.0 * MINUTE_MS), 15.0 * MINUTE_MS),
    (fixed(30.0 * MINUTE_MS), 30.0 * MINUTE_MS),
    (fixed(HOUR_MS), HOUR_MS),
    (fixed(3.0 * HOUR_MS), 3.0 * HOUR_MS),
    (fixed(6.0 * HOUR_MS), 6.0 * HOUR_MS),
    (fixed(12.0 * HOUR_MS), 12.0 * HOUR_MS),
    (fixed(DAY_MS), DAY_MS),
    (fixed(2.0 * DAY_MS), 2.0 * DAY_MS),
    (
        TimeInterval::Fixed {
            step_ms: WEEK_MS,
            origin_ms: WEEK_ORIGIN_MS,
        },
        WEEK_MS,
    ),
    (TimeInterval::Months(1), MONTH_MS),
    (TimeInterval::Months(3), 3.0 * MONTH_MS),
];

const fn fixed(step_ms: f64) -> TimeInterval {
    TimeInterval::Fixed {
        step_ms,
        origin_ms: 0.0,
    }
}

impl TimeInterval {
    /// Picks the interval whose duration is closest to `span / count`.
    #[must_use]
    pub fn for_span(start_ms: f64, stop_ms: f64, count: usize) -> Self {
        let (start_ms, stop_ms) = ordered(start_ms, stop_ms);
        let count = count.max(1) as f64;
        let target = (stop_ms - start_ms) / count;

        let index = TICK_LADDER.partition_point(|(_, duration)| *duration <= target);
        if index == TICK_LADDER.len() {
            let step = tick_step(start_ms / YEAR_MS, stop_ms / YEAR_MS, count).max(1.0);
            return Self::Years(step.round() as i32);
        }
        if index == 0 {
            let step = tick_step(start_ms, stop_ms, count).max(1.0);
            return fixed(step);
        }

        let (lower, lower_duration) = TICK_LADDER[index - 1];
        let (upper, upper_duration) = TICK_LADDER[index];
        if target / lower_duration < upper_duration / target {
            lower
        } else {
            upper
        }
    }

    #[must_use]
    pub fn floor(self, millis: f64) -> f64 {
        match self {
            Self::Fixed { step_ms, origin_ms } => {
                ((millis - origin_ms) / step_ms).floor() * step_ms + origin_ms
            }
            Self::Months(step) => {
                let Some(date) = unix_millis_to_datetime(millis) else {
                    return millis;
                };
                let months = i64::from(date.year()) * 12 + i64::from(date.month0());
                month_index_to_millis(months.div_euclid(i64::from(step)) * i64::from(step))
                    .unwrap_or(millis)
            }
            Self::Years(step) => {
                let Some(date) = unix_millis_to_datetime(millis) else {
                    return millis;
                };
                let year = date.year().div_euclid(step) * step;
                year_to_millis(year).unwrap_or(millis)
            }
        }
    }

    #[must_use]
    pub fn ceil(self, millis: f64) -> f64 {
        let floored = self.floor(millis);
        if floored >= millis {
            floored
        } else {
            self.offset(floored, 1)
        }
    }

    fn offset(self, millis: f64, steps: i64) -> f64 {
        match self {
            Self::Fixed { step_ms, .. } => millis + step_ms * steps as f64,
            Self::Months(step) => {
                let Some(date) = unix_millis_to_datetime(millis) else {
                    return millis;
                };
                let months = i64::from(date.year()) * 12 + i64::from(date.month0());
                month_index_to_millis(months + steps * i64::from(step)).unwrap_or(millis)
            }
            Self::Years(step) => {
                let Some(date) = unix_millis_to_datetime(millis) else {
                    return millis;
                };
                let year = i64::from(date.year()) + steps * i64::from(step);
                i32::try_from(year)
                    .ok()
                    .and_then(year_to_millis)
                    .unwrap_or(millis)
            }
        }
    }

    /// Interval boundaries inside `[start_ms, stop_ms]`, in ascending order.
    #[must_use]
    pub fn range(self, start_ms: f64, stop_ms: f64) -> Vec<f64> {
        let (start_ms, stop_ms) = ordered(start_ms, stop_ms);
        let mut ticks = Vec::new();
        let mut current = self.ceil(start_ms);
        // Hard bound so a pathological span cannot spin forever.
        while current <= stop_ms && ticks.len() < 10_000 {
            ticks.push(current);
            let next = self.offset(current, 1);
            if next <= current {
                break;
            }
            current = next;
        }
        ticks
    }
}

/// Time tick positions (unix milliseconds) for a domain and a target count.
#[must_use]
pub fn time_ticks(start_ms: f64, stop_ms: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start_ms.is_finite() || !stop_ms.is_finite() {
        return Vec::new();
    }
    if start_ms == stop_ms {
        return vec![start_ms];
    }
    let interval = TimeInterval::for_span(start_ms, stop_ms, count);
    let mut ticks = interval.range(start_ms, stop_ms);
    if stop_ms < start_ms {
        ticks.reverse();
    }
    ticks
}

/// Extends a time domain outward to interval boundaries.
#[must_use]
pub fn nice_time_domain(start_ms: f64, stop_ms: f64, count: usize) -> (f64, f64) {
    if !start_ms.is_finite() || !stop_ms.is_finite() || start_ms == stop_ms {
        return (start_ms, stop_ms);
    }
    let interval = TimeInterval::for_span(start_ms, stop_ms, count);
    if start_ms <= stop_ms {
        (interval.floor(start_ms), interval.ceil(stop_ms))
    } else {
        (interval.ceil(start_ms), interval.floor(stop_ms))
    }
}

fn ordered(start: f64, stop: f64) -> (f64, f64) {
    if stop < start { (stop, start) } else { (start, stop) }
}

fn month_index_to_millis(months: i64) -> Option<f64> {
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12)).ok()? + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .map(datetime_to_unix_millis)
}

fn year_to_millis(year: i32) -> Option<f64> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .map(datetime_to_unix_millis)
}
