use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::domain::Domain;
use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::scale_type::ScaleType;
use crate::core::time_scale::{nice_time_domain, time_ticks};
use crate::core::types::DataValue;
use crate::error::{ChartError, ChartResult};

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Continuous (linear or time) position mapping.
///
/// Time domains are stored as unix milliseconds. Values outside the domain
/// extrapolate linearly; a degenerate domain maps everything to the range
/// midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    scale_type: ScaleType,
    domain: (f64, f64),
    range: (f64, f64),
}

impl ContinuousScale {
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Self::with_type(ScaleType::Linear, domain, range)
    }

    /// Time scale over a domain given in unix milliseconds.
    pub fn time(domain_ms: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Self::with_type(ScaleType::Time, domain_ms, range)
    }

    fn with_type(scale_type: ScaleType, domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            scale_type,
            domain,
            range,
        })
    }

    #[must_use]
    pub fn scale_type(self) -> ScaleType {
        self.scale_type
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Maps a raw axis value; `None` when it has no continuous reading.
    #[must_use]
    pub fn apply_value(self, value: &DataValue) -> Option<f64> {
        value.as_continuous().map(|value| self.apply(value))
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { (pixel - r0) / span };
        d0 + t * (d1 - d0)
    }

    #[must_use]
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Tick positions in domain units, roughly `count` of them.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        match self.scale_type {
            ScaleType::Time => time_ticks(self.domain.0, self.domain.1, count),
            _ => linear_ticks(self.domain.0, self.domain.1, count),
        }
    }

    /// Tick values as axis keys (dates for time scales, numbers otherwise).
    #[must_use]
    pub fn tick_values(self, count: usize) -> Vec<DataValue> {
        let ticks = self.ticks(count);
        match self.scale_type {
            ScaleType::Time => ticks
                .into_iter()
                .filter_map(unix_millis_to_datetime)
                .map(DataValue::Date)
                .collect(),
            _ => ticks.into_iter().map(DataValue::Number).collect(),
        }
    }

    /// Extends the domain to round boundaries without changing its direction.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = match self.scale_type {
            ScaleType::Time => nice_time_domain(self.domain.0, self.domain.1, count),
            _ => nice_linear_domain(self.domain.0, self.domain.1, count),
        };
        self
    }
}

/// Geometry of an evenly banded range.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BandLayout {
    start: f64,
    step: f64,
    bandwidth: f64,
    reverse: bool,
}

/// Categorical scale dividing the range into equal bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    domain: IndexSet<DataValue>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
}

impl BandScale {
    #[must_use]
    pub fn new(domain: impl IntoIterator<Item = DataValue>, range: (f64, f64)) -> Self {
        Self {
            domain: domain.into_iter().collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
        }
    }

    /// Inner padding as a fraction of the step, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = sanitize_fraction(padding).min(1.0);
        self
    }

    #[must_use]
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = sanitize_fraction(padding);
        self
    }

    /// Snaps step, start and bandwidth to whole pixels.
    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<DataValue> {
        &self.domain
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn padding_inner(&self) -> f64 {
        self.padding_inner
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.layout().bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.layout().step
    }

    /// Band start for `value`, `None` for keys outside the domain.
    #[must_use]
    pub fn apply(&self, value: &DataValue) -> Option<f64> {
        let index = self.domain.get_index_of(value)?;
        let layout = self.layout();
        let index = if layout.reverse {
            self.domain.len() - 1 - index
        } else {
            index
        };
        Some(layout.start + layout.step * index as f64)
    }

    /// Band center for `value`.
    #[must_use]
    pub fn center(&self, value: &DataValue) -> Option<f64> {
        self.apply(value).map(|start| start + self.bandwidth() * 0.5)
    }

    fn layout(&self) -> BandLayout {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (mut start, stop) = if reverse { (r1, r0) } else { (r0, r1) };

        let mut step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        if self.round {
            step = step.floor();
        }
        start += (stop - start - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }

        BandLayout {
            start,
            step,
            bandwidth,
            reverse,
        }
    }
}

/// Categorical scale placing each key at a single point.
///
/// A band scale with full inner padding; the outer padding is the `padding`
/// fraction of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointScale {
    band: BandScale,
}

impl PointScale {
    #[must_use]
    pub fn new(domain: impl IntoIterator<Item = DataValue>, range: (f64, f64), padding: f64) -> Self {
        Self {
            band: BandScale::new(domain, range)
                .with_padding_inner(1.0)
                .with_padding_outer(padding),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<DataValue> {
        self.band.domain()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.band.range()
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.band.step()
    }

    #[must_use]
    pub fn apply(&self, value: &DataValue) -> Option<f64> {
        self.band.apply(value)
    }
}

/// Position mapping for one axis, tagged with its scale type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Continuous(ContinuousScale),
    Banded(BandScale),
    Point(PointScale),
}

impl Scale {
    #[must_use]
    pub fn scale_type(&self) -> ScaleType {
        match self {
            Self::Continuous(scale) => scale.scale_type(),
            Self::Banded(_) | Self::Point(_) => ScaleType::Ordinal,
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Continuous(scale) => scale.range(),
            Self::Banded(scale) => scale.range(),
            Self::Point(scale) => scale.range(),
        }
    }

    /// Pixel position of `value`, `None` when the scale cannot place it.
    #[must_use]
    pub fn try_position(&self, value: &DataValue) -> Option<f64> {
        match self {
            Self::Continuous(scale) => scale.apply_value(value),
            Self::Banded(scale) => scale.apply(value),
            Self::Point(scale) => scale.apply(value),
        }
    }

    /// Total version of [`Scale::try_position`]: unplaceable values fall back
    /// to the start of the range.
    #[must_use]
    pub fn position(&self, value: &DataValue) -> f64 {
        self.try_position(value).unwrap_or_else(|| {
            trace!(value = %value, "value outside scale domain, using range start");
            self.range().0
        })
    }

    /// Position of the band center (equal to `position` for non-band scales).
    #[must_use]
    pub fn center(&self, value: &DataValue) -> f64 {
        self.position(value) + self.bandwidth() * 0.5
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Banded(scale) => scale.bandwidth(),
            Self::Continuous(_) | Self::Point(_) => 0.0,
        }
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        match self {
            Self::Banded(scale) => scale.step(),
            Self::Point(scale) => scale.step(),
            Self::Continuous(_) => 0.0,
        }
    }

    #[must_use]
    pub fn is_banded(&self) -> bool {
        matches!(self, Self::Banded(_))
    }

    #[must_use]
    pub fn as_continuous(&self) -> Option<ContinuousScale> {
        match self {
            Self::Continuous(scale) => Some(*scale),
            _ => None,
        }
    }

    /// Domain keys: the two endpoints for continuous scales, every category
    /// otherwise.
    #[must_use]
    pub fn domain_values(&self) -> Vec<DataValue> {
        match self {
            Self::Continuous(scale) => {
                let (d0, d1) = scale.domain();
                match scale.scale_type() {
                    ScaleType::Time => [d0, d1]
                        .into_iter()
                        .filter_map(unix_millis_to_datetime)
                        .map(DataValue::Date)
                        .collect(),
                    _ => vec![DataValue::Number(d0), DataValue::Number(d1)],
                }
            }
            Self::Banded(scale) => scale.domain().iter().cloned().collect(),
            Self::Point(scale) => scale.domain().iter().cloned().collect(),
        }
    }

    /// Generated ticks; `None` for categorical scales.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Option<Vec<DataValue>> {
        self.as_continuous().map(|scale| scale.tick_values(count))
    }
}

/// Inner padding between ordinal bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InnerPadding {
    /// Desired gap in pixels, converted per band count and range length.
    Pixels(f64),
    /// Fraction of the step, written `"10%"` in text form.
    Percent(f64),
}

impl InnerPadding {
    /// Padding fraction for `count` bands over a range of `length` pixels.
    #[must_use]
    pub fn fraction(self, count: usize, length: f64) -> f64 {
        match self {
            Self::Percent(percent) => sanitize_fraction(percent / 100.0),
            Self::Pixels(pixels) => calculate_inner_padding(count, length, pixels),
        }
    }
}

impl Default for InnerPadding {
    fn default() -> Self {
        Self::Pixels(8.0)
    }
}

impl FromStr for InnerPadding {
    type Err = ChartError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        let parse = |text: &str| {
            text.trim().parse::<f64>().map_err(|_| {
                ChartError::InvalidConfig(format!("inner padding `{input}` is not a number"))
            })
        };
        if let Some(percent) = trimmed.strip_suffix('%') {
            return Ok(Self::Percent(parse(percent)?));
        }
        let pixels = trimmed.strip_suffix("px").unwrap_or(trimmed);
        Ok(Self::Pixels(parse(pixels)?))
    }
}

/// Inner padding fraction that keeps the pixel gap between `count` bands
/// close to `padding_px` whatever the number of bands.
#[must_use]
pub fn calculate_inner_padding(count: usize, length: f64, padding_px: f64) -> f64 {
    if count == 0 || !length.is_finite() || !padding_px.is_finite() || padding_px <= 0.0 {
        return 0.0;
    }
    let fraction = count as f64 / (length / padding_px + 1.0);
    sanitize_fraction(fraction).min(1.0)
}

/// How ordinal domains are laid out by [`build_scale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalLayout {
    Band { padding: InnerPadding, round: bool },
    Point { padding: f64 },
}

impl Default for OrdinalLayout {
    fn default() -> Self {
        Self::Point { padding: 0.1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleOptions {
    /// Nice-rounds continuous domains.
    #[serde(default)]
    pub round: bool,
    #[serde(default)]
    pub ordinal: OrdinalLayout,
}

impl ScaleOptions {
    #[must_use]
    pub fn rounded(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    #[must_use]
    pub fn banded(mut self, padding: InnerPadding) -> Self {
        self.ordinal = OrdinalLayout::Band {
            padding,
            round: false,
        };
        self
    }
}

/// Builds the position mapping for `domain` over `range`.
///
/// The scale type must agree with the domain shape: continuous and time
/// domains need a continuous scale type, categorical domains need `Ordinal`.
pub fn build_scale(
    domain: &Domain,
    range: (f64, f64),
    scale_type: ScaleType,
    options: ScaleOptions,
) -> ChartResult<Scale> {
    let continuous = match (scale_type, domain) {
        (ScaleType::Linear, Domain::Continuous { min, max }) => {
            Some(ContinuousScale::linear((*min, *max), range)?)
        }
        (ScaleType::Time, Domain::Time { start, end }) => Some(ContinuousScale::time(
            (datetime_to_unix_millis(*start), datetime_to_unix_millis(*end)),
            range,
        )?),
        (ScaleType::Time, Domain::Continuous { min, max }) => {
            Some(ContinuousScale::time((*min, *max), range)?)
        }
        (ScaleType::Ordinal, Domain::Categorical(_)) => None,
        (scale_type, domain) => {
            return Err(ChartError::InvalidData(format!(
                "{scale_type:?} scale cannot be built from a {} domain",
                domain.kind_name()
            )));
        }
    };

    if let Some(scale) = continuous {
        let scale = if options.round { scale.nice(10) } else { scale };
        return Ok(Scale::Continuous(scale));
    }

    let keys = domain.values();
    let scale = match options.ordinal {
        OrdinalLayout::Band { padding, round } => {
            let fraction = padding.fraction(keys.len(), (range.1 - range.0).abs());
            Scale::Banded(
                BandScale::new(keys, range)
                    .with_padding_inner(fraction)
                    .with_round(round),
            )
        }
        OrdinalLayout::Point { padding } => Scale::Point(PointScale::new(keys, range, padding)),
    };
    Ok(scale)
}

/// Step between ticks for a span, as a power of ten times 1, 2 or 5.
///
/// Negative results encode `1 / step` for steps below one.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Signed tick step between `start` and `stop`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let increment = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let magnitude = if increment < 0.0 {
        1.0 / -increment
    } else {
        increment
    };
    if reverse { -magnitude } else { magnitude }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    if !power.is_finite() {
        return None;
    }
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scaled = 10f64.powf(-power) / factor;
        i1 = (start * scaled).round() as i64;
        i2 = (stop * scaled).round() as i64;
        if (i1 as f64) / scaled < start {
            i1 += 1;
        }
        if (i2 as f64) / scaled > stop {
            i2 -= 1;
        }
        inc = -scaled;
    } else {
        let scaled = 10f64.powf(power) * factor;
        i1 = (start / scaled).round() as i64;
        i2 = (stop / scaled).round() as i64;
        if (i1 as f64) * scaled < start {
            i1 += 1;
        }
        if (i2 as f64) * scaled > stop {
            i2 -= 1;
        }
        inc = scaled;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

/// Round tick values covering `[start, stop]`, about `count` of them.
#[must_use]
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (i1..=i2)
        .map(|i| {
            if inc < 0.0 {
                i as f64 / -inc
            } else {
                i as f64 * inc
            }
        })
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Widens `[start, stop]` outward to multiples of the tick step, iterating
/// until the step settles (bounded to ten rounds).
#[must_use]
pub fn nice_linear_domain(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !stop.is_finite() || start == stop || count == 0 {
        return (start, stop);
    }
    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };
    let mut previous_step = f64::NAN;

    for _ in 0..10 {
        let step = tick_increment(lo, hi, count as f64);
        if step == previous_step || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        previous_step = step;
    }

    if reverse { (hi, lo) } else { (lo, hi) }
}

fn sanitize_fraction(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
