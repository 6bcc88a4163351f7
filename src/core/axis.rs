use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::label::{CHAR_WIDTH_PX, DEFAULT_TRIM_LENGTH, TextAnchor, format_label, tick_lines, trim_label};
use crate::core::scale::Scale;
use crate::core::shape::{NO_EDGES, rounded_rect};
use crate::core::types::DataValue;

/// Rotation step and bound, in degrees.
pub const ROTATION_STEP_DEG: f64 = 30.0;
pub const MAX_ROTATION_DEG: f64 = 90.0;
/// Hard cap on wrapped lines per label.
pub const MAX_TICK_LINES: usize = 5;
const X_LINE_HEIGHT_PX: f64 = 14.0;
const Y_LINE_HEIGHT_PX: f64 = 15.0;
const MAX_APPROX_HEIGHT_PX: f64 = 200.0;

fn default_true() -> bool {
    true
}

fn default_max_tick_length() -> usize {
    DEFAULT_TRIM_LENGTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOrientation {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

/// Horizontal or vertical marker at a fixed axis value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub name: String,
    pub value: f64,
}

/// Tick selection and label layout switches for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTickOptions {
    /// Explicit tick values; generated from the scale when `None`.
    #[serde(default)]
    pub tick_values: Option<Vec<DataValue>>,
    #[serde(default = "default_true")]
    pub trim_ticks: bool,
    #[serde(default = "default_max_tick_length")]
    pub max_tick_length: usize,
    #[serde(default = "default_true")]
    pub rotate_ticks: bool,
    #[serde(default)]
    pub wrap_ticks: bool,
    #[serde(default)]
    pub show_ref_lines: bool,
    #[serde(default)]
    pub reference_lines: Vec<ReferenceLine>,
    #[serde(default)]
    pub orientation: AxisOrientation,
}

impl Default for AxisTickOptions {
    fn default() -> Self {
        Self {
            tick_values: None,
            trim_ticks: true,
            max_tick_length: DEFAULT_TRIM_LENGTH,
            rotate_ticks: true,
            wrap_ticks: false,
            show_ref_lines: false,
            reference_lines: Vec::new(),
            orientation: AxisOrientation::Bottom,
        }
    }
}

impl AxisTickOptions {
    #[must_use]
    pub fn oriented(mut self, orientation: AxisOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    fn trim(&self, label: &str) -> String {
        if self.trim_ticks {
            trim_label(label, self.max_tick_length)
        } else {
            label.to_owned()
        }
    }
}

/// Positioned tick label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    pub value: DataValue,
    pub position: f64,
    pub label: String,
    /// Label text, one entry per rendered line.
    pub lines: Vec<String>,
}

/// Pixel placement of the reference lines of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLayout {
    pub lines: Vec<(ReferenceLine, f64)>,
    pub min_position: f64,
    pub max_position: f64,
    /// Shaded band between the outermost lines; drawn only for two or more
    /// lines.
    pub band_path: Option<String>,
}

/// Complete tick layout of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLayout {
    pub ticks: Vec<TickLabel>,
    /// Degrees, zero or a negative multiple of 30 down to -90.
    pub rotation_angle: f64,
    pub text_anchor: TextAnchor,
    /// Estimated label block height (x axes).
    pub approx_height: f64,
    /// Estimated label block width (y axes).
    pub approx_width: f64,
    pub reference: Option<ReferenceLayout>,
}

/// Evenly subsamples `ticks` down to roughly `max_ticks` entries, always
/// keeping the first.
///
/// The stride is `floor(len / max_ticks)`, so the result can overshoot: 39
/// ticks with a cap of 20 use stride 1 and keep all 39. The result always
/// stays below `2 * max_ticks`.
#[must_use]
pub fn reduce_ticks(ticks: &[DataValue], max_ticks: usize) -> Vec<DataValue> {
    if ticks.len() <= max_ticks {
        return ticks.to_vec();
    }
    if max_ticks == 0 {
        return Vec::new();
    }
    let modulus = ticks.len() / max_ticks;
    ticks
        .iter()
        .enumerate()
        .filter(|(index, _)| index % modulus == 0)
        .map(|(_, tick)| tick.clone())
        .collect()
}

/// Explicit ticks win; continuous scales generate `length / scale_spacing`
/// ticks; categorical domains are subsampled to `length / 20` entries.
fn select_ticks(scale: &Scale, tick_values: Option<&[DataValue]>, length: f64, scale_spacing: f64) -> Vec<DataValue> {
    if let Some(values) = tick_values {
        return values.to_vec();
    }
    let length = if length.is_finite() { length.max(0.0) } else { 0.0 };
    let max_ticks = (length / 20.0).floor() as usize;
    let max_scale_ticks = (length / scale_spacing).floor() as usize;
    match scale.ticks(max_scale_ticks) {
        Some(ticks) => ticks,
        None => reduce_ticks(&scale.domain_values(), max_ticks),
    }
}

#[must_use]
pub fn x_axis_ticks(scale: &Scale, tick_values: Option<&[DataValue]>, width: f64) -> Vec<DataValue> {
    select_ticks(scale, tick_values, width, 100.0)
}

#[must_use]
pub fn y_axis_ticks(scale: &Scale, tick_values: Option<&[DataValue]>, height: f64) -> Vec<DataValue> {
    select_ticks(scale, tick_values, height, 50.0)
}

/// Rotation, in degrees, that keeps the longest label inside its share of
/// the axis width.
///
/// Starts flat and tilts by -30 degrees until the projected label width
/// fits, stopping at -90.
#[must_use]
pub fn rotation_angle(labels: &[String], width: f64, max_allowed_length: usize) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let longest = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let word_width = longest.min(max_allowed_length) as f64 * CHAR_WIDTH_PX;
    let max_base_width = (width / labels.len() as f64).floor();

    let mut angle = 0.0_f64;
    let mut base_width = word_width;
    while base_width > max_base_width && angle > -MAX_ROTATION_DEG {
        angle -= ROTATION_STEP_DEG;
        base_width = angle.to_radians().cos() * word_width;
    }
    angle
}

/// Lines of a wrapped x tick label.
///
/// Only long labels on banded axes are wrapped; everything else stays on
/// one (trimmed) line.
#[must_use]
pub fn x_tick_lines(
    label: &str,
    options: &AxisTickOptions,
    bandwidth: f64,
    step: f64,
) -> Vec<String> {
    if label.chars().count() <= options.max_tick_length || bandwidth <= 0.0 {
        return vec![options.trim(label)];
    }
    let max_lines = if options.rotate_ticks {
        (step / X_LINE_HEIGHT_PX).floor().max(0.0) as usize
    } else {
        MAX_TICK_LINES
    };
    if max_lines <= 1 {
        return vec![options.trim(label)];
    }
    let possible_length = ((bandwidth / CHAR_WIDTH_PX).floor() as usize).max(options.max_tick_length);
    tick_lines(label, possible_length, max_lines.min(MAX_TICK_LINES))
}

/// Lines of a wrapped y tick label; the band height bounds the line count.
#[must_use]
pub fn y_tick_lines(label: &str, options: &AxisTickOptions, bandwidth: f64) -> Vec<String> {
    if label.chars().count() <= options.max_tick_length || bandwidth <= 0.0 {
        return vec![label.to_owned()];
    }
    let max_lines = (bandwidth / Y_LINE_HEIGHT_PX).floor().max(0.0) as usize;
    if max_lines <= 1 {
        return vec![options.trim(label)];
    }
    tick_lines(label, options.max_tick_length, max_lines.min(MAX_TICK_LINES))
}

fn format_tick(value: &DataValue, formatter: Option<&dyn Fn(&DataValue) -> String>) -> String {
    formatter.map_or_else(|| format_label(value), |format| format(value))
}

/// Position on the axis: band centers for banded scales.
fn adjusted_position(scale: &Scale, value: &DataValue) -> f64 {
    if scale.is_banded() {
        scale.center(value)
    } else {
        scale.position(value)
    }
}

fn reference_layout(
    scale: &Scale,
    lines: &[ReferenceLine],
    band: impl Fn(f64, f64) -> String,
) -> Option<ReferenceLayout> {
    let placed: Vec<(ReferenceLine, f64)> = lines
        .iter()
        .filter(|line| line.value.is_finite())
        .map(|line| (line.clone(), adjusted_position(scale, &DataValue::Number(line.value))))
        .collect();
    if placed.is_empty() {
        return None;
    }
    let min_value = placed.iter().map(|(line, _)| line.value).fold(f64::INFINITY, f64::min);
    let max_value = placed
        .iter()
        .map(|(line, _)| line.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_position = adjusted_position(scale, &DataValue::Number(min_value));
    let max_position = adjusted_position(scale, &DataValue::Number(max_value));
    let band_path = (placed.len() > 1).then(|| band(min_position, max_position));
    Some(ReferenceLayout {
        lines: placed,
        min_position,
        max_position,
        band_path,
    })
}

/// Lays out the ticks of a horizontal axis `width` pixels long.
///
/// `grid_line_height` is the plot height the reference band spans.
#[must_use]
pub fn layout_x_axis(
    scale: &Scale,
    width: f64,
    options: &AxisTickOptions,
    grid_line_height: f64,
    formatter: Option<&dyn Fn(&DataValue) -> String>,
) -> TickLayout {
    let values = x_axis_ticks(scale, options.tick_values.as_deref(), width);
    let labels: Vec<String> = values
        .iter()
        .map(|value| format_tick(value, formatter))
        .collect();

    let rotation_angle = if options.rotate_ticks {
        let measured: Vec<String> = labels.iter().map(|label| options.trim(label)).collect();
        rotation_angle(&measured, width, DEFAULT_TRIM_LENGTH)
    } else {
        0.0
    };
    let text_anchor = if rotation_angle != 0.0 {
        TextAnchor::End
    } else {
        TextAnchor::Middle
    };

    let wrap = options.wrap_ticks && scale.is_banded();
    let ticks: Vec<TickLabel> = values
        .into_iter()
        .zip(labels)
        .map(|(value, label)| {
            let lines = if wrap {
                x_tick_lines(&label, options, scale.bandwidth(), scale.step())
            } else {
                vec![options.trim(&label)]
            };
            TickLabel {
                position: adjusted_position(scale, &value),
                value,
                label,
                lines,
            }
        })
        .collect();

    let line_count = ticks
        .iter()
        .max_by_key(|tick| tick.label.chars().count())
        .map_or(1, |tick| tick.lines.len().max(1));
    let approx_height = if rotation_angle != 0.0 {
        (rotation_angle.to_radians().sin().abs() * options.max_tick_length as f64 * CHAR_WIDTH_PX).max(10.0)
    } else {
        X_LINE_HEIGHT_PX * line_count as f64
    }
    .min(MAX_APPROX_HEIGHT_PX);

    let reference = options
        .show_ref_lines
        .then(|| {
            reference_layout(scale, &options.reference_lines, |min, max| {
                rounded_rect(
                    min.min(max),
                    -grid_line_height + 25.0,
                    (max - min).abs(),
                    grid_line_height,
                    0.0,
                    NO_EDGES,
                )
            })
        })
        .flatten();

    if ticks.is_empty() {
        debug!(width, "x axis has no ticks");
    }
    trace!(ticks = ticks.len(), rotation_angle, "laid out x axis");
    TickLayout {
        ticks,
        rotation_angle,
        text_anchor,
        approx_height,
        approx_width: width.max(0.0),
        reference,
    }
}

/// Lays out the ticks of a vertical axis `height` pixels long.
///
/// `grid_line_width` is the plot width the reference band spans.
#[must_use]
pub fn layout_y_axis(
    scale: &Scale,
    height: f64,
    options: &AxisTickOptions,
    grid_line_width: f64,
    formatter: Option<&dyn Fn(&DataValue) -> String>,
) -> TickLayout {
    let values = y_axis_ticks(scale, options.tick_values.as_deref(), height);
    let bandwidth = scale.bandwidth();

    let ticks: Vec<TickLabel> = values
        .into_iter()
        .map(|value| {
            let label = format_tick(&value, formatter);
            let lines = if options.wrap_ticks {
                y_tick_lines(&label, options, bandwidth)
            } else {
                vec![options.trim(&label)]
            };
            let position = if scale.is_banded() && options.wrap_ticks && lines.len() > 1 {
                let free_space = bandwidth * 0.5 - lines.len() as f64 * 8.0 * 0.5;
                scale.position(&value) + free_space
            } else {
                adjusted_position(scale, &value)
            };
            TickLabel {
                value,
                position,
                label,
                lines,
            }
        })
        .collect();

    let approx_width = ticks
        .iter()
        .map(|tick| options.trim(&tick.label).chars().count())
        .max()
        .map_or(0.0, |chars| chars as f64 * CHAR_WIDTH_PX);

    let text_anchor = match options.orientation {
        AxisOrientation::Left => TextAnchor::End,
        AxisOrientation::Right => TextAnchor::Start,
        AxisOrientation::Top | AxisOrientation::Bottom => TextAnchor::Middle,
    };

    let reference = options
        .show_ref_lines
        .then(|| {
            reference_layout(scale, &options.reference_lines, |min, max| {
                rounded_rect(
                    0.0,
                    min.min(max),
                    grid_line_width,
                    (max - min).abs(),
                    0.0,
                    NO_EDGES,
                )
            })
        })
        .flatten();

    trace!(ticks = ticks.len(), approx_width, "laid out y axis");
    TickLayout {
        ticks,
        rotation_angle: 0.0,
        text_anchor,
        approx_height: height.max(0.0),
        approx_width,
        reference,
    }
}
