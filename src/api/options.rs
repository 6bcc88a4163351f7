use serde::{Deserialize, Serialize};

use crate::core::axis::AxisTickOptions;
use crate::core::bar::{BarOrientation, DEFAULT_BAR_PADDING_PX, DEFAULT_GROUP_PADDING_PX};
use crate::core::color::{ColorHelper, ColorScheme, CustomColor};
use crate::core::gauge::GaugeOptions;
use crate::core::heat_map::HeatMapPadding;
use crate::core::{DataValue, ScaleType, StackMode, ValueDomainOptions};
use crate::error::{ChartError, ChartResult};

/// Palette selection shared by every chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorOptions {
    /// Built-in scheme name; ignored when `palette` is set.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Explicit palette of CSS hex colors.
    #[serde(default)]
    pub palette: Option<Vec<String>>,
    #[serde(default = "default_color_scale_type")]
    pub scale_type: ScaleType,
    #[serde(default)]
    pub custom_colors: Vec<CustomColor>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            palette: None,
            scale_type: default_color_scale_type(),
            custom_colors: Vec::new(),
        }
    }
}

impl ColorOptions {
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    #[must_use]
    pub fn with_scale_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    pub fn resolve_scheme(&self) -> ChartResult<ColorScheme> {
        match &self.palette {
            Some(palette) => ColorScheme::new("custom", palette.clone()),
            None => ColorScheme::named(&self.scheme).ok_or_else(|| {
                ChartError::InvalidConfig(format!("unknown color scheme `{}`", self.scheme))
            }),
        }
    }

    /// Color helper over `domain`: ordinal keys, or `[min, max]` for linear
    /// schemes.
    pub fn helper(&self, domain: Vec<DataValue>) -> ChartResult<ColorHelper> {
        let helper = ColorHelper::new(self.resolve_scheme()?, self.scale_type, domain)?;
        Ok(helper.with_custom_colors(self.custom_colors.clone()))
    }
}

/// Bar chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartOptions {
    #[serde(default)]
    pub orientation: BarOrientation,
    /// Layout of multi-series input: `standard` groups bars side by side.
    #[serde(default)]
    pub mode: StackMode,
    #[serde(default)]
    pub value_domain: ValueDomainOptions,
    #[serde(default)]
    pub round_domains: bool,
    #[serde(default = "default_bar_padding")]
    pub bar_padding: f64,
    #[serde(default = "default_group_padding")]
    pub group_padding: f64,
    #[serde(default = "default_true")]
    pub round_edges: bool,
    #[serde(default = "default_true")]
    pub no_bar_when_zero: bool,
    #[serde(default)]
    pub tooltip_disabled: bool,
    #[serde(default)]
    pub category_axis: AxisTickOptions,
    #[serde(default)]
    pub value_axis: AxisTickOptions,
    #[serde(default)]
    pub colors: ColorOptions,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        Self {
            orientation: BarOrientation::Vertical,
            mode: StackMode::Standard,
            value_domain: ValueDomainOptions::default(),
            round_domains: false,
            bar_padding: default_bar_padding(),
            group_padding: default_group_padding(),
            round_edges: true,
            no_bar_when_zero: true,
            tooltip_disabled: false,
            category_axis: AxisTickOptions::default(),
            value_axis: AxisTickOptions::default(),
            colors: ColorOptions::default(),
        }
    }
}

impl BarChartOptions {
    #[must_use]
    pub fn new(orientation: BarOrientation, mode: StackMode) -> Self {
        Self {
            orientation,
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value_domain(mut self, value_domain: ValueDomainOptions) -> Self {
        self.value_domain = value_domain;
        self
    }

    #[must_use]
    pub fn with_round_domains(mut self, round_domains: bool) -> Self {
        self.round_domains = round_domains;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorOptions) -> Self {
        self.colors = colors;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        ensure_padding(self.bar_padding, "bar padding")?;
        ensure_padding(self.group_padding, "group padding")
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        to_json_pretty(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = from_json_str(input)?;
        options.validate()?;
        Ok(options)
    }
}

/// Which shape a line/area chart draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAreaKind {
    #[default]
    Line,
    Area,
    StackedArea,
    NormalizedArea,
}

impl LineAreaKind {
    #[must_use]
    pub fn stack_mode(self) -> StackMode {
        match self {
            Self::Line | Self::Area => StackMode::Standard,
            Self::StackedArea => StackMode::Stacked,
            Self::NormalizedArea => StackMode::Normalized,
        }
    }
}

/// Line and area chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartOptions {
    #[serde(default)]
    pub kind: LineAreaKind,
    #[serde(default)]
    pub value_domain: ValueDomainOptions,
    #[serde(default)]
    pub x_scale_min: Option<f64>,
    #[serde(default)]
    pub x_scale_max: Option<f64>,
    #[serde(default)]
    pub round_domains: bool,
    /// Fill floor of plain area charts.
    #[serde(default)]
    pub base_value: Option<f64>,
    /// Caller-owned prefix that keeps gradient ids unique per chart.
    #[serde(default = "default_gradient_key")]
    pub gradient_key: String,
    #[serde(default)]
    pub show_percentage: bool,
    #[serde(default)]
    pub x_axis: AxisTickOptions,
    #[serde(default)]
    pub y_axis: AxisTickOptions,
    #[serde(default)]
    pub colors: ColorOptions,
}

impl Default for LineChartOptions {
    fn default() -> Self {
        Self {
            kind: LineAreaKind::Line,
            value_domain: ValueDomainOptions::default(),
            x_scale_min: None,
            x_scale_max: None,
            round_domains: false,
            base_value: None,
            gradient_key: default_gradient_key(),
            show_percentage: false,
            x_axis: AxisTickOptions::default(),
            y_axis: AxisTickOptions::default(),
            colors: ColorOptions::default(),
        }
    }
}

impl LineChartOptions {
    #[must_use]
    pub fn new(kind: LineAreaKind) -> Self {
        Self {
            kind,
            show_percentage: kind == LineAreaKind::NormalizedArea,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_value_domain(mut self, value_domain: ValueDomainOptions) -> Self {
        self.value_domain = value_domain;
        self
    }

    #[must_use]
    pub fn with_x_scale_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.x_scale_min = min;
        self.x_scale_max = max;
        self
    }

    #[must_use]
    pub fn with_base_value(mut self, base_value: f64) -> Self {
        self.base_value = Some(base_value);
        self
    }

    #[must_use]
    pub fn with_gradient_key(mut self, gradient_key: impl Into<String>) -> Self {
        self.gradient_key = gradient_key.into();
        self
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        to_json_pretty(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        from_json_str(input)
    }
}

/// Pie and doughnut configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartOptions {
    #[serde(default)]
    pub doughnut: bool,
    /// Ring thickness of doughnuts, as a fraction of the outer radius.
    #[serde(default = "default_arc_width")]
    pub arc_width: f64,
    #[serde(default)]
    pub explode_slices: bool,
    #[serde(default)]
    pub show_labels: bool,
    /// Rounds legend percentages so they sum to 100.
    #[serde(default = "default_true")]
    pub round_legend: bool,
    #[serde(default)]
    pub colors: ColorOptions,
}

impl Default for PieChartOptions {
    fn default() -> Self {
        Self {
            doughnut: false,
            arc_width: default_arc_width(),
            explode_slices: false,
            show_labels: false,
            round_legend: true,
            colors: ColorOptions::default(),
        }
    }
}

impl PieChartOptions {
    #[must_use]
    pub fn doughnut(mut self, arc_width: f64) -> Self {
        self.doughnut = true;
        self.arc_width = arc_width;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.arc_width.is_finite() || !(0.0..=1.0).contains(&self.arc_width) {
            return Err(ChartError::InvalidConfig(format!(
                "arc width must be within [0, 1], got {}",
                self.arc_width
            )));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        to_json_pretty(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = from_json_str(input)?;
        options.validate()?;
        Ok(options)
    }
}

/// Gauge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeChartOptions {
    #[serde(default)]
    pub gauge: GaugeOptions,
    #[serde(default = "default_true")]
    pub show_axis: bool,
    /// Fixed center text; the formatted total is shown when `None`.
    #[serde(default)]
    pub text_value: Option<String>,
    #[serde(default)]
    pub colors: ColorOptions,
}

impl Default for GaugeChartOptions {
    fn default() -> Self {
        Self {
            gauge: GaugeOptions::default(),
            show_axis: true,
            text_value: None,
            colors: ColorOptions::default(),
        }
    }
}

impl GaugeChartOptions {
    #[must_use]
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.gauge.min = Some(min);
        self.gauge.max = Some(max);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let gauge = &self.gauge;
        if !gauge.start_angle.is_finite() || !gauge.angle_span.is_finite() {
            return Err(ChartError::InvalidConfig(
                "gauge angles must be finite".to_owned(),
            ));
        }
        if let (Some(min), Some(max)) = (gauge.min, gauge.max)
            && min > max
        {
            return Err(ChartError::InvalidConfig(format!(
                "gauge min {min} exceeds max {max}"
            )));
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        to_json_pretty(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = from_json_str(input)?;
        options.validate()?;
        Ok(options)
    }
}

/// Heat map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapOptions {
    #[serde(default)]
    pub padding: HeatMapPadding,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub x_axis: AxisTickOptions,
    #[serde(default)]
    pub y_axis: AxisTickOptions,
    #[serde(default = "default_heat_map_colors")]
    pub colors: ColorOptions,
}

impl Default for HeatMapOptions {
    fn default() -> Self {
        Self {
            padding: HeatMapPadding::default(),
            min: None,
            max: None,
            x_axis: AxisTickOptions::default(),
            y_axis: AxisTickOptions::default(),
            colors: default_heat_map_colors(),
        }
    }
}

impl HeatMapOptions {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        to_json_pretty(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        from_json_str(input)
    }
}

fn to_json_pretty<T: Serialize>(options: &T) -> ChartResult<String> {
    serde_json::to_string_pretty(options)
        .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
}

fn from_json_str<T: for<'de> Deserialize<'de>>(input: &str) -> ChartResult<T> {
    serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
}

fn ensure_padding(value: f64, what: &str) -> ChartResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "{what} must be finite and >= 0, got {value}"
        )));
    }
    Ok(())
}

fn default_scheme() -> String {
    "cool".to_owned()
}

fn default_color_scale_type() -> ScaleType {
    ScaleType::Ordinal
}

fn default_heat_map_colors() -> ColorOptions {
    ColorOptions::default().with_scale_type(ScaleType::Linear)
}

fn default_true() -> bool {
    true
}

fn default_bar_padding() -> f64 {
    DEFAULT_BAR_PADDING_PX
}

fn default_group_padding() -> f64 {
    DEFAULT_GROUP_PADDING_PX
}

fn default_arc_width() -> f64 {
    0.25
}

fn default_gradient_key() -> String {
    "chart".to_owned()
}
