use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::finite_extent;
use crate::core::scale_type::ScaleType;
use crate::core::types::DataValue;
use crate::error::{ChartError, ChartResult};

/// One point of a color gradient; `offset` is a percentage in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

impl GradientStop {
    #[must_use]
    pub fn new(offset: f64, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            offset,
            color: color.into(),
            opacity,
        }
    }
}

/// Two-stop gradient of a single color fading in from `start_opacity`.
#[must_use]
pub fn fade_in_stops(color: &str, start_opacity: f64) -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, color, start_opacity),
        GradientStop::new(100.0, color, 1.0),
    ]
}

/// Color capability consumed by the geometry builders.
pub trait ColorMapping: Send + Sync {
    fn scale_type(&self) -> ScaleType;

    /// Fill color for a key (ordinal) or a value (linear).
    fn get_color(&self, key: &DataValue) -> String;

    /// Stops running from the color of `start` (domain minimum when `None`)
    /// to the color of `value`.
    fn linear_gradient_stops(&self, value: f64, start: Option<f64>) -> Vec<GradientStop>;
}

/// RGB triple with 0..=255 channels kept as floats for interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    /// Parses `#rgb`, `#rrggbb` and `rgb(r, g, b)` notations.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let text = input.trim();
        if let Some(hex) = text.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_owned(),
                _ => {
                    return Err(ChartError::InvalidData(format!(
                        "unsupported color notation `{input}`"
                    )));
                }
            };
            let channel = |index: usize| {
                u8::from_str_radix(&expanded[index..index + 2], 16)
                    .map(f64::from)
                    .map_err(|_| ChartError::InvalidData(format!("invalid hex color `{input}`")))
            };
            return Ok(Self {
                red: channel(0)?,
                green: channel(2)?,
                blue: channel(4)?,
            });
        }

        let inner = text
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| {
                ChartError::InvalidData(format!("unsupported color notation `{input}`"))
            })?;
        let channels: Vec<f64> = inner
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| ChartError::InvalidData(format!("invalid rgb color `{input}`")))?;
        match channels.as_slice() {
            [red, green, blue] => Ok(Self {
                red: *red,
                green: *green,
                blue: *blue,
            }),
            _ => Err(ChartError::InvalidData(format!(
                "rgb color `{input}` needs three channels"
            ))),
        }
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            red: self.red + (other.red - self.red) * t,
            green: self.green + (other.green - self.green) * t,
            blue: self.blue + (other.blue - self.blue) * t,
        }
    }

    #[must_use]
    pub fn to_css(self) -> String {
        let channel = |value: f64| value.round().clamp(0.0, 255.0) as u8;
        format!(
            "rgb({}, {}, {})",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

/// Named palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    pub domain: Vec<String>,
}

const SCHEMES: &[(&str, &[&str])] = &[
    (
        "vivid",
        &[
            "#647c8a", "#3f51b5", "#2196f3", "#00b862", "#afdf0a", "#a7b61a", "#f3e562",
            "#ff9800", "#ff5722", "#ff4514",
        ],
    ),
    (
        "natural",
        &[
            "#bf9d76", "#e99450", "#d89f59", "#f2dfa7", "#a5d7c6", "#7794b1", "#afafaf",
            "#707160", "#ba9383", "#d9d5c3",
        ],
    ),
    (
        "cool",
        &[
            "#a8385d", "#7aa3e5", "#a27ea8", "#aae3f5", "#adcded", "#a95963", "#8796c0",
            "#7ed3ed", "#50abcc", "#ad6886",
        ],
    ),
    (
        "fire",
        &[
            "#ff3d00", "#bf360c", "#ff8f00", "#ff6f00", "#ff5722", "#e65100", "#ffca28",
            "#ffab00",
        ],
    ),
    (
        "solar",
        &[
            "#fff8e1", "#ffecb3", "#ffe082", "#ffd54f", "#ffca28", "#ffc107", "#ffb300",
            "#ffa000", "#ff8f00", "#ff6f00",
        ],
    ),
    (
        "air",
        &[
            "#e1f5fe", "#b3e5fc", "#81d4fa", "#4fc3f7", "#29b6f6", "#03a9f4", "#039be5",
            "#0288d1", "#0277bd", "#01579b",
        ],
    ),
    (
        "aqua",
        &[
            "#e0f7fa", "#b2ebf2", "#80deea", "#4dd0e1", "#26c6da", "#00bcd4", "#00acc1",
            "#0097a7", "#00838f", "#006064",
        ],
    ),
    (
        "flame",
        &[
            "#A10A28", "#D3342D", "#EF6D49", "#FAAD67", "#FDDE90", "#DBED91", "#A9D770",
            "#6CBA67", "#2C9653", "#146738",
        ],
    ),
    (
        "ocean",
        &[
            "#1D68FB", "#33C0FC", "#4AFFFE", "#AFFFFF", "#FFFC63", "#FDBD2D", "#FC8A25",
            "#FA4F1E", "#FA141B", "#BA38D1",
        ],
    ),
    (
        "forest",
        &[
            "#55C22D", "#C1F33D", "#3CC099", "#AFFFFF", "#8CFC9D", "#76CFFA", "#BA60FB",
            "#EE6490", "#C42A1C", "#FC9F32",
        ],
    ),
    (
        "horizon",
        &[
            "#2597FB", "#65EBFD", "#99FDD0", "#FCEE4B", "#FEFCFA", "#FDD6E3", "#FCB1A8",
            "#EF6F7B", "#CB96E8", "#EFDEE0",
        ],
    ),
    (
        "neons",
        &[
            "#FF3333", "#FF33FF", "#CC33FF", "#0000FF", "#33CCFF", "#33FFFF", "#33FF66",
            "#CCFF33", "#FFCC00", "#FF6600",
        ],
    ),
    (
        "picnic",
        &[
            "#FAC51D", "#66BD6D", "#FAA026", "#29BB9C", "#E96B56", "#55ACD2", "#B7332F",
            "#2C83C9", "#9166B8", "#92E7E8",
        ],
    ),
    (
        "night",
        &[
            "#2B1B5A", "#501356", "#183356", "#28203F", "#391B3C", "#1E2B3C", "#120634",
            "#2D0432", "#051932", "#453080", "#75267D", "#2C507D", "#4B3880", "#752F7D",
            "#35547D",
        ],
    ),
    (
        "nightLights",
        &[
            "#4e31a5", "#9c25a7", "#3065ab", "#57468b", "#904497", "#46648b", "#32118d",
            "#a00fb3", "#1052a2", "#6e51bd", "#b63cc3", "#6c97cb", "#8671c1", "#b455be",
            "#7496c3",
        ],
    ),
];

impl ColorScheme {
    pub fn new(name: impl Into<String>, domain: Vec<String>) -> ChartResult<Self> {
        if domain.is_empty() {
            return Err(ChartError::InvalidConfig(
                "color scheme needs at least one color".to_owned(),
            ));
        }
        Ok(Self {
            name: name.into(),
            domain,
        })
    }

    /// Built-in palette by name (`vivid`, `cool`, `nightLights`, ...).
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        SCHEMES
            .iter()
            .find(|(scheme, _)| scheme.eq_ignore_ascii_case(name))
            .map(|(scheme, colors)| Self {
                name: (*scheme).to_owned(),
                domain: colors.iter().map(|color| (*color).to_owned()).collect(),
            })
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        SCHEMES.iter().map(|(name, _)| *name).collect()
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            name: "cool".to_owned(),
            domain: SCHEMES[2].1.iter().map(|color| (*color).to_owned()).collect(),
        }
    }
}

/// Caller override of the color of one ordinal key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColor {
    pub name: String,
    pub value: String,
}

/// Reference [`ColorMapping`] built from a scheme, a scale type and a domain.
///
/// Ordinal helpers cycle through the palette by domain position. Linear
/// helpers spread the palette over `[0, 1)` and interpolate in RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorHelper {
    scheme: ColorScheme,
    scale_type: ScaleType,
    domain: Vec<DataValue>,
    value_extent: (f64, f64),
    palette: Vec<Rgb>,
    custom_colors: Vec<CustomColor>,
}

impl ColorHelper {
    pub fn new(scheme: ColorScheme, scale_type: ScaleType, domain: Vec<DataValue>) -> ChartResult<Self> {
        if scheme.domain.is_empty() {
            return Err(ChartError::InvalidConfig(format!(
                "color scheme `{}` has no colors",
                scheme.name
            )));
        }
        let mut palette = scheme
            .domain
            .iter()
            .map(|color| Rgb::parse(color))
            .collect::<ChartResult<Vec<_>>>()?;
        if palette.len() == 1 {
            palette.push(palette[0]);
        }
        let value_extent =
            finite_extent(domain.iter().filter_map(DataValue::as_continuous)).unwrap_or((0.0, 1.0));

        Ok(Self {
            scheme,
            scale_type,
            domain,
            value_extent,
            palette,
            custom_colors: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_custom_colors(mut self, custom_colors: Vec<CustomColor>) -> Self {
        self.custom_colors = custom_colors;
        self
    }

    #[must_use]
    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    #[must_use]
    pub fn domain(&self) -> &[DataValue] {
        &self.domain
    }

    fn value_ratio(&self, value: f64) -> f64 {
        let (min, max) = self.value_extent;
        if max == min {
            0.5
        } else {
            (value - min) / (max - min)
        }
    }

    /// Interpolated palette color at `t`, palette entry `i` sitting at `i / n`.
    fn linear_color(&self, t: f64) -> String {
        let count = self.palette.len();
        let last = count - 1;
        let position = if t.is_finite() { t * count as f64 } else { 0.0 };
        let segment = (position.floor().max(0.0) as usize).min(last - 1);
        let local = position - segment as f64;
        self.palette[segment]
            .lerp(self.palette[segment + 1], local)
            .to_css()
    }

    fn ordinal_color(&self, key: &DataValue) -> String {
        let text = key.to_string();
        if let Some(custom) = self
            .custom_colors
            .iter()
            .find(|custom| custom.name.to_lowercase() == text.to_lowercase())
        {
            return custom.value.clone();
        }
        let index = self
            .domain
            .iter()
            .position(|candidate| candidate == key)
            .unwrap_or(self.domain.len());
        self.scheme.domain[index % self.scheme.domain.len()].clone()
    }
}

impl ColorMapping for ColorHelper {
    fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    fn get_color(&self, key: &DataValue) -> String {
        match self.scale_type {
            ScaleType::Linear => match key.as_continuous() {
                Some(value) => self.linear_color(self.value_ratio(value)),
                None => {
                    warn!(key = %key, "non-numeric key on linear color scale");
                    self.palette[0].to_css()
                }
            },
            ScaleType::Ordinal | ScaleType::Time => self.ordinal_color(key),
        }
    }

    fn linear_gradient_stops(&self, value: f64, start: Option<f64>) -> Vec<GradientStop> {
        let start = start.unwrap_or(self.value_extent.0);
        let start_ratio = self.value_ratio(start);
        let end_ratio = self.value_ratio(value);
        let count = self.palette.len();
        let band = 1.0 / count as f64;
        let round4 = |x: f64| (x * 10_000.0).round() / 10_000.0;

        let mut stops = vec![GradientStop::new(
            start_ratio,
            self.get_color(&DataValue::Number(start)),
            1.0,
        )];
        let mut current = start_ratio;
        let mut index = 1;
        while current < end_ratio && index < count {
            let offset = index as f64 * band;
            if offset <= start_ratio {
                index += 1;
                continue;
            }
            if round4(offset) >= round4(end_ratio - band) {
                break;
            }
            stops.push(GradientStop::new(offset, self.palette[index].to_css(), 1.0));
            current = offset;
            index += 1;
        }
        stops.push(GradientStop::new(
            end_ratio,
            self.get_color(&DataValue::Number(value)),
            1.0,
        ));

        if end_ratio == start_ratio {
            let last = stops.len() - 1;
            stops[0].offset = 0.0;
            stops[last].offset = 100.0;
        } else {
            for stop in &mut stops {
                stop.offset = (stop.offset - start_ratio) / (end_ratio - start_ratio) * 100.0;
            }
        }
        stops
    }
}
