use serde::{Deserialize, Serialize};

use crate::core::color::GradientStop;
use crate::core::label::TextAnchor;
use crate::error::{ChartError, ChartResult};

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!("{what} must be finite")))
    }
}

fn ensure_color(color: &str, what: &str) -> ChartResult<()> {
    if color.trim().is_empty() {
        return Err(ChartError::InvalidData(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub stroke: String,
}

impl LinePrimitive {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, stroke: impl Into<String>) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            stroke: stroke.into(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line coordinates")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        ensure_color(&self.stroke, "line stroke")
    }
}

/// Filled axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub fill: String,
}

impl RectPrimitive {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, fill: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rx: 0.0,
            fill: fill.into(),
        }
    }

    #[must_use]
    pub fn with_corner_radius(mut self, rx: f64) -> Self {
        self.rx = rx;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height, self.rx], "rect geometry")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        ensure_color(&self.fill, "rect fill")
    }
}

/// SVG path with an optional fill gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub d: String,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub gradient: Option<Vec<GradientStop>>,
}

impl PathPrimitive {
    #[must_use]
    pub fn filled(d: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            d: d.into(),
            fill: Some(fill.into()),
            stroke: None,
            stroke_width: 0.0,
            gradient: None,
        }
    }

    #[must_use]
    pub fn stroked(d: impl Into<String>, stroke: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            d: d.into(),
            fill: None,
            stroke: Some(stroke.into()),
            stroke_width,
            gradient: None,
        }
    }

    #[must_use]
    pub fn with_gradient(mut self, stops: Vec<GradientStop>) -> Self {
        self.gradient = Some(stops);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.d.is_empty() {
            return Err(ChartError::InvalidData(
                "path data must not be empty".to_owned(),
            ));
        }
        if self.d.contains("NaN") || self.d.contains("inf") {
            return Err(ChartError::InvalidData(
                "path data must only contain finite coordinates".to_owned(),
            ));
        }
        if self.fill.is_none() && self.stroke.is_none() {
            return Err(ChartError::InvalidData(
                "path needs a fill or a stroke".to_owned(),
            ));
        }
        if self.stroke.is_some() && (!self.stroke_width.is_finite() || self.stroke_width <= 0.0) {
            return Err(ChartError::InvalidData(
                "path stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(stops) = &self.gradient {
            for stop in stops {
                ensure_finite(&[stop.offset, stop.opacity], "gradient stop")?;
            }
        }
        Ok(())
    }
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub fill: String,
    pub anchor: TextAnchor,
    /// Degrees, clockwise.
    pub rotation: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(text: impl Into<String>, x: f64, y: f64, font_size_px: f64, fill: impl Into<String>, anchor: TextAnchor) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            fill: fill.into(),
            anchor,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y, self.rotation], "text placement")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        ensure_color(&self.fill, "text fill")
    }
}
