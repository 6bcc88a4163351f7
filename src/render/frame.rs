use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitives are painted in field order: rects, then paths, then lines,
/// then texts. Chart geometry is in plot coordinates; the backend owns any
/// margin translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            paths: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len() + self.paths.len() + self.lines.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }

    /// Checks the viewport and every primitive; errors name the offending
    /// primitive by kind and index.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for (index, rect) in self.rects.iter().enumerate() {
            rect.validate().map_err(|e| locate(e, "rect", index))?;
        }
        for (index, path) in self.paths.iter().enumerate() {
            path.validate().map_err(|e| locate(e, "path", index))?;
        }
        for (index, line) in self.lines.iter().enumerate() {
            line.validate().map_err(|e| locate(e, "line", index))?;
        }
        for (index, text) in self.texts.iter().enumerate() {
            text.validate().map_err(|e| locate(e, "text", index))?;
        }
        Ok(())
    }
}

fn locate(error: ChartError, kind: &str, index: usize) -> ChartError {
    match error {
        ChartError::InvalidData(message) => {
            ChartError::InvalidData(format!("{kind} #{index}: {message}"))
        }
        other => other,
    }
}
