use tracing::trace;

use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

use super::scene::ToRenderFrame;

/// Hands computed chart frames to a rendering backend.
///
/// The engine owns no chart state: pipelines compute frames, the engine
/// only converts and forwards them.
#[derive(Debug)]
pub struct ChartEngine<R: Renderer> {
    renderer: R,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Converts `frame` into draw commands and renders them.
    pub fn render<F: ToRenderFrame>(&mut self, frame: &F) -> ChartResult<RenderFrame> {
        let render_frame = frame.to_render_frame();
        self.render_frame(&render_frame)?;
        Ok(render_frame)
    }

    pub fn render_frame(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        trace!(
            rects = frame.rects.len(),
            paths = frame.paths.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "rendering frame"
        );
        self.renderer.render(frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
