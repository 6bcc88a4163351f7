use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer: validates each frame and records what it would have
/// drawn.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_viewport: Option<Viewport>,
    pub last_rect_count: usize,
    pub last_path_count: usize,
    pub last_line_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_viewport = Some(frame.viewport);
        self.last_rect_count = frame.rects.len();
        self.last_path_count = frame.paths.len();
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        Ok(())
    }
}
