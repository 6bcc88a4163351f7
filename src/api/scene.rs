use crate::core::axis::TickLayout;
use crate::render::{LinePrimitive, PathPrimitive, RenderFrame, TextPrimitive};

pub(crate) const AXIS_FONT_SIZE_PX: f64 = 12.0;
pub(crate) const AXIS_TEXT_COLOR: &str = "#666666";
pub(crate) const LABEL_TEXT_COLOR: &str = "#333333";
const TICK_LINE_HEIGHT_PX: f64 = 14.0;
const X_TICK_LABEL_GAP_PX: f64 = 16.0;
const Y_TICK_LABEL_GAP_PX: f64 = 8.0;
const REFERENCE_LINE_COLOR: &str = "#999999";
const REFERENCE_BAND_FILL: &str = "rgba(150, 150, 150, 0.15)";

/// Scene element that can be turned into draw commands.
pub trait ToRenderFrame {
    fn to_render_frame(&self) -> RenderFrame;
}

/// Tick labels and reference lines of a horizontal axis under a plot
/// `plot_height` pixels tall.
pub(crate) fn push_x_axis(frame: &mut RenderFrame, layout: &TickLayout, plot_height: f64) {
    for tick in &layout.ticks {
        for (index, line) in tick_text_lines(&tick.lines, &tick.label).enumerate() {
            frame.texts.push(
                TextPrimitive::new(
                    line,
                    tick.position,
                    plot_height + X_TICK_LABEL_GAP_PX + index as f64 * TICK_LINE_HEIGHT_PX,
                    AXIS_FONT_SIZE_PX,
                    AXIS_TEXT_COLOR,
                    layout.text_anchor,
                )
                .rotated(layout.rotation_angle),
            );
        }
    }

    if let Some(reference) = &layout.reference {
        for (_, position) in &reference.lines {
            frame.lines.push(LinePrimitive::new(
                *position,
                0.0,
                *position,
                plot_height,
                1.0,
                REFERENCE_LINE_COLOR,
            ));
        }
        if let Some(band) = &reference.band_path {
            frame
                .paths
                .push(PathPrimitive::filled(band.clone(), REFERENCE_BAND_FILL));
        }
    }
}

/// Tick labels and reference lines of a vertical axis beside a plot
/// `plot_width` pixels wide.
pub(crate) fn push_y_axis(frame: &mut RenderFrame, layout: &TickLayout, plot_width: f64) {
    for tick in &layout.ticks {
        for (index, line) in tick_text_lines(&tick.lines, &tick.label).enumerate() {
            frame.texts.push(TextPrimitive::new(
                line,
                -Y_TICK_LABEL_GAP_PX,
                tick.position + index as f64 * TICK_LINE_HEIGHT_PX,
                AXIS_FONT_SIZE_PX,
                AXIS_TEXT_COLOR,
                layout.text_anchor,
            ));
        }
    }

    if let Some(reference) = &layout.reference {
        for (_, position) in &reference.lines {
            frame.lines.push(LinePrimitive::new(
                0.0,
                *position,
                plot_width,
                *position,
                1.0,
                REFERENCE_LINE_COLOR,
            ));
        }
        if let Some(band) = &reference.band_path {
            frame
                .paths
                .push(PathPrimitive::filled(band.clone(), REFERENCE_BAND_FILL));
        }
    }
}

fn tick_text_lines<'a>(lines: &'a [String], label: &'a str) -> impl Iterator<Item = &'a str> {
    let lines: Vec<&str> = if lines.is_empty() {
        vec![label]
    } else {
        lines.iter().map(String::as_str).collect()
    };
    lines.into_iter().filter(|line| !line.is_empty())
}
