use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::arc::{PieLayout, PieSlice, pie_radii, pie_slices};
use crate::core::domain::categorical_domain;
use crate::core::legend::{AdvancedLegend, advanced_legend};
use crate::core::primitives::finite_extent;
use crate::core::{DataPoint, DataValue, ScaleType, Viewport};
use crate::error::ChartResult;
use crate::render::{PathPrimitive, RenderFrame, TextPrimitive};

use super::ensure_viewport;
use super::options::PieChartOptions;
use super::scene::{AXIS_FONT_SIZE_PX, LABEL_TEXT_COLOR, ToRenderFrame};

/// Margins (top, right, bottom, left) around the pie.
const PIE_MARGINS: [f64; 4] = [20.0, 20.0, 20.0, 20.0];
/// Wider side margins leave room for outside labels.
const LABELED_PIE_MARGINS: [f64; 4] = [30.0, 80.0, 30.0, 80.0];

/// Everything a renderer needs to draw one pie or doughnut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartFrame {
    pub viewport: Viewport,
    /// Pie center in viewport pixels; slice geometry is relative to it.
    pub center: (f64, f64),
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub slices: Vec<PieSlice>,
    pub legend: AdvancedLegend,
}

impl ToRenderFrame for PieChartFrame {
    fn to_render_frame(&self) -> RenderFrame {
        // Slice geometry stays relative to `center`.
        let mut frame = RenderFrame::new(self.viewport);
        for slice in &self.slices {
            frame
                .paths
                .push(PathPrimitive::filled(slice.path.clone(), slice.color.clone()));
            if let Some(label) = slice.text_label.as_ref().filter(|_| slice.label_visible) {
                frame
                    .paths
                    .push(PathPrimitive::stroked(label.line.clone(), slice.color.clone(), 1.0));
                if !label.text.is_empty() {
                    frame.texts.push(TextPrimitive::new(
                        label.text.clone(),
                        label.x,
                        label.y,
                        AXIS_FONT_SIZE_PX,
                        LABEL_TEXT_COLOR,
                        label.text_anchor,
                    ));
                }
            }
        }
        frame
    }
}

/// Pie and doughnut charts.
#[derive(Debug, Clone, PartialEq)]
pub struct PiePipeline {
    options: PieChartOptions,
}

impl PiePipeline {
    pub fn new(options: PieChartOptions) -> ChartResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &PieChartOptions {
        &self.options
    }

    pub fn compute(&self, points: &[DataPoint], viewport: Viewport) -> ChartResult<PieChartFrame> {
        ensure_viewport(viewport)?;
        let [top, right, bottom, left] = if self.options.show_labels {
            LABELED_PIE_MARGINS
        } else {
            PIE_MARGINS
        };
        let width = (viewport.width_px() - left - right).max(0.0);
        let height = (viewport.height_px() - top - bottom).max(0.0);
        let (inner_radius, outer_radius) = pie_radii(
            width,
            height,
            self.options.show_labels,
            self.options.doughnut,
            self.options.arc_width,
        );

        let domain = match self.options.colors.scale_type {
            ScaleType::Linear => {
                let (min, max) =
                    finite_extent(points.iter().map(|point| point.value)).unwrap_or((0.0, 0.0));
                vec![DataValue::Number(min), DataValue::Number(max)]
            }
            ScaleType::Ordinal | ScaleType::Time => categorical_domain(points),
        };
        let colors = self.options.colors.helper(domain)?;

        let layout = PieLayout {
            inner_radius,
            outer_radius,
            explode_slices: self.options.explode_slices,
            show_labels: self.options.show_labels,
        };
        let slices = pie_slices(points, &colors, &layout);
        let legend = advanced_legend(points, &colors, self.options.round_legend);

        debug!(slices = slices.len(), inner_radius, outer_radius, "computed pie chart");
        Ok(PieChartFrame {
            viewport,
            center: (left + width / 2.0, top + height / 2.0),
            inner_radius,
            outer_radius,
            slices,
            legend,
        })
    }
}
