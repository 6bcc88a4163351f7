use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::domain::categorical_domain;
use crate::core::gauge::{
    GaugeArc, GaugeLayout, GaugeTicks, gauge_arcs, gauge_display_value, gauge_domain, gauge_layout,
    gauge_ticks, gauge_value_scale,
};
use crate::core::label::TextAnchor;
use crate::core::legend::{LegendEntry, legend_entries};
use crate::core::{DataPoint, DataValue, ScaleType, Viewport};
use crate::error::ChartResult;
use crate::render::{PathPrimitive, RenderFrame, TextPrimitive};

use super::ensure_viewport;
use super::options::GaugeChartOptions;
use super::scene::{AXIS_FONT_SIZE_PX, AXIS_TEXT_COLOR, LABEL_TEXT_COLOR, ToRenderFrame};

const AXIS_MARGINS: [f64; 4] = [60.0, 100.0, 60.0, 100.0];
const BARE_MARGINS: [f64; 4] = [10.0, 20.0, 10.0, 20.0];
const TRACK_FILL: &str = "rgba(0, 0, 0, 0.05)";
const VALUE_FONT_SIZE_PX: f64 = 24.0;

/// Everything a renderer needs to draw one gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeChartFrame {
    pub viewport: Viewport,
    /// Gauge center in viewport pixels; arcs and ticks are relative to it.
    pub center: (f64, f64),
    /// Degrees the arcs and ticks are rotated by.
    pub rotation: f64,
    pub domain: (f64, f64),
    pub layout: GaugeLayout,
    pub arcs: Vec<GaugeArc>,
    pub ticks: Option<GaugeTicks>,
    pub display_value: String,
    pub legend: Vec<LegendEntry>,
}

impl ToRenderFrame for GaugeChartFrame {
    fn to_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for arc in &self.arcs {
            frame
                .paths
                .push(PathPrimitive::filled(arc.background_path.clone(), TRACK_FILL));
            frame
                .paths
                .push(PathPrimitive::filled(arc.path.clone(), arc.color.clone()));
        }

        if let Some(ticks) = &self.ticks {
            for path in &ticks.small {
                frame
                    .paths
                    .push(PathPrimitive::stroked(path.clone(), AXIS_TEXT_COLOR, 1.0));
            }
            for tick in &ticks.big {
                frame
                    .paths
                    .push(PathPrimitive::stroked(tick.path.clone(), AXIS_TEXT_COLOR, 1.0));
                if !tick.text.is_empty() {
                    frame.texts.push(
                        TextPrimitive::new(
                            tick.text.clone(),
                            tick.text_x,
                            tick.text_y,
                            AXIS_FONT_SIZE_PX,
                            AXIS_TEXT_COLOR,
                            tick.text_anchor,
                        )
                        .rotated(tick.text_rotation),
                    );
                }
            }
        }

        if !self.display_value.is_empty() {
            frame.texts.push(TextPrimitive::new(
                self.display_value.clone(),
                0.0,
                0.0,
                VALUE_FONT_SIZE_PX,
                LABEL_TEXT_COLOR,
                TextAnchor::Middle,
            ));
        }
        frame
    }
}

/// Radial gauges with one concentric ring per value.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugePipeline {
    options: GaugeChartOptions,
}

impl GaugePipeline {
    pub fn new(options: GaugeChartOptions) -> ChartResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &GaugeChartOptions {
        &self.options
    }

    pub fn compute(&self, points: &[DataPoint], viewport: Viewport) -> ChartResult<GaugeChartFrame> {
        ensure_viewport(viewport)?;
        let gauge = &self.options.gauge;
        let [top, right, bottom, left] = if self.options.show_axis {
            AXIS_MARGINS
        } else {
            BARE_MARGINS
        };
        let width = (viewport.width_px() - left - right).max(0.0);
        let height = (viewport.height_px() - top - bottom).max(0.0);

        let values: Vec<f64> = points.iter().map(|point| point.value).collect();
        let domain = gauge_domain(&values, gauge.min, gauge.max);
        let value_scale = gauge_value_scale(domain, gauge)?;
        let layout = gauge_layout(width, height, points.len());

        let color_domain = match self.options.colors.scale_type {
            ScaleType::Linear => vec![DataValue::Number(domain.0), DataValue::Number(domain.1)],
            ScaleType::Ordinal | ScaleType::Time => categorical_domain(points),
        };
        let colors = self.options.colors.helper(color_domain)?;

        let arcs = gauge_arcs(points, value_scale, &layout, gauge, &colors);
        let ticks = self
            .options
            .show_axis
            .then(|| gauge_ticks(value_scale, layout.outer_radius, gauge, None));
        let legend = match self.options.colors.scale_type {
            ScaleType::Linear => Vec::new(),
            ScaleType::Ordinal | ScaleType::Time => legend_entries(&categorical_domain(points), &colors),
        };

        debug!(arcs = arcs.len(), min = domain.0, max = domain.1, "computed gauge");
        Ok(GaugeChartFrame {
            viewport,
            center: (left + width / 2.0, top + height / 2.0),
            rotation: gauge.rotation(),
            domain,
            layout,
            arcs,
            ticks,
            display_value: gauge_display_value(points, self.options.text_value.as_deref()),
            legend,
        })
    }
}
