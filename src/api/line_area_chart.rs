use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::area_series::{
    AreaOptions, AreaSeriesGeometry, CircleGeometry, LineSeriesGeometry, active_circle,
    area_series_geometry, line_series_geometry,
};
use crate::core::axis::{AxisOrientation, TickLayout, layout_x_axis, layout_y_axis};
use crate::core::color::{ColorHelper, ColorMapping, fade_in_stops};
use crate::core::domain::{
    area_y_domain, group_domain, line_y_domain, normalized_value_domain, stacked_area_y_domain,
    x_domain,
};
use crate::core::legend::{LegendEntry, legend_entries};
use crate::core::stack::stack_series_by_key;
use crate::core::tooltip::{TooltipAnchor, tooltip_anchor, tooltip_area_text};
use crate::core::{
    ContinuousScale, Domain, Scale, ScaleOptions, ScaleType, Series, StackMode, StackOffsets,
    Viewport, XDomain, build_scale,
};
use crate::error::ChartResult;
use crate::render::{PathPrimitive, RenderFrame};

use super::ensure_viewport;
use super::options::{LineAreaKind, LineChartOptions};
use super::scene::{ToRenderFrame, push_x_axis, push_y_axis};

const LINE_STROKE_WIDTH_PX: f64 = 1.5;

/// Everything a renderer needs to draw one line or area chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAreaFrame {
    pub viewport: Viewport,
    pub kind: LineAreaKind,
    pub x_domain: XDomain,
    pub y_domain: Domain,
    pub x_scale: Scale,
    pub y_scale: ContinuousScale,
    /// Per-series stack intervals, mirroring the input, for stacked kinds.
    pub offsets: Option<Vec<Vec<StackOffsets>>>,
    pub has_range: bool,
    pub lines: Vec<LineSeriesGeometry>,
    pub areas: Vec<AreaSeriesGeometry>,
    pub x_axis: TickLayout,
    pub y_axis: TickLayout,
    pub legend: Vec<LegendEntry>,
}

impl ToRenderFrame for LineAreaFrame {
    fn to_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for area in &self.areas {
            let stops = area
                .gradient_stops
                .clone()
                .unwrap_or_else(|| fade_in_stops(&area.color, 0.2));
            frame
                .paths
                .push(PathPrimitive::filled(area.path.clone(), area.color.clone()).with_gradient(stops));
            frame.paths.push(PathPrimitive::stroked(
                area.line_path.clone(),
                area.color.clone(),
                LINE_STROKE_WIDTH_PX,
            ));
        }
        for line in &self.lines {
            if let Some(range_path) = &line.range_path {
                let stops = line
                    .range_gradient_stops
                    .clone()
                    .unwrap_or_else(|| fade_in_stops(&line.color, 0.15));
                frame
                    .paths
                    .push(PathPrimitive::filled(range_path.clone(), line.color.clone()).with_gradient(stops));
            }
            frame.paths.push(PathPrimitive::stroked(
                line.path.clone(),
                line.color.clone(),
                LINE_STROKE_WIDTH_PX,
            ));
        }

        push_x_axis(&mut frame, &self.x_axis, self.viewport.height_px());
        push_y_axis(&mut frame, &self.y_axis, self.viewport.width_px());
        frame
    }
}

/// Tooltip anchor plus the highlighted marker of every series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub anchor: TooltipAnchor,
    pub circles: Vec<CircleGeometry>,
    /// `series: value` text per tooltip item.
    pub tooltip_lines: Vec<String>,
}

/// Line, area, stacked area and normalized area charts.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAreaPipeline {
    options: LineChartOptions,
}

impl LineAreaPipeline {
    #[must_use]
    pub fn new(options: LineChartOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &LineChartOptions {
        &self.options
    }

    pub fn compute(&self, results: &[Series], viewport: Viewport) -> ChartResult<LineAreaFrame> {
        ensure_viewport(viewport)?;
        let (width, height) = (viewport.width_px(), viewport.height_px());
        let kind = self.options.kind;
        let mode = kind.stack_mode();

        let x_domain = x_domain(results, self.options.x_scale_min, self.options.x_scale_max);
        let (y_domain, has_range) = match kind {
            LineAreaKind::Line => {
                let domain = line_y_domain(results, &self.options.value_domain);
                (domain.domain, domain.has_range)
            }
            LineAreaKind::Area => (
                area_y_domain(results, &self.options.value_domain, self.options.base_value),
                false,
            ),
            LineAreaKind::StackedArea => (
                stacked_area_y_domain(results, &x_domain.x_set, &self.options.value_domain),
                false,
            ),
            LineAreaKind::NormalizedArea => (normalized_value_domain(), false),
        };

        let x_scale = build_scale(
            &x_domain.domain,
            (0.0, width),
            x_domain.scale_type,
            ScaleOptions::default().rounded(self.options.round_domains),
        )?;
        let y_scale = self.y_scale(&y_domain, height)?;
        let colors = self.colors(results, &y_domain)?;

        let offsets = (mode != StackMode::Standard)
            .then(|| stack_series_by_key(results, &x_domain.x_set, mode));

        let gradient_key = self.options.gradient_key.as_str();
        let (lines, areas) = match kind {
            LineAreaKind::Line => (
                results
                    .iter()
                    .map(|series| {
                        line_series_geometry(
                            series,
                            &x_scale,
                            y_scale,
                            &x_domain.x_set,
                            &colors,
                            has_range,
                            gradient_key,
                        )
                    })
                    .collect(),
                Vec::new(),
            ),
            LineAreaKind::Area | LineAreaKind::StackedArea | LineAreaKind::NormalizedArea => {
                let area_options = AreaOptions {
                    mode,
                    base_value: self.options.base_value,
                };
                let areas = results
                    .iter()
                    .enumerate()
                    .map(|(index, series)| {
                        let series_offsets = offsets
                            .as_ref()
                            .and_then(|offsets| offsets.get(index))
                            .map(Vec::as_slice);
                        area_series_geometry(
                            series,
                            series_offsets,
                            &x_scale,
                            y_scale,
                            &x_domain.x_set,
                            &colors,
                            &area_options,
                            gradient_key,
                        )
                    })
                    .collect();
                (Vec::new(), areas)
            }
        };

        let x_axis = layout_x_axis(&x_scale, width, &self.options.x_axis, height, None);
        let y_axis = layout_y_axis(
            &Scale::Continuous(y_scale),
            height,
            &self.options.y_axis.clone().oriented(AxisOrientation::Left),
            width,
            None,
        );
        let legend = match colors.scale_type() {
            ScaleType::Linear => Vec::new(),
            _ => legend_entries(colors.domain(), &colors),
        };

        debug!(
            series = results.len(),
            kind = ?kind,
            x_scale = ?x_domain.scale_type,
            "computed line/area chart"
        );
        Ok(LineAreaFrame {
            viewport,
            kind,
            x_domain,
            y_domain,
            x_scale,
            y_scale,
            offsets,
            has_range,
            lines,
            areas,
            x_axis,
            y_axis,
            legend,
        })
    }

    /// Hover state for a pointer `x_pos` pixels into the plot; `None` when
    /// the chart has no x values.
    pub fn hover(
        &self,
        frame: &LineAreaFrame,
        results: &[Series],
        x_pos: f64,
    ) -> ChartResult<Option<HoverState>> {
        let colors = self.colors(results, &frame.y_domain)?;
        let Some(anchor) = tooltip_anchor(
            x_pos,
            &frame.x_domain.x_set,
            &frame.x_scale,
            frame.viewport.width_px(),
            results,
            frame.offsets.as_deref(),
            &colors,
            self.options.show_percentage,
        ) else {
            return Ok(None);
        };

        let mode = frame.kind.stack_mode();
        let circles: Vec<CircleGeometry> = results
            .iter()
            .enumerate()
            .filter_map(|(index, series)| {
                let series_offsets = frame
                    .offsets
                    .as_ref()
                    .and_then(|offsets| offsets.get(index))
                    .map(Vec::as_slice);
                active_circle(
                    series,
                    series_offsets,
                    &anchor.x_value,
                    &frame.x_scale,
                    frame.y_scale,
                    &colors,
                    mode,
                )
            })
            .collect();
        let tooltip_lines = anchor.items.iter().map(tooltip_area_text).collect();

        trace!(x_pos, index = anchor.index, circles = circles.len(), "resolved hover");
        Ok(Some(HoverState {
            anchor,
            circles,
            tooltip_lines,
        }))
    }

    fn y_scale(&self, domain: &Domain, height: f64) -> ChartResult<ContinuousScale> {
        let bounds = domain.bounds().unwrap_or((0.0, 0.0));
        let scale = ContinuousScale::linear(bounds, (height, 0.0))?;
        Ok(if self.options.round_domains {
            scale.nice(10)
        } else {
            scale
        })
    }

    fn colors(&self, results: &[Series], y_domain: &Domain) -> ChartResult<ColorHelper> {
        let domain = match self.options.colors.scale_type {
            ScaleType::Linear => y_domain.values(),
            ScaleType::Ordinal | ScaleType::Time => group_domain(results),
        };
        self.options.colors.helper(domain)
    }
}
