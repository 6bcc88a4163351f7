#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::axis::{AxisOrientation, AxisTickOptions, TickLayout, layout_x_axis, layout_y_axis};
use crate::core::bar::{
    BarGeometry, BarOptions, BarOrientation, group_band_scale, inner_band_scale, project_bars,
    stacked_group_scale,
};
use crate::core::color::{ColorHelper, ColorMapping};
use crate::core::domain::{
    categorical_domain, group_domain, grouped_value_domain, inner_domain, normalized_value_domain,
    stacked_value_domain, standard_value_domain,
};
use crate::core::legend::{LegendEntry, legend_entries};
use crate::core::scale::{InnerPadding, Scale, ScaleOptions, build_scale};
use crate::core::{
    ContinuousScale, DataPoint, DataValue, Domain, ScaleType, Series, StackMode, Viewport,
};
use crate::error::ChartResult;
use crate::render::{PathPrimitive, RenderFrame};

use super::ensure_viewport;
use super::options::BarChartOptions;
use super::scene::{ToRenderFrame, push_x_axis, push_y_axis};

/// Bars of one group, already translated to plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroupGeometry {
    /// Group key; `None` for single-series charts.
    pub name: Option<DataValue>,
    /// Start of the group's band along the category axis.
    pub offset: f64,
    pub bars: Vec<BarGeometry>,
}

/// Everything a renderer needs to draw one bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartFrame {
    pub viewport: Viewport,
    pub orientation: BarOrientation,
    pub mode: StackMode,
    pub value_domain: Domain,
    /// Category keys: bar labels, or group names for multi-series input.
    pub category_domain: Vec<DataValue>,
    pub category_axis: TickLayout,
    pub value_axis: TickLayout,
    pub groups: Vec<BarGroupGeometry>,
    pub legend: Vec<LegendEntry>,
}

impl BarChartFrame {
    pub fn bars(&self) -> impl Iterator<Item = &BarGeometry> {
        self.groups.iter().flat_map(|group| group.bars.iter())
    }

    #[must_use]
    pub fn visible_bar_count(&self) -> usize {
        self.bars().filter(|bar| !bar.hide_bar).count()
    }
}

impl ToRenderFrame for BarChartFrame {
    fn to_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for bar in self.bars().filter(|bar| !bar.hide_bar) {
            frame.paths.push(
                PathPrimitive::filled(bar.path.clone(), bar.color.clone()).with_gradient(bar.gradient()),
            );
        }

        let (width, height) = (self.viewport.width_px(), self.viewport.height_px());
        let (x_axis, y_axis) = match self.orientation {
            BarOrientation::Vertical => (&self.category_axis, &self.value_axis),
            BarOrientation::Horizontal => (&self.value_axis, &self.category_axis),
        };
        push_x_axis(&mut frame, x_axis, height);
        push_y_axis(&mut frame, y_axis, width);
        frame
    }
}

/// Category and value geometry of the plot area for one orientation.
#[derive(Debug, Clone, Copy)]
struct PlotAxes {
    category_length: f64,
    value_range: (f64, f64),
}

impl PlotAxes {
    fn new(orientation: BarOrientation, viewport: Viewport) -> Self {
        let (width, height) = (viewport.width_px(), viewport.height_px());
        match orientation {
            BarOrientation::Vertical => Self {
                category_length: width,
                value_range: (height, 0.0),
            },
            BarOrientation::Horizontal => Self {
                category_length: height,
                value_range: (0.0, width),
            },
        }
    }
}

/// Vertical and horizontal bar charts: single series, grouped, stacked and
/// normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartPipeline {
    options: BarChartOptions,
}

impl BarChartPipeline {
    pub fn new(options: BarChartOptions) -> ChartResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &BarChartOptions {
        &self.options
    }

    fn bar_options(&self, mode: StackMode) -> BarOptions {
        BarOptions {
            orientation: self.options.orientation,
            mode,
            round_edges: self.options.round_edges,
            no_bar_when_zero: self.options.no_bar_when_zero,
            tooltip_disabled: self.options.tooltip_disabled,
        }
    }

    /// Single-series chart: one bar per point.
    pub fn compute(&self, points: &[DataPoint], viewport: Viewport) -> ChartResult<BarChartFrame> {
        ensure_viewport(viewport)?;
        let axes = PlotAxes::new(self.options.orientation, viewport);
        let categories = categorical_domain(points);
        let values: Vec<f64> = points.iter().map(|point| point.value).collect();
        let value_domain = standard_value_domain(&values, &self.options.value_domain);

        let category_scale = build_scale(
            &Domain::Categorical(categories.clone()),
            (0.0, axes.category_length),
            ScaleType::Ordinal,
            ScaleOptions::default().banded(InnerPadding::Pixels(self.options.bar_padding)),
        )?;
        let value_scale = self.value_scale(&value_domain, axes.value_range)?;
        let colors = self.colors(&categories, &value_domain)?;

        let bars = project_bars(
            points,
            &category_scale,
            value_scale,
            &colors,
            &self.bar_options(StackMode::Standard),
            None,
        );

        debug!(
            bars = bars.len(),
            orientation = ?self.options.orientation,
            "computed bar chart"
        );
        Ok(self.finish(
            viewport,
            StackMode::Standard,
            value_domain,
            categories,
            &category_scale,
            value_scale,
            vec![BarGroupGeometry {
                name: None,
                offset: 0.0,
                bars,
            }],
            &colors,
        ))
    }

    /// Multi-series chart; the configured mode picks grouped, stacked or
    /// normalized layout.
    pub fn compute_series(&self, results: &[Series], viewport: Viewport) -> ChartResult<BarChartFrame> {
        ensure_viewport(viewport)?;
        let mode = self.options.mode;
        let axes = PlotAxes::new(self.options.orientation, viewport);
        let groups = group_domain(results);
        let keys = inner_domain(results);

        let value_domain = match mode {
            StackMode::Standard => grouped_value_domain(results, &self.options.value_domain),
            StackMode::Stacked => stacked_value_domain(results, &self.options.value_domain),
            StackMode::Normalized => normalized_value_domain(),
        };
        let group_scale = match mode {
            StackMode::Standard => {
                group_band_scale(groups.clone(), axes.category_length, self.options.group_padding)
            }
            StackMode::Stacked | StackMode::Normalized => {
                stacked_group_scale(groups.clone(), axes.category_length, self.options.bar_padding)
            }
        };
        let bar_scale = match mode {
            StackMode::Standard => Scale::Banded(inner_band_scale(
                keys.clone(),
                group_scale.bandwidth(),
                self.options.bar_padding,
            )),
            StackMode::Stacked | StackMode::Normalized => Scale::Banded(group_scale.clone()),
        };
        let value_scale = self.value_scale(&value_domain, axes.value_range)?;
        let colors = self.colors(&keys, &value_domain)?;
        let bar_options = self.bar_options(mode);

        let project = |group: &Series| {
            let name = DataValue::Text(group.name.clone());
            let offset = group_scale.apply(&name).unwrap_or(0.0);
            let mut bars = project_bars(
                &group.series,
                &bar_scale,
                value_scale,
                &colors,
                &bar_options,
                Some(&group.name),
            );
            for bar in &mut bars {
                bar.translate(bar_options.orientation, offset);
            }
            BarGroupGeometry {
                name: Some(name),
                offset,
                bars,
            }
        };

        #[cfg(feature = "parallel-projection")]
        let projected: Vec<BarGroupGeometry> = results.par_iter().map(project).collect();

        #[cfg(not(feature = "parallel-projection"))]
        let projected: Vec<BarGroupGeometry> = results.iter().map(project).collect();

        debug!(
            groups = projected.len(),
            mode = ?mode,
            orientation = ?self.options.orientation,
            "computed multi-series bar chart"
        );
        Ok(self.finish(
            viewport,
            mode,
            value_domain,
            groups,
            &Scale::Banded(group_scale),
            value_scale,
            projected,
            &colors,
        ))
    }

    fn value_scale(&self, domain: &Domain, range: (f64, f64)) -> ChartResult<ContinuousScale> {
        let (min, max) = domain.bounds().unwrap_or((0.0, 0.0));
        let scale = ContinuousScale::linear((min, max), range)?;
        Ok(if self.options.round_domains {
            scale.nice(10)
        } else {
            scale
        })
    }

    fn colors(&self, keys: &[DataValue], value_domain: &Domain) -> ChartResult<ColorHelper> {
        let domain = match self.options.colors.scale_type {
            ScaleType::Linear => value_domain.values(),
            ScaleType::Ordinal | ScaleType::Time => keys.to_vec(),
        };
        self.options.colors.helper(domain)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        viewport: Viewport,
        mode: StackMode,
        value_domain: Domain,
        category_domain: Vec<DataValue>,
        category_scale: &Scale,
        value_scale: ContinuousScale,
        groups: Vec<BarGroupGeometry>,
        colors: &ColorHelper,
    ) -> BarChartFrame {
        let (width, height) = (viewport.width_px(), viewport.height_px());
        let value_scale = Scale::Continuous(value_scale);
        let (category_axis, value_axis) = match self.options.orientation {
            BarOrientation::Vertical => (
                layout_x_axis(category_scale, width, &self.options.category_axis, height, None),
                layout_y_axis(&value_scale, height, &left_axis(&self.options.value_axis), width, None),
            ),
            BarOrientation::Horizontal => (
                layout_y_axis(category_scale, height, &left_axis(&self.options.category_axis), width, None),
                layout_x_axis(&value_scale, width, &self.options.value_axis, height, None),
            ),
        };

        let legend = match colors.scale_type() {
            ScaleType::Linear => Vec::new(),
            _ => legend_entries(colors.domain(), colors),
        };

        BarChartFrame {
            viewport,
            orientation: self.options.orientation,
            mode,
            value_domain,
            category_domain,
            category_axis,
            value_axis,
            groups,
            legend,
        }
    }
}

fn left_axis(options: &AxisTickOptions) -> AxisTickOptions {
    options.clone().oriented(AxisOrientation::Left)
}
