use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::axis::{AxisOrientation, TickLayout, layout_x_axis, layout_y_axis};
use crate::core::heat_map::{
    HeatMapCell, HeatMapDomains, HeatMapRect, heat_map_background, heat_map_cells,
    heat_map_color_domain, heat_map_domains, heat_map_scales,
};
use crate::core::{DataValue, Scale, ScaleType, Series, Viewport};
use crate::error::ChartResult;
use crate::render::{RectPrimitive, RenderFrame};

use super::ensure_viewport;
use super::options::HeatMapOptions;
use super::scene::{ToRenderFrame, push_x_axis, push_y_axis};

/// Everything a renderer needs to draw one heat map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatMapFrame {
    pub viewport: Viewport,
    pub domains: HeatMapDomains,
    pub color_scale_type: ScaleType,
    pub color_domain: Vec<DataValue>,
    pub background: Vec<HeatMapRect>,
    pub cells: Vec<HeatMapCell>,
    pub x_axis: TickLayout,
    pub y_axis: TickLayout,
}

impl ToRenderFrame for HeatMapFrame {
    fn to_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for rect in &self.background {
            frame.rects.push(
                RectPrimitive::new(rect.x, rect.y, rect.width, rect.height, rect.fill.clone())
                    .with_corner_radius(rect.rx),
            );
        }
        for cell in &self.cells {
            frame
                .rects
                .push(RectPrimitive::new(cell.x, cell.y, cell.width, cell.height, cell.fill.clone()));
        }
        push_x_axis(&mut frame, &self.x_axis, self.viewport.height_px());
        push_y_axis(&mut frame, &self.y_axis, self.viewport.width_px());
        frame
    }
}

/// Heat maps: one column per series, one row per point name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeatMapPipeline {
    options: HeatMapOptions,
}

impl HeatMapPipeline {
    #[must_use]
    pub fn new(options: HeatMapOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &HeatMapOptions {
        &self.options
    }

    pub fn compute(&self, results: &[Series], viewport: Viewport) -> ChartResult<HeatMapFrame> {
        ensure_viewport(viewport)?;
        let (width, height) = (viewport.width_px(), viewport.height_px());
        let domains = heat_map_domains(results);
        let color_scale_type = self.options.colors.scale_type;
        let color_domain =
            heat_map_color_domain(&domains, color_scale_type, self.options.min, self.options.max);
        let colors = self.options.colors.helper(color_domain.clone())?;

        let (x_scale, y_scale) = heat_map_scales(&domains, width, height, self.options.padding);
        let background = heat_map_background(&x_scale, &y_scale);
        let cells = heat_map_cells(results, &x_scale, &y_scale, &colors);

        let x_axis = layout_x_axis(&Scale::Banded(x_scale), width, &self.options.x_axis, height, None);
        let y_axis = layout_y_axis(
            &Scale::Banded(y_scale),
            height,
            &self.options.y_axis.clone().oriented(AxisOrientation::Left),
            width,
            None,
        );

        debug!(
            columns = domains.x_domain.len(),
            rows = domains.y_domain.len(),
            cells = cells.len(),
            "computed heat map"
        );
        Ok(HeatMapFrame {
            viewport,
            domains,
            color_scale_type,
            color_domain,
            background,
            cells,
            x_axis,
            y_axis,
        })
    }
}
