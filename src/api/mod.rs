mod bar_chart;
mod engine;
mod gauge_chart;
mod heat_map_chart;
mod json_contract;
mod line_area_chart;
mod options;
mod pie_chart;
mod scene;

pub use bar_chart::{BarChartFrame, BarChartPipeline, BarGroupGeometry};
pub use engine::ChartEngine;
pub use gauge_chart::{GaugeChartFrame, GaugePipeline};
pub use heat_map_chart::{HeatMapFrame, HeatMapPipeline};
pub use json_contract::{CHART_FRAME_JSON_SCHEMA_V1, ChartFrameJsonContractV1, FrameJsonContract};
pub use line_area_chart::{HoverState, LineAreaFrame, LineAreaPipeline};
pub use options::{
    BarChartOptions, ColorOptions, GaugeChartOptions, HeatMapOptions, LineAreaKind,
    LineChartOptions, PieChartOptions,
};
pub use pie_chart::{PieChartFrame, PiePipeline};
pub use scene::ToRenderFrame;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

fn ensure_viewport(viewport: Viewport) -> ChartResult<()> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        })
    }
}
