//! chart-geometry: scale domains, tick layout and pixel geometry for charts.
//!
//! `core` holds one module per geometry concern (domains, scales, stacking,
//! bars, arcs, axes, tooltips, colors). `api` chains them into per-chart
//! pipelines that turn series data and a viewport into a serializable frame.
//! `render` defines the backend contract those frames are drawn through.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ToRenderFrame};
pub use error::{ChartError, ChartResult};
