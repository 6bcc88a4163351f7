pub mod arc;
pub mod area_series;
pub mod axis;
pub mod bar;
pub mod box_plot;
pub mod color;
pub mod domain;
pub mod gauge;
pub mod heat_map;
pub mod label;
pub mod legend;
pub mod polar;
pub mod primitives;
pub mod scale;
pub mod scale_type;
pub mod shape;
pub mod stack;
pub mod time_scale;
pub mod tooltip;
pub mod tree_map;
pub mod types;

pub use arc::{ArcAngles, ArcDescriptor, PieSlice};
pub use axis::{AxisTickOptions, TickLayout};
pub use bar::{BarGeometry, BarOptions, BarOrientation};
pub use color::{ColorHelper, ColorMapping, ColorScheme, GradientStop};
pub use domain::{Domain, ValueDomainOptions, XDomain};
pub use scale::{BandScale, ContinuousScale, PointScale, Scale, ScaleOptions, build_scale};
pub use scale_type::{ScaleType, infer_scale_type};
pub use stack::{StackAccumulator, StackMode, StackOffsets};
pub use types::{DataPoint, DataValue, Series, Viewport};
