//! Depth chart: scales, projected points and staircase polygons.

pub mod geometry;
pub mod model;
pub mod scale;

pub use geometry::{DepthPolygons, build_polygon};
pub use model::{DepthChartModel, PointerReading, build_depth_chart};
pub use scale::LinearScale;
