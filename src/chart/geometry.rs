//! Staircase polygons for the depth chart.

use crate::models::{ChartDimensions, ChartPoint, Side};

use super::model::DepthChartModel;

/// Closed outline for each side, ready to be filled and stroked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepthPolygons {
    pub asks: Vec<ChartPoint>,
    pub bids: Vec<ChartPoint>,
}

impl DepthPolygons {
    pub fn from_model(model: &DepthChartModel) -> Self {
        Self {
            asks: build_polygon(&model.asks_points, Side::Asks, model.dimensions),
            bids: build_polygon(&model.bids_points, Side::Bids, model.dimensions),
        }
    }

    pub fn side(&self, side: Side) -> &[ChartPoint] {
        match side {
            Side::Asks => &self.asks,
            Side::Bids => &self.bids,
        }
    }
}

/// Traces the cumulative volume of one side as a staircase.
///
/// `points` run from the best price outward. The outline starts pinned to
/// the outer top corner, steps horizontally then vertically between
/// consecutive points, and is closed against the top edge for asks and
/// against the baseline for bids. Fewer than two points give no polygon.
pub fn build_polygon(points: &[ChartPoint], side: Side, dims: ChartDimensions) -> Vec<ChartPoint> {
    let [first, _, ..] = points else {
        return Vec::new();
    };

    let mut vertices = Vec::with_capacity(2 * points.len() + 3);
    vertices.push(ChartPoint::new(dims.width, -1));
    vertices.push(ChartPoint::new(dims.width, first.y));
    vertices.push(*first);

    for pair in points.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        vertices.push(ChartPoint::new(current.x, next.y));
        vertices.push(next);
    }

    let closing = match side {
        Side::Asks => {
            let last = vertices[vertices.len() - 1];
            ChartPoint::new(last.x, -1)
        }
        Side::Bids => {
            let deepest = points[points.len() - 1];
            vertices.push(ChartPoint::new(deepest.x, dims.height));
            ChartPoint::new(vertices[0].x, dims.height)
        }
    };
    vertices.push(closing);
    vertices
}
