//! Depth chart model: axis domains, scales and pixel points per side.

use crate::errors::{AppError, Result};
use crate::models::{ChartDimensions, ChartPoint, DepthLevel, Side};
use crate::numeric::format_number;

use super::scale::LinearScale;

/// Everything the chart renderer needs for one snapshot.
///
/// Built as a whole and shared behind an `Arc`, so the scale pair is always
/// read consistently by pointer handling.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthChartModel {
    pub asks_points: Vec<ChartPoint>,
    pub bids_points: Vec<ChartPoint>,
    pub median_price: String,
    /// Cumulative volume -> x pixel.
    pub x_scale: LinearScale,
    /// Price -> y pixel.
    pub y_scale: LinearScale,
    pub dimensions: ChartDimensions,
}

impl DepthChartModel {
    pub fn points(&self, side: Side) -> &[ChartPoint] {
        match side {
            Side::Asks => &self.asks_points,
            Side::Bids => &self.bids_points,
        }
    }
}

/// Builds the chart model from both prepared sides.
///
/// Both sides must be sorted best price first; the price extremes are read
/// from their ends instead of scanning.
pub fn build_depth_chart(
    asks: &[DepthLevel],
    bids: &[DepthLevel],
    dimensions: ChartDimensions,
) -> Result<DepthChartModel> {
    let (Some(best_ask), Some(worst_ask)) = (asks.first(), asks.last()) else {
        return Err(AppError::EmptySide(Side::Asks));
    };
    let (Some(best_bid), Some(worst_bid)) = (bids.first(), bids.last()) else {
        return Err(AppError::EmptySide(Side::Bids));
    };

    let x_max = asks
        .iter()
        .chain(bids)
        .map(|level| level.cumulative)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_min = best_ask.price.min(worst_bid.price);
    let y_max = worst_ask.price.max(best_bid.price);

    let mut prices: Vec<f64> = bids.iter().chain(asks).map(|level| level.price).collect();
    let median_price = format_number(median(&mut prices), 1)?;

    let ChartDimensions {
        width,
        height,
        reserved_width,
    } = dimensions;
    let x_scale = LinearScale::new((0.0, x_max), (f64::from(width), f64::from(reserved_width)))?;
    let y_scale = LinearScale::new((y_min, y_max), (f64::from(height), 0.0))?;

    let project = |levels: &[DepthLevel]| -> Vec<ChartPoint> {
        levels
            .iter()
            .map(|level| {
                ChartPoint::new(x_scale.forward(level.cumulative), y_scale.forward(level.price))
            })
            .collect()
    };

    Ok(DepthChartModel {
        asks_points: project(asks),
        bids_points: project(bids),
        median_price,
        x_scale,
        y_scale,
        dimensions,
    })
}

/// Middle value; the mean of the two middle values for an even count.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.is_empty() {
        f64::NAN
    } else if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Price and volume under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerReading {
    pub price: f64,
    pub cumulative: f64,
    /// Pointer y in surface pixels.
    pub active_y: f64,
}

impl PointerReading {
    /// Converts a pointer position, relative to the chart element, into chart
    /// values. `None` until a model has been built.
    pub fn from_pointer(
        model: Option<&DepthChartModel>,
        offset_x: f64,
        offset_y: f64,
        pixel_ratio: f64,
    ) -> Option<Self> {
        let model = model?;
        let pixel_x = offset_x * pixel_ratio;
        let pixel_y = offset_y * pixel_ratio;
        Some(Self {
            price: model.y_scale.inverse(pixel_y),
            cumulative: model.x_scale.inverse(pixel_x),
            active_y: pixel_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::sanitize::aggregate;
    use crate::models::PriceLevel;

    fn depth(raw: &[(f64, f64)]) -> Vec<DepthLevel> {
        let levels: Vec<PriceLevel> = raw.iter().copied().map(PriceLevel::from).collect();
        aggregate(&levels)
    }

    fn sample() -> DepthChartModel {
        let asks = depth(&[(101.0, 1.0), (102.0, 2.0), (104.0, 2.0)]);
        let bids = depth(&[(100.0, 2.0), (98.0, 8.0)]);
        build_depth_chart(&asks, &bids, ChartDimensions::default()).unwrap()
    }

    #[test]
    fn derives_domains_from_side_extremes() {
        let model = sample();
        assert_eq!(model.x_scale.domain(), (0.0, 10.0));
        assert_eq!(model.x_scale.range(), (460.0, 120.0));
        assert_eq!(model.y_scale.domain(), (98.0, 104.0));
        assert_eq!(model.y_scale.range(), (900.0, 0.0));
    }

    #[test]
    fn projects_points_in_order() {
        let model = sample();
        // asks cumulative 1, 3, 5 over x [0, 10] -> [460, 120]
        let xs: Vec<i32> = model.asks_points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![426, 358, 290]);
        // prices 101, 102, 104 over y [98, 104] -> [900, 0]
        let ys: Vec<i32> = model.asks_points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![450, 300, 0]);
        assert_eq!(model.points(Side::Bids)[1], ChartPoint::new(120, 900));
    }

    #[test]
    fn median_over_both_sides() {
        // prices 98, 100, 101, 102, 104
        assert_eq!(sample().median_price, "101.0");

        let asks = depth(&[(101.0, 1.0), (102.0, 1.0)]);
        let bids = depth(&[(100.0, 1.0), (99.0, 1.0)]);
        let model = build_depth_chart(&asks, &bids, ChartDimensions::default()).unwrap();
        assert_eq!(model.median_price, "100.5");
    }

    #[test]
    fn empty_side_is_rejected() {
        let asks = depth(&[(101.0, 1.0)]);
        assert!(matches!(
            build_depth_chart(&asks, &[], ChartDimensions::default()),
            Err(AppError::EmptySide(Side::Bids))
        ));
        assert!(matches!(
            build_depth_chart(&[], &asks, ChartDimensions::default()),
            Err(AppError::EmptySide(Side::Asks))
        ));
    }

    #[test]
    fn degenerate_domains_are_rejected() {
        let asks = depth(&[(100.0, 1.0)]);
        let bids = depth(&[(100.0, 1.0)]);
        assert!(matches!(
            build_depth_chart(&asks, &bids, ChartDimensions::default()),
            Err(AppError::DomainDegenerate(_))
        ));

        let asks = depth(&[(101.0, 0.0)]);
        let bids = depth(&[(100.0, 0.0)]);
        assert!(matches!(
            build_depth_chart(&asks, &bids, ChartDimensions::default()),
            Err(AppError::DomainDegenerate(_))
        ));
    }

    #[test]
    fn pointer_maps_back_to_values() {
        let model = sample();
        let reading = PointerReading::from_pointer(Some(&model), 145.0, 225.0, 2.0).unwrap();
        assert_eq!(reading.active_y, 450.0);
        assert!((reading.price - 101.0).abs() < 1e-9);
        assert!((reading.cumulative - 5.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_without_model_is_noop() {
        assert_eq!(PointerReading::from_pointer(None, 10.0, 10.0, 2.0), None);
    }
}
