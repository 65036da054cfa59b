//! Drawing of the depth chart through a minimal surface abstraction.
//!
//! The model layer never draws; it hands a [`DepthChartModel`] and its
//! [`DepthPolygons`] to [`paint_depth_chart`], which issues primitive calls on
//! whatever [`Surface`] the platform provides.

pub mod svg;

use crate::chart::{DepthChartModel, DepthPolygons, PointerReading};
use crate::errors::Result;
use crate::models::{ChartPoint, Side};
use crate::numeric::format_number;

pub use svg::SvgSurface;

/// Pixel position on the surface.
pub type Pos = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    /// Dash pattern; empty for a solid line.
    pub dashed: &'static [f64],
    pub line_width: f64,
}

impl LineStyle {
    pub const fn solid(color: &'static str) -> Self {
        Self {
            color,
            dashed: &[],
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub color: &'static str,
    /// Fill alpha, 0..=255. The outline is always opaque.
    pub fill_opacity: u8,
}

/// Drawing primitives needed by the chart.
pub trait Surface {
    fn clear(&mut self, width: i32, height: i32);
    fn draw_line(&mut self, start: Pos, end: Pos, style: &LineStyle);
    /// Right-aligned, vertically centered on `at`.
    fn draw_text(&mut self, text: &str, at: Pos, color: &'static str);
    /// Closed path through `vertices`, filled then stroked.
    fn draw_polygon(&mut self, vertices: &[ChartPoint], style: &ShapeStyle);
    /// Triangle pointing right with its tip at `tip`.
    fn draw_triangle(&mut self, tip: Pos, width: f64, height: f64, color: &'static str);
    fn fill_rect(&mut self, origin: Pos, size: Pos, color: &'static str);
}

const AXIS_COLOR: &str = "#555";
const HOVER_COLOR: &str = "#970";
const MASK_COLOR: &str = "#00000080";
const ASKS_STYLE: ShapeStyle = ShapeStyle {
    color: "#990000",
    fill_opacity: 0x22,
};
const BIDS_STYLE: ShapeStyle = ShapeStyle {
    color: "#00AA33",
    fill_opacity: 0x22,
};
const TICK_LENGTH: f64 = 5.0;
const TICK_TEXT_SPACE: f64 = 15.0;
/// The median label is hidden while the pointer is this close to the midline.
const MEDIAN_HIDE_DISTANCE: f64 = 40.0;

/// Paints axes, both depth polygons and, when the pointer is over the chart,
/// the hover overlay.
pub fn paint_depth_chart<S: Surface + ?Sized>(
    surface: &mut S,
    model: &DepthChartModel,
    polygons: &DepthPolygons,
    pointer: Option<&PointerReading>,
) -> Result<()> {
    let dims = model.dimensions;
    let width = f64::from(dims.width);
    let height = f64::from(dims.height);
    let reserved = f64::from(dims.reserved_width);
    let half_height = height / 2.0;

    surface.clear(dims.width, dims.height);

    let axis = LineStyle::solid(AXIS_COLOR);
    surface.draw_line((reserved, 0.0), (reserved, height), &axis);
    surface.draw_line((reserved, half_height), (width, half_height), &axis);
    surface.draw_line(
        (reserved - TICK_LENGTH, half_height),
        (reserved, half_height),
        &LineStyle {
            line_width: 3.0,
            ..axis.clone()
        },
    );

    let near_midline = pointer
        .is_some_and(|p| (p.active_y - half_height).abs() <= MEDIAN_HIDE_DISTANCE);
    if !near_midline {
        surface.draw_text(
            &model.median_price,
            (reserved - TICK_TEXT_SPACE, half_height),
            AXIS_COLOR,
        );
    }

    for (side, style) in [(Side::Asks, &ASKS_STYLE), (Side::Bids, &BIDS_STYLE)] {
        if model.points(side).len() > 1 {
            surface.draw_polygon(polygons.side(side), style);
        }
    }

    if let Some(pointer) = pointer {
        paint_hover(surface, pointer, width, half_height, reserved)?;
    }
    Ok(())
}

fn paint_hover<S: Surface + ?Sized>(
    surface: &mut S,
    pointer: &PointerReading,
    width: f64,
    half_height: f64,
    reserved: f64,
) -> Result<()> {
    let y = pointer.active_y;
    let label = format_number(pointer.price, 1)?;
    surface.draw_text(&label, (reserved - TICK_TEXT_SPACE, y), "#fff");

    // Dim everything except the band between the pointer and the midline.
    if y < half_height {
        surface.fill_rect((reserved + 1.0, 0.0), (width, y), MASK_COLOR);
        surface.fill_rect((reserved + 1.0, half_height + 1.0), (width, half_height), MASK_COLOR);
    } else if y > half_height {
        surface.fill_rect((reserved + 1.0, y), (width, half_height), MASK_COLOR);
        surface.fill_rect((reserved + 1.0, 0.0), (width - 1.0, half_height), MASK_COLOR);
    }

    surface.draw_line(
        (reserved, y),
        (width, y),
        &LineStyle {
            color: HOVER_COLOR,
            dashed: &[5.0, 5.0],
            line_width: 1.0,
        },
    );
    surface.draw_triangle((reserved - 2.0, y), 5.0, 10.0, HOVER_COLOR);
    Ok(())
}

/// One recorded primitive call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: i32, height: i32 },
    Line { start: Pos, end: Pos, style: LineStyle },
    Text { text: String, at: Pos, color: &'static str },
    Polygon { vertices: Vec<ChartPoint>, style: ShapeStyle },
    Triangle { tip: Pos, width: f64, height: f64, color: &'static str },
    Rect { origin: Pos, size: Pos, color: &'static str },
}

/// Surface that only records what it was asked to draw.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn clear(&mut self, width: i32, height: i32) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn draw_line(&mut self, start: Pos, end: Pos, style: &LineStyle) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, text: &str, at: Pos, color: &'static str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            color,
        });
    }

    fn draw_polygon(&mut self, vertices: &[ChartPoint], style: &ShapeStyle) {
        self.commands.push(DrawCommand::Polygon {
            vertices: vertices.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_triangle(&mut self, tip: Pos, width: f64, height: f64, color: &'static str) {
        self.commands.push(DrawCommand::Triangle {
            tip,
            width,
            height,
            color,
        });
    }

    fn fill_rect(&mut self, origin: Pos, size: Pos, color: &'static str) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::sanitize::aggregate;
    use crate::chart::build_depth_chart;
    use crate::models::{ChartDimensions, PriceLevel};

    fn model() -> DepthChartModel {
        let asks: Vec<PriceLevel> = vec![(101.0, 1.0).into(), (102.0, 2.0).into()];
        let bids: Vec<PriceLevel> = vec![(100.0, 2.0).into(), (99.0, 1.0).into()];
        build_depth_chart(&aggregate(&asks), &aggregate(&bids), ChartDimensions::default())
            .unwrap()
    }

    fn texts(surface: &RecordingSurface) -> Vec<&str> {
        surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn paints_axes_label_and_both_polygons() {
        let model = model();
        let polygons = DepthPolygons::from_model(&model);
        let mut surface = RecordingSurface::default();
        paint_depth_chart(&mut surface, &model, &polygons, None).unwrap();

        assert_eq!(
            surface.commands[0],
            DrawCommand::Clear {
                width: 460,
                height: 900
            }
        );
        assert_eq!(texts(&surface), vec!["100.5"]);
        let polygons_drawn: Vec<&ShapeStyle> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { style, .. } => Some(style),
                _ => None,
            })
            .collect();
        assert_eq!(polygons_drawn, vec![&ASKS_STYLE, &BIDS_STYLE]);
        let has_triangle = surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Triangle { .. }));
        assert!(!has_triangle);
    }

    #[test]
    fn hover_hides_median_near_midline() {
        let model = model();
        let polygons = DepthPolygons::from_model(&model);
        let mut surface = RecordingSurface::default();
        let pointer = PointerReading::from_pointer(Some(&model), 200.0, 240.0, 2.0).unwrap();
        paint_depth_chart(&mut surface, &model, &polygons, Some(&pointer)).unwrap();

        assert_eq!(texts(&surface), vec!["100.4"]);
        let rects = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        assert_eq!(rects, 2);
        let has_tip = surface.commands.iter().any(|c| {
            matches!(c, DrawCommand::Triangle { tip, .. } if *tip == (118.0, 480.0))
        });
        assert!(has_tip);
    }

    #[test]
    fn hover_far_from_midline_keeps_median() {
        let model = model();
        let polygons = DepthPolygons::from_model(&model);
        let mut surface = RecordingSurface::default();
        let pointer = PointerReading::from_pointer(Some(&model), 200.0, 50.0, 2.0).unwrap();
        paint_depth_chart(&mut surface, &model, &polygons, Some(&pointer)).unwrap();

        assert_eq!(texts(&surface), vec!["100.5", "101.7"]);
    }
}
