use std::fmt::Write;

use crate::models::ChartPoint;

use super::{LineStyle, Pos, ShapeStyle, Surface};

/// Surface that accumulates an SVG document.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: i32,
    height: i32,
    body: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete document for everything drawn since the last `clear`.
    pub fn finish(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" style=\"background:#000\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn points_attr(vertices: impl IntoIterator<Item = Pos>) -> String {
    vertices
        .into_iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.body.clear();
    }

    fn draw_line(&mut self, start: Pos, end: Pos, style: &LineStyle) {
        let dash = if style.dashed.is_empty() {
            String::new()
        } else {
            let pattern: Vec<String> = style.dashed.iter().map(f64::to_string).collect();
            format!(" stroke-dasharray=\"{}\"", pattern.join(","))
        };
        // Half-pixel offset keeps odd-width strokes crisp.
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" \
             stroke-linecap=\"square\" transform=\"translate(0.5,0.5)\"{dash}/>",
            start.0, start.1, end.0, end.1, style.color, style.line_width
        );
    }

    fn draw_text(&mut self, text: &str, at: Pos, color: &'static str) {
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" fill=\"{color}\" font-size=\"24\" \
             font-family=\"Arial, Helvetica, sans-serif\" text-anchor=\"end\" \
             dominant-baseline=\"middle\">{}</text>",
            at.0,
            at.1,
            escape(text)
        );
    }

    fn draw_polygon(&mut self, vertices: &[ChartPoint], style: &ShapeStyle) {
        let points = points_attr(
            vertices
                .iter()
                .map(|p| (f64::from(p.x), f64::from(p.y))),
        );
        let opacity = f64::from(style.fill_opacity) / 255.0;
        let _ = writeln!(
            self.body,
            "<polygon points=\"{points}\" fill=\"{}\" fill-opacity=\"{opacity:.3}\" stroke=\"none\"/>",
            style.color
        );
        let _ = writeln!(
            self.body,
            "<polygon points=\"{points}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" \
             transform=\"translate(0.5,0.5)\"/>",
            style.color
        );
    }

    fn draw_triangle(&mut self, tip: Pos, width: f64, height: f64, color: &'static str) {
        let points = points_attr([
            (tip.0 - width, tip.1 - height / 2.0),
            tip,
            (tip.0 - width, tip.1 + height / 2.0),
        ]);
        let _ = writeln!(self.body, "<polygon points=\"{points}\" fill=\"{color}\"/>");
    }

    fn fill_rect(&mut self, origin: Pos, size: Pos, color: &'static str) {
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{color}\"/>",
            origin.0, origin.1, size.0, size.1
        );
    }
}
