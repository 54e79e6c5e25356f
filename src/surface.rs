//! Drawing surfaces a frame can be rendered onto.
//!
//! [`PlottersSurface`] rasterizes into an RGB pixel buffer through plotters'
//! bitmap backend. [`RecordingSurface`] keeps a log of the draw calls instead,
//! which lets tests inspect a frame without decoding pixels.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::RenderError;
use crate::theme::Rgb;
use crate::viewport::ScreenPoint;

/// Line style. `width` is in pixels and may be fractional.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub alpha: f64,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Rgb, width: f64) -> Self {
        Self {
            color,
            alpha: 1.0,
            width,
        }
    }
}

/// Text style. Text is always centred on its anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextSpec {
    pub size: f64,
    pub bold: bool,
    pub color: Rgb,
    pub alpha: f64,
}

impl TextSpec {
    pub fn new(size: f64, color: Rgb) -> Self {
        Self {
            size,
            bold: false,
            color,
            alpha: 1.0,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    fn fill(&mut self, color: Rgb) -> Result<(), RenderError>;

    fn stroke_polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) -> Result<(), RenderError>;

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) -> Result<(), RenderError>;

    fn fill_rect(
        &mut self,
        top_left: ScreenPoint,
        width: f64,
        height: f64,
        color: Rgb,
        alpha: f64,
    ) -> Result<(), RenderError>;

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: TextSpec) -> Result<(), RenderError>;

    /// Width and height the text would occupy when drawn with `style`.
    fn measure_text(&self, text: &str, style: TextSpec) -> (f64, f64);
}

fn backend_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(e.to_string())
}

fn rgba(color: Rgb, alpha: f64) -> RGBAColor {
    RGBColor(color.r, color.g, color.b).mix(alpha)
}

/// A [`Surface`] backed by a plotters drawing area.
pub struct PlottersSurface<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
}

impl<'a> PlottersSurface<'a> {
    /// Draws into `buffer`, which must hold `width * height` RGB pixels.
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 3;
        if buffer.len() != expected {
            return Err(RenderError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        let area = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        Ok(Self { area })
    }

    /// Flushes pending drawing into the buffer. Also happens on drop.
    pub fn present(&self) -> Result<(), RenderError> {
        self.area.present().map_err(backend_error)
    }

    fn font(&self, style: TextSpec) -> TextStyle<'static> {
        let font_style = if style.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        ("sans-serif", style.size)
            .into_font()
            .style(font_style)
            .color(&rgba(style.color, style.alpha))
            .pos(Pos::new(HPos::Center, VPos::Center))
    }

    fn bounds(&self) -> Bounds {
        let (w, h) = self.area.dim_in_pixel();
        // a little slack so thick strokes at the edge are not cut short
        Bounds {
            min_x: -8.0,
            min_y: -8.0,
            max_x: w as f64 + 8.0,
            max_y: h as f64 + 8.0,
        }
    }
}

impl Surface for PlottersSurface<'_> {
    fn size(&self) -> (u32, u32) {
        self.area.dim_in_pixel()
    }

    fn fill(&mut self, color: Rgb) -> Result<(), RenderError> {
        self.area
            .fill(&RGBColor(color.r, color.g, color.b))
            .map_err(backend_error)
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) -> Result<(), RenderError> {
        let style = ShapeStyle {
            color: rgba(stroke.color, stroke.alpha),
            filled: false,
            stroke_width: stroke.width.round().max(1.0) as u32,
        };
        for run in clip_polyline(points, self.bounds()) {
            self.area
                .draw(&PathElement::new(run, style))
                .map_err(backend_error)?;
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) -> Result<(), RenderError> {
        if !self.bounds().contains(center) {
            return Ok(());
        }
        let circle = Circle::new(
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            RGBColor(color.r, color.g, color.b).filled(),
        );
        self.area.draw(&circle).map_err(backend_error)
    }

    fn fill_rect(
        &mut self,
        top_left: ScreenPoint,
        width: f64,
        height: f64,
        color: Rgb,
        alpha: f64,
    ) -> Result<(), RenderError> {
        let bounds = self.bounds();
        let x0 = top_left.x.clamp(bounds.min_x, bounds.max_x).round() as i32;
        let y0 = top_left.y.clamp(bounds.min_y, bounds.max_y).round() as i32;
        let x1 = (top_left.x + width).clamp(bounds.min_x, bounds.max_x).round() as i32;
        let y1 = (top_left.y + height).clamp(bounds.min_y, bounds.max_y).round() as i32;
        let rect = Rectangle::new([(x0, y0), (x1, y1)], rgba(color, alpha).filled());
        self.area.draw(&rect).map_err(backend_error)
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: TextSpec) -> Result<(), RenderError> {
        if !self.bounds().contains(at) {
            return Ok(());
        }
        let element = Text::new(
            text.to_string(),
            (at.x.round() as i32, at.y.round() as i32),
            self.font(style),
        );
        self.area.draw(&element).map_err(backend_error)
    }

    fn measure_text(&self, text: &str, style: TextSpec) -> (f64, f64) {
        match self.area.estimate_text_size(text, &self.font(style)) {
            Ok((w, h)) => (w as f64, h as f64),
            Err(_) => estimate_text(text, style),
        }
    }
}

/// Rough text extent used when no font metrics are available.
pub fn estimate_text(text: &str, style: TextSpec) -> (f64, f64) {
    (text.chars().count() as f64 * style.size * 0.6, style.size)
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Liang-Barsky. Returns the parameter range of the segment `a -> b` inside `bounds`.
fn clip_segment(a: ScreenPoint, b: ScreenPoint, bounds: Bounds) -> Option<(f64, f64)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.x - bounds.min_x),
        (dx, bounds.max_x - a.x),
        (-dy, a.y - bounds.min_y),
        (dy, bounds.max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Splits a polyline into the pixel runs that fall inside `bounds`.
fn clip_polyline(points: &[ScreenPoint], bounds: Bounds) -> Vec<Vec<(i32, i32)>> {
    let lerp = |a: ScreenPoint, b: ScreenPoint, t: f64| {
        (
            (a.x + (b.x - a.x) * t).round() as i32,
            (a.y + (b.y - a.y) * t).round() as i32,
        )
    };

    let mut runs = Vec::new();
    let mut run: Vec<(i32, i32)> = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        match clip_segment(a, b, bounds) {
            Some((t0, t1)) => {
                if t0 > 0.0 || run.is_empty() {
                    if run.len() >= 2 {
                        runs.push(std::mem::take(&mut run));
                    }
                    run.clear();
                    run.push(lerp(a, b, t0));
                }
                run.push(lerp(a, b, t1));
                if t1 < 1.0 {
                    runs.push(std::mem::take(&mut run));
                }
            }
            None => {
                if run.len() >= 2 {
                    runs.push(std::mem::take(&mut run));
                }
                run.clear();
            }
        }
    }
    if run.len() >= 2 {
        runs.push(run);
    }
    runs
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill(Rgb),
    Polyline { points: Vec<ScreenPoint>, stroke: Stroke },
    Circle { center: ScreenPoint, radius: f64, color: Rgb },
    Rect { top_left: ScreenPoint, width: f64, height: f64, color: Rgb, alpha: f64 },
    Text { text: String, at: ScreenPoint, style: TextSpec },
}

/// A [`Surface`] that stores every draw call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[ScreenPoint], Stroke)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, stroke } => Some((points.as_slice(), *stroke)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Rgb) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Fill(color));
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], stroke: Stroke) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke,
        });
        Ok(())
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
        Ok(())
    }

    fn fill_rect(
        &mut self,
        top_left: ScreenPoint,
        width: f64,
        height: f64,
        color: Rgb,
        alpha: f64,
    ) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Rect {
            top_left,
            width,
            height,
            color,
            alpha,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: TextSpec) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, style: TextSpec) -> (f64, f64) {
        estimate_text(text, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        }
    }

    #[test]
    fn clip_cuts_huge_coordinates() {
        let points = [ScreenPoint::new(50.0, 50.0), ScreenPoint::new(50.0, 1e12)];
        let runs = clip_polyline(&points, canvas());
        assert_eq!(runs, vec![vec![(50, 50), (50, 100)]]);
    }

    #[test]
    fn clip_splits_on_exit_and_reentry() {
        let points = [
            ScreenPoint::new(10.0, 10.0),
            ScreenPoint::new(10.0, 200.0),
            ScreenPoint::new(90.0, 200.0),
            ScreenPoint::new(90.0, 10.0),
        ];
        let runs = clip_polyline(&points, canvas());
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![(10, 10), (10, 100)]);
        assert_eq!(runs[1], vec![(90, 100), (90, 10)]);
    }

    #[test]
    fn non_finite_segments_are_dropped() {
        let points = [
            ScreenPoint::new(0.0, f64::NEG_INFINITY),
            ScreenPoint::new(1.0, f64::NEG_INFINITY),
            ScreenPoint::new(2.0, 50.0),
            ScreenPoint::new(3.0, 60.0),
            ScreenPoint::new(4.0, f64::NAN),
        ];
        assert_eq!(clip_polyline(&points, canvas()), vec![vec![(2, 50), (3, 60)]]);
    }

    #[test]
    fn segment_outside_is_dropped() {
        let points = [ScreenPoint::new(-50.0, -50.0), ScreenPoint::new(-10.0, -70.0)];
        assert!(clip_polyline(&points, canvas()).is_empty());
    }
}
