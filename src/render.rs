//! Draws one complete frame onto a [`Surface`].
//!
//! Layers, back to front: background, watermark, minor grid, major grid with
//! tick labels, axes, equation curves, data points, measurements and the
//! clicks of a measurement still in progress.

use log::trace;

use crate::equation::EquationList;
use crate::error::RenderError;
use crate::grid::{self, format_tick};
use crate::measure::{Measurement, MeasurementEngine, MeasureValue};
use crate::points::PointStore;
use crate::rasterizer::rasterize;
use crate::surface::{Stroke, Surface, TextSpec};
use crate::theme::{Rgb, Theme};
use crate::viewport::{GraphPoint, ScreenPoint, Viewport};

pub const WATERMARK: &str = "GraphiX";
const WATERMARK_SIZE: f64 = 60.0;
const WATERMARK_ALPHA: f64 = 0.10;

const MINOR_GRID_WIDTH: f64 = 0.5;
const MAJOR_GRID_WIDTH: f64 = 1.0;
const AXIS_WIDTH: f64 = 1.5;
const TICK_LABEL_SIZE: f64 = 12.0;

const MEASURE_WIDTH: f64 = 2.0;
const MEASURE_DOT_RADIUS: f64 = 4.0;
const MEASURE_LABEL_SIZE: f64 = 14.0;
const LABEL_PADDING: f64 = 4.0;

/// Sizes that are configurable rather than fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    pub curve_width: f64,
    pub point_radius: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            curve_width: 2.5,
            point_radius: 4.0,
        }
    }
}

/// Everything a frame depends on, borrowed from the application state.
pub struct Scene<'a> {
    pub viewport: &'a Viewport,
    pub theme: &'a Theme,
    pub style: RenderStyle,
    pub equations: &'a EquationList,
    pub points: &'a PointStore,
    pub measurements: &'a MeasurementEngine,
    /// Fill colour for the whole canvas.
    pub background: Rgb,
}

pub fn draw_scene<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), RenderError> {
    surface.fill(scene.background)?;
    draw_watermark(surface, scene)?;
    draw_grid_and_axes(surface, scene)?;
    for equation in scene.equations.iter() {
        let polylines = rasterize(|x| equation.function.eval(x), scene.viewport);
        trace!("{} -> {} polylines", equation.id, polylines.len());
        let stroke = Stroke::new(equation.color, scene.style.curve_width);
        for polyline in &polylines {
            surface.stroke_polyline(polyline, stroke)?;
        }
    }
    draw_points(surface, scene)?;
    draw_measurements(surface, scene)?;
    Ok(())
}

fn draw_watermark<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), RenderError> {
    let style = TextSpec::new(WATERMARK_SIZE, scene.theme.text_secondary)
        .bold()
        .alpha(WATERMARK_ALPHA);
    surface.fill_text(WATERMARK, scene.viewport.center(), style)
}

fn draw_grid_and_axes<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), RenderError> {
    let viewport = scene.viewport;
    let theme = scene.theme;
    let plan = grid::plan(viewport);
    let (width, height) = (viewport.width() as f64, viewport.height() as f64);
    let origin = viewport.origin();

    let vertical = |px: f64| [ScreenPoint::new(px, 0.0), ScreenPoint::new(px, height)];
    let horizontal = |py: f64| [ScreenPoint::new(0.0, py), ScreenPoint::new(width, py)];

    let minor = Stroke::new(theme.grid_minor, MINOR_GRID_WIDTH);
    for line in &plan.minor_x {
        surface.stroke_polyline(&vertical(line.pixel), minor)?;
    }
    for line in &plan.minor_y {
        surface.stroke_polyline(&horizontal(line.pixel), minor)?;
    }

    let major = Stroke::new(theme.grid_major, MAJOR_GRID_WIDTH);
    let label = TextSpec::new(TICK_LABEL_SIZE, theme.text_primary);
    let near_zero = plan.step / 1000.0;
    for line in &plan.major_x {
        surface.stroke_polyline(&vertical(line.pixel), major)?;
        if line.value.abs() > near_zero {
            let at = ScreenPoint::new(line.pixel, origin.y + 15.0);
            surface.fill_text(&format_tick(line.value), at, label)?;
        }
    }
    for line in &plan.major_y {
        surface.stroke_polyline(&horizontal(line.pixel), major)?;
        if line.value.abs() > near_zero {
            let at = ScreenPoint::new(origin.x - 25.0, line.pixel);
            surface.fill_text(&format_tick(line.value), at, label)?;
        }
    }

    let axis = Stroke::new(theme.axis, AXIS_WIDTH);
    surface.stroke_polyline(&horizontal(origin.y), axis)?;
    surface.stroke_polyline(&vertical(origin.x), axis)?;
    surface.fill_text("0", ScreenPoint::new(origin.x - 10.0, origin.y + 15.0), label)
}

fn draw_points<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), RenderError> {
    for point in scene.points.iter() {
        let at = scene.viewport.to_screen(point.x, point.y);
        surface.fill_circle(at, scene.style.point_radius, scene.theme.accent)?;
    }
    Ok(())
}

fn draw_measurements<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> Result<(), RenderError> {
    for measurement in scene.measurements.measurements() {
        draw_measurement(surface, scene, measurement)?;
    }
    let pending = scene.measurements.pending();
    if !pending.is_empty() {
        draw_chain(surface, scene, pending)?;
    }
    Ok(())
}

fn draw_measurement<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &Scene<'_>,
    measurement: &Measurement,
) -> Result<(), RenderError> {
    let screen = draw_chain(surface, scene, &measurement.points)?;
    let at = match measurement.value {
        MeasureValue::Distance(_) => ScreenPoint::new(
            (screen[0].x + screen[1].x) / 2.0,
            (screen[0].y + screen[1].y) / 2.0 - 15.0,
        ),
        MeasureValue::Angle(_) => ScreenPoint::new(screen[1].x + 15.0, screen[1].y - 15.0),
    };
    draw_label(surface, scene, &measurement.value.label(), at)
}

/// Connects the points with a line and marks each one. Returns their screen positions.
fn draw_chain<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &Scene<'_>,
    points: &[GraphPoint],
) -> Result<Vec<ScreenPoint>, RenderError> {
    let accent = scene.theme.accent;
    let screen: Vec<ScreenPoint> = points
        .iter()
        .map(|p| scene.viewport.to_screen(p.x, p.y))
        .collect();
    if screen.len() >= 2 {
        surface.stroke_polyline(&screen, Stroke::new(accent, MEASURE_WIDTH))?;
    }
    for &p in &screen {
        surface.fill_circle(p, MEASURE_DOT_RADIUS, accent)?;
    }
    Ok(screen)
}

fn draw_label<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &Scene<'_>,
    text: &str,
    at: ScreenPoint,
) -> Result<(), RenderError> {
    let style = TextSpec::new(MEASURE_LABEL_SIZE, scene.theme.accent);
    let (text_width, _) = surface.measure_text(text, style);
    let top_left = ScreenPoint::new(
        at.x - text_width / 2.0 - LABEL_PADDING,
        at.y - 10.0 - LABEL_PADDING,
    );
    surface.fill_rect(
        top_left,
        text_width + 2.0 * LABEL_PADDING,
        20.0 + 2.0 * LABEL_PADDING,
        scene.theme.background,
        1.0,
    )?;
    surface.fill_text(text, at, style)
}
