//! The owned application state and its input handling.

use image::RgbImage;
use log::{debug, info, warn};
use std::path::Path;

use crate::config::GraphixConfig;
use crate::equation::{EditOutcome, EquationId, EquationList};
use crate::error::{GraphixError, Result};
use crate::export;
use crate::loader;
use crate::measure::{Measurement, MeasurementEngine, Tool};
use crate::points::{Axis, Point, PointId, PointStore};
use crate::render::{RenderStyle, Scene, draw_scene};
use crate::scheduler::FrameScheduler;
use crate::surface::Surface;
use crate::theme::{Rgb, Theme};
use crate::viewport::{ScreenPoint, Viewport};

/// Equations shown when the front end starts.
pub const STARTUP_EQUATIONS: [&str; 2] = ["sin(x)", "cos(x)"];

/// A discrete pointer or canvas event, in canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Negative `delta_y` scrolls up, which zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },
    DoubleClick,
    Resize { width: u32, height: u32 },
}

pub struct Graphix {
    config: GraphixConfig,
    viewport: Viewport,
    theme: Theme,
    equations: EquationList,
    points: PointStore,
    measure: MeasurementEngine,
    scheduler: FrameScheduler,
    /// Last pointer position while a pan drag is active.
    drag: Option<ScreenPoint>,
    cursor: Option<ScreenPoint>,
}

impl Default for Graphix {
    fn default() -> Self {
        Graphix::new(GraphixConfig::default())
    }
}

impl Graphix {
    pub fn new(config: GraphixConfig) -> Self {
        let mut scheduler = FrameScheduler::new();
        scheduler.request_redraw();
        Self {
            viewport: Viewport::new(config.width, config.height),
            theme: Theme::named(config.theme),
            config,
            equations: EquationList::new(),
            points: PointStore::new(),
            measure: MeasurementEngine::new(),
            scheduler,
            drag: None,
            cursor: None,
        }
    }

    pub fn config(&self) -> &GraphixConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn equations(&self) -> &EquationList {
        &self.equations
    }

    pub fn points(&self) -> &PointStore {
        &self.points
    }

    pub fn measurements(&self) -> &MeasurementEngine {
        &self.measure
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn request_redraw(&mut self) {
        self.scheduler.request_redraw();
    }

    // Equations

    /// Validates and adds an equation, giving it the next palette colour.
    pub fn add_equation(&mut self, text: &str) -> Result<EquationId> {
        let color = self.theme.function_color(self.equations.added_count());
        let id = self.equations.add(text, color).inspect_err(|e| warn!("{}", e))?;
        self.request_redraw();
        Ok(id)
    }

    pub fn edit_equation(&mut self, id: EquationId, text: &str) -> Result<EditOutcome> {
        match self.equations.edit(id, text)? {
            EditOutcome::NotFound => Err(GraphixError::UnknownEquation(id)),
            EditOutcome::Replaced => {
                self.request_redraw();
                Ok(EditOutcome::Replaced)
            }
            EditOutcome::Unchanged => Ok(EditOutcome::Unchanged),
        }
    }

    pub fn remove_equation(&mut self, id: EquationId) -> Result<()> {
        if !self.equations.remove(id) {
            return Err(GraphixError::UnknownEquation(id));
        }
        info!("removed equation {}", id);
        self.request_redraw();
        Ok(())
    }

    pub fn set_equation_color(&mut self, id: EquationId, color: Rgb) -> Result<()> {
        if !self.equations.set_color(id, color) {
            return Err(GraphixError::UnknownEquation(id));
        }
        self.request_redraw();
        Ok(())
    }

    // Points

    pub fn add_point(&mut self) -> Point {
        let point = self.points.add();
        self.request_redraw();
        point
    }

    /// Sets one coordinate of a point. Unknown ids and non-finite values change nothing.
    pub fn update_point(&mut self, id: PointId, axis: Axis, value: f64) -> bool {
        let changed = self.points.update(id, axis, value);
        if changed {
            self.request_redraw();
        }
        changed
    }

    pub fn remove_point(&mut self, id: PointId) -> Result<()> {
        if !self.points.remove(id) {
            return Err(GraphixError::UnknownPoint(id));
        }
        self.request_redraw();
        Ok(())
    }

    /// Replaces every point with the rows of `text`. Returns the number of points.
    ///
    /// Nothing changes unless every row parses.
    pub fn import_csv(&mut self, text: &str) -> Result<usize> {
        let rows = loader::parse_points_csv(text)?;
        self.points.replace_all(&rows);
        self.request_redraw();
        Ok(rows.len())
    }

    pub fn import_csv_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let rows = loader::load_points_csv(path)?;
        self.points.replace_all(&rows);
        self.request_redraw();
        Ok(rows.len())
    }

    // Measurement tools

    pub fn select_tool(&mut self, tool: Tool) {
        self.measure.select_tool(tool);
        self.drag = None;
        self.request_redraw();
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.measure.active_tool()
    }

    pub fn clear_measurements(&mut self) {
        self.measure.clear_all();
        self.request_redraw();
    }

    /// A tool click at canvas pixel `(px, py)`.
    pub fn click_at(&mut self, px: f64, py: f64) -> Result<Option<Measurement>> {
        let point = self.viewport.to_graph(px, py);
        let result = self.measure.click_at(point);
        self.request_redraw();
        Ok(result?)
    }

    // View

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
        self.request_redraw();
    }

    /// Zooms by `factor` about `anchor`, or the canvas centre.
    pub fn zoom(&mut self, factor: f64, anchor: Option<ScreenPoint>) -> Result<()> {
        self.viewport
            .zoom_about(factor, anchor)
            .inspect_err(|e| warn!("{}", e))?;
        debug!("scale is now {}", self.viewport.scale());
        self.request_redraw();
        Ok(())
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.zoom(self.config.button_zoom_in, None)
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.zoom(self.config.button_zoom_out, None)
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.request_redraw();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        self.request_redraw();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = Theme::named(self.theme.name.toggled());
        info!("switched to {:?} theme", self.theme.name);
        self.request_redraw();
    }

    /// Handles one input event to completion.
    ///
    /// Returns the measurement completed by a tool click, if any.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<Option<Measurement>> {
        match event {
            InputEvent::PointerDown { x, y } => {
                if self.measure.active_tool().is_some() {
                    return self.click_at(x, y);
                }
                self.drag = Some(ScreenPoint::new(x, y));
            }
            InputEvent::PointerMove { x, y } => {
                let here = ScreenPoint::new(x, y);
                self.cursor = Some(here);
                if let Some(last) = self.drag {
                    self.pan(here.x - last.x, here.y - last.y);
                    self.drag = Some(here);
                } else if !self.measure.pending().is_empty() {
                    self.request_redraw();
                }
            }
            InputEvent::PointerUp => self.drag = None,
            InputEvent::PointerLeave => {
                self.drag = None;
                self.cursor = None;
            }
            InputEvent::Wheel { x, y, delta_y } => {
                let factor = if delta_y > 0.0 {
                    self.config.wheel_zoom_out
                } else {
                    self.config.wheel_zoom_in
                };
                self.zoom(factor, Some(ScreenPoint::new(x, y)))?;
            }
            InputEvent::DoubleClick => self.reset_view(),
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
        Ok(None)
    }

    /// Status line, e.g. `Position: (1.00, -2.50) | Zoom: 1.0x`.
    pub fn info_text(&self) -> String {
        self.info_text_at(self.cursor)
    }

    /// Status line for an explicit cursor position. Without one, only the zoom is shown.
    pub fn info_text_at(&self, cursor: Option<ScreenPoint>) -> String {
        let zoom = format!("Zoom: {:.1}x", self.viewport.zoom_level());
        match cursor {
            Some(c) => {
                let p = self.viewport.to_graph(c.x, c.y);
                format!("Position: ({:.2}, {:.2}) | {}", p.x, p.y, zoom)
            }
            None => zoom,
        }
    }

    fn scene(&self, background: Rgb) -> Scene<'_> {
        Scene {
            viewport: &self.viewport,
            theme: &self.theme,
            style: RenderStyle {
                curve_width: self.config.curve_width,
                point_radius: self.config.point_radius,
            },
            equations: &self.equations,
            points: &self.points,
            measurements: &self.measure,
            background,
        }
    }

    /// Called once per display refresh. Draws onto `surface` only if a redraw
    /// was requested since the previous frame, and reports whether it did.
    pub fn render_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
        if !self.scheduler.begin_frame() {
            return Ok(false);
        }
        let scene = self.scene(self.theme.background);
        draw_scene(surface, &scene)?;
        Ok(true)
    }

    /// Renders immediately, bypassing the frame scheduler.
    pub fn export_now(&self, background: Rgb) -> Result<RgbImage> {
        Ok(export::render_image(&self.scene(background))?)
    }

    pub fn export_png(&self, path: impl AsRef<Path>, background: Rgb) -> Result<()> {
        let image = self.export_now(background)?;
        export::save_png(&image, path)
    }
}
