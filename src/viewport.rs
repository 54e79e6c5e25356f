//! Pan/zoom transform between canvas pixels and graph coordinates.
//!
//! The graph origin sits at `(width / 2 + offset_x, height / 2 + offset_y)` in
//! pixels and one graph unit spans `scale` pixels on both axes. Screen y grows
//! downwards, graph y grows upwards.

use serde::{Deserialize, Serialize};

use crate::error::GraphixError;

/// Pixels per graph unit after [`Viewport::reset`].
pub const DEFAULT_SCALE: f64 = 50.0;

/// A point in the mathematical plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
}

impl GraphPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: GraphPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for GraphPoint {
    fn from((x, y): (f64, f64)) -> Self {
        GraphPoint::new(x, y)
    }
}

/// A point on the canvas, in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Changes the canvas size. Scale and offsets are kept, so the origin
    /// stays the same distance from the canvas centre.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Pixel position of the graph origin.
    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.width as f64 / 2.0 + self.offset_x,
            self.height as f64 / 2.0 + self.offset_y,
        )
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    pub fn to_graph(&self, px: f64, py: f64) -> GraphPoint {
        let origin = self.origin();
        GraphPoint::new((px - origin.x) / self.scale, -(py - origin.y) / self.scale)
    }

    pub fn to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        let origin = self.origin();
        ScreenPoint::new(origin.x + x * self.scale, origin.y - y * self.scale)
    }

    pub fn graph_x(&self, px: f64) -> f64 {
        (px - self.origin().x) / self.scale
    }

    pub fn screen_y(&self, y: f64) -> f64 {
        self.origin().y - y * self.scale
    }

    /// Height of the canvas in graph units.
    pub fn visible_height(&self) -> f64 {
        self.height as f64 / self.scale
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Multiplies the scale by `factor` keeping the graph point under `anchor`
    /// (the canvas centre when `None`) at the same pixel.
    ///
    /// # Errors
    /// * [`GraphixError::InvalidZoom`] if `factor` is not finite and positive or
    ///   the resulting scale would not be. The viewport is left unchanged.
    pub fn zoom_about(&mut self, factor: f64, anchor: Option<ScreenPoint>) -> Result<(), GraphixError> {
        let new_scale = self.scale * factor;
        if !factor.is_finite() || factor <= 0.0 || !new_scale.is_finite() || new_scale <= 0.0 {
            return Err(GraphixError::InvalidZoom(factor));
        }

        let anchor = anchor.unwrap_or_else(|| self.center());
        let origin = self.origin();
        let gx = (anchor.x - origin.x) / self.scale;
        let gy = (anchor.y - origin.y) / self.scale;

        self.scale = new_scale;
        self.offset_x = anchor.x - gx * self.scale - self.width as f64 / 2.0;
        self.offset_y = anchor.y - gy * self.scale - self.height as f64 / 2.0;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.scale = DEFAULT_SCALE;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Zoom level relative to the default scale, e.g. `2.0` at scale 100.
    pub fn zoom_level(&self) -> f64 {
        self.scale / DEFAULT_SCALE
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(800, 600)
    }
}
