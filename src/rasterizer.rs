//! Samples `y = f(x)` once per pixel column and splits the result into polylines.
//!
//! A column is usable when `f` returns a finite value whose pixel row is
//! finite too. Consecutive usable
//! columns are joined unless their values differ by more than twice the
//! visible graph height, which is taken as a jump across an asymptote.
//! Unusable columns always end the current polyline.

use log::debug;

use crate::viewport::{ScreenPoint, Viewport};

pub type Polyline = Vec<ScreenPoint>;

/// True when going from `previous` to `current` should not be drawn as a line.
pub fn is_discontinuity(previous: f64, current: f64, viewport: &Viewport) -> bool {
    (current - previous).abs() > viewport.visible_height() * 2.0
}

/// Rasterizes `f` across every pixel column of `viewport`, left to right.
///
/// Polylines with a single point are dropped since they draw nothing.
pub fn rasterize<F>(f: F, viewport: &Viewport) -> Vec<Polyline>
where
    F: Fn(f64) -> f64,
{
    let mut polylines = Vec::new();
    let mut current: Polyline = Vec::new();
    let mut previous: Option<f64> = None;

    for column in 0..viewport.width() {
        let px = column as f64;
        let y = f(viewport.graph_x(px));
        let py = viewport.screen_y(y);

        // finite values can still overflow once scaled to pixels
        if !y.is_finite() || !py.is_finite() {
            flush(&mut polylines, &mut current);
            previous = None;
            continue;
        }

        if let Some(prev) = previous {
            if is_discontinuity(prev, y, viewport) {
                flush(&mut polylines, &mut current);
            }
        }

        current.push(ScreenPoint::new(px, py));
        previous = Some(y);
    }
    flush(&mut polylines, &mut current);

    debug!(
        "rasterized {} columns into {} polylines",
        viewport.width(),
        polylines.len()
    );
    polylines
}

fn flush(polylines: &mut Vec<Polyline>, current: &mut Polyline) {
    let segment = std::mem::take(current);
    if segment.len() >= 2 {
        polylines.push(segment);
    }
}
