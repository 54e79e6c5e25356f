//! Grid spacing and grid line placement.

use log::debug;

use crate::viewport::Viewport;

/// Desired distance between major grid lines, in pixels.
pub const TARGET_PIXELS_PER_STEP: f64 = 80.0;

/// Minor grid lines per major step.
pub const MINOR_DIVISIONS: u32 = 5;

/// Picks a major grid spacing of the form {1, 2, 5} x 10^n so that major lines
/// land roughly [`TARGET_PIXELS_PER_STEP`] pixels apart.
///
/// The leading coefficient `m` of the raw step is mapped with `m < 1.5 -> 1`,
/// `m < 3 -> 2`, `m < 7 -> 5`, otherwise `10`.
pub fn step_size(scale: f64) -> f64 {
    let rough = TARGET_PIXELS_PER_STEP / scale;
    let power = 10f64.powf(rough.log10().floor());
    let magnitude = rough / power;

    if magnitude < 1.5 {
        power
    } else if magnitude < 3.0 {
        2.0 * power
    } else if magnitude < 7.0 {
        5.0 * power
    } else {
        10.0 * power
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    /// Graph coordinate along the axis the line marks.
    pub value: f64,
    /// Pixel position of the line (x for vertical lines, y for horizontal ones).
    pub pixel: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridPlan {
    pub step: f64,
    pub minor_step: f64,
    pub major_x: Vec<GridLine>,
    pub major_y: Vec<GridLine>,
    pub minor_x: Vec<GridLine>,
    pub minor_y: Vec<GridLine>,
}

/// All grid lines covering the visible canvas, one step beyond each edge.
pub fn plan(viewport: &Viewport) -> GridPlan {
    let step = step_size(viewport.scale());
    let minor_step = step / MINOR_DIVISIONS as f64;

    let top_left = viewport.to_graph(0.0, 0.0);
    let bottom_right = viewport.to_graph(viewport.width() as f64, viewport.height() as f64);

    let x_pixel = |x: f64| viewport.to_screen(x, 0.0).x;
    let y_pixel = |y: f64| viewport.to_screen(0.0, y).y;

    let plan = GridPlan {
        step,
        minor_step,
        major_x: lines(top_left.x, bottom_right.x, step, x_pixel),
        major_y: lines(bottom_right.y, top_left.y, step, y_pixel),
        minor_x: lines(top_left.x, bottom_right.x, minor_step, x_pixel),
        minor_y: lines(bottom_right.y, top_left.y, minor_step, y_pixel),
    };
    debug!(
        "grid step {} ({} major x, {} major y)",
        step,
        plan.major_x.len(),
        plan.major_y.len()
    );
    plan
}

fn lines(min: f64, max: f64, step: f64, to_pixel: impl Fn(f64) -> f64) -> Vec<GridLine> {
    if !(step.is_finite() && step > 0.0 && min.is_finite() && max.is_finite()) {
        return Vec::new();
    }
    // lines are indexed by integer multiples so long runs do not drift
    let first = (min / step).floor();
    let last = (max / step).ceil();
    let count = (last - first) as usize + 1;

    (0..count)
        .map(|i| {
            let value = (first + i as f64) * step;
            GridLine {
                value,
                pixel: to_pixel(value),
            }
        })
        .collect()
}

/// Formats a tick value with at most 3 significant digits and no trailing zeros.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-3..1e5).contains(&magnitude) {
        let text = format!("{:.2e}", value);
        let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
        return format!("{}e{}", trim_zeros(mantissa), exponent);
    }
    let digits = magnitude.log10().floor() as i32;
    let decimals = (2 - digits).max(0) as usize;
    trim_zeros(&format!("{:.*}", decimals, value)).to_string()
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
