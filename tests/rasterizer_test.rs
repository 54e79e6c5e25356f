use graphix::expression::compile;
use graphix::rasterizer::rasterize;
use graphix::{ScreenPoint, Viewport};
use std::f64::consts::PI;

fn polylines_of(text: &str, viewport: &Viewport) -> Vec<Vec<ScreenPoint>> {
    let f = compile(text).unwrap();
    rasterize(|x| f.eval(x), viewport)
}

#[test]
fn test_smooth_function_is_one_polyline() {
    let viewport = Viewport::new(800, 600);
    let polylines = polylines_of("x^2", &viewport);
    assert_eq!(polylines.len(), 1);
    assert_eq!(polylines[0].len(), 800);
    // left to right, one sample per column
    for (i, p) in polylines[0].iter().enumerate() {
        assert_eq!(p.x, i as f64);
    }
    assert_eq!(polylines[0][400], ScreenPoint::new(400.0, 300.0));
}

#[test]
fn test_tan_breaks_at_asymptotes() {
    let viewport = Viewport::new(800, 600);
    let polylines = polylines_of("tan(x)", &viewport);
    assert!(polylines.len() >= 2, "got {} polylines", polylines.len());

    // no polyline may join samples from different branches of tan
    for polyline in &polylines {
        let branch = |p: &ScreenPoint| (viewport.graph_x(p.x) / PI).round();
        let first = branch(&polyline[0]);
        assert!(
            polyline.iter().all(|p| branch(p) == first),
            "polyline crosses an asymptote"
        );
    }
}

#[test]
fn test_invalid_columns_break_and_are_skipped() {
    let viewport = Viewport::new(800, 600);

    let sqrt = polylines_of("sqrt(x)", &viewport);
    assert_eq!(sqrt.len(), 1);
    assert_eq!(sqrt[0].first().unwrap().x, 400.0);
    assert_eq!(sqrt[0].len(), 400);

    // undefined only at x = 0
    let step = polylines_of("x/abs(x)", &viewport);
    assert_eq!(step.len(), 2);
    assert_eq!(step[0].last().unwrap().x, 399.0);
    assert_eq!(step[1].first().unwrap().x, 401.0);
}

#[test]
fn test_steep_jump_near_pole_is_a_break() {
    let viewport = Viewport::new(800, 600);
    // 1/x jumps from -25 to -50 between the last two columns left of the pole,
    // more than twice the visible height of 12 units
    let reciprocal = polylines_of("1/x", &viewport);
    assert_eq!(reciprocal.len(), 2);
    assert_eq!(reciprocal[0].last().unwrap().x, 398.0);
    assert_eq!(reciprocal[1].first().unwrap().x, 402.0);
}

#[test]
fn test_nothing_drawable() {
    let viewport = Viewport::new(800, 600);
    assert!(rasterize(|_| f64::NAN, &viewport).is_empty());
    assert!(rasterize(|x| x, &Viewport::new(1, 600)).is_empty());
}

#[test]
fn test_values_that_overflow_pixels_are_skipped() {
    let viewport = Viewport::new(800, 600);
    // finite in graph units, infinite once multiplied by the scale
    assert!(rasterize(|_| 1.7e308, &viewport).is_empty());

    let polylines = rasterize(|x| if x < 0.0 { -1.7e308 } else { x }, &viewport);
    assert_eq!(polylines.len(), 1);
    assert_eq!(polylines[0].first().unwrap().x, 400.0);
    assert!(polylines[0].iter().all(|p| p.y.is_finite()));
}

#[test]
fn test_single_valid_columns_are_dropped() {
    let viewport = Viewport::new(10, 10);
    // valid only on every other column
    let polylines = rasterize(
        |x| {
            if (x * viewport.scale()).round() as i64 % 2 == 0 {
                x
            } else {
                f64::NAN
            }
        },
        &viewport,
    );
    assert!(polylines.is_empty());
}

#[test]
fn test_one_evaluation_per_column() {
    let viewport = Viewport::new(321, 200);
    let calls = std::cell::Cell::new(0);
    rasterize(
        |x| {
            calls.set(calls.get() + 1);
            x.sin()
        },
        &viewport,
    );
    assert_eq!(calls.get(), 321);
}
