use approx::assert_relative_eq;
use graphix::Viewport;
use graphix::grid::{format_tick, plan, step_size};

#[test]
fn test_pinned_steps() {
    let cases = [
        (50.0, 2.0),
        (100.0, 1.0),
        (20.0, 5.0),
        (10.0, 10.0),
        (1000.0, 0.1),
        (80.0, 1.0),
        (8.0, 10.0),
        (0.5, 200.0),
    ];
    for (scale, expected) in cases {
        assert_relative_eq!(step_size(scale), expected, max_relative = 1e-9);
    }
}

#[test]
fn test_steps_are_nice() {
    let mut scale = 1e-3;
    while scale < 1e7 {
        let step = step_size(scale);
        assert!(step.is_finite() && step > 0.0, "scale {}", scale);
        let mantissa = step / 10f64.powf(step.log10().floor());
        let nice = [1.0, 2.0, 5.0, 10.0]
            .iter()
            .any(|m| (mantissa - m).abs() < 1e-6);
        assert!(nice, "step {} at scale {}", step, scale);
        scale *= 1.37;
    }
}

#[test]
fn test_zooming_out_never_refines_grid() {
    let mut scale = 1e5;
    let mut previous = step_size(scale);
    while scale > 1e-2 {
        scale *= 0.93;
        let step = step_size(scale);
        assert!(step >= previous * (1.0 - 1e-12), "scale {}", scale);
        previous = step;
    }
}

#[test]
fn test_plan_covers_canvas() {
    let viewport = Viewport::new(800, 600);
    let grid = plan(&viewport);
    assert_eq!(grid.step, 2.0);
    assert_relative_eq!(grid.minor_step, 0.4);

    let xs: Vec<f64> = grid.major_x.iter().map(|l| l.value).collect();
    assert_eq!(xs, vec![-8.0, -6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0, 8.0]);
    let ys: Vec<f64> = grid.major_y.iter().map(|l| l.value).collect();
    assert_eq!(ys, vec![-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0]);

    let zero = grid.major_x.iter().find(|l| l.value == 0.0).unwrap();
    assert_eq!(zero.pixel, 400.0);
    let two = grid.major_y.iter().find(|l| l.value == 2.0).unwrap();
    assert_eq!(two.pixel, 200.0);

    assert_eq!(grid.minor_x.len(), 41);
    assert_eq!(grid.minor_y.len(), 31);
}

#[test]
fn test_plan_follows_pan() {
    let mut viewport = Viewport::new(800, 600);
    viewport.pan(-1000.0, 0.0);
    let grid = plan(&viewport);
    let first = grid.major_x.first().unwrap();
    let last = grid.major_x.last().unwrap();
    assert!(first.pixel <= 0.0 && first.pixel > -2.0 * 50.0);
    assert!(last.pixel >= 800.0 && last.pixel < 800.0 + 2.0 * 50.0);
}

#[test]
fn test_tick_labels() {
    assert_eq!(format_tick(0.0), "0");
    assert_eq!(format_tick(2.0), "2");
    assert_eq!(format_tick(-4.0), "-4");
    assert_eq!(format_tick(0.1), "0.1");
    assert_eq!(format_tick(1.5), "1.5");
    assert_eq!(format_tick(-2.5), "-2.5");
    assert_eq!(format_tick(0.3 * 3.0), "0.9");
    assert_eq!(format_tick(200.0), "200");
    assert_eq!(format_tick(12345.0), "12345");
    assert_eq!(format_tick(100000.0), "1e5");
    assert_eq!(format_tick(0.0002), "2e-4");
    assert_eq!(format_tick(-5e-7), "-5e-7");
}
