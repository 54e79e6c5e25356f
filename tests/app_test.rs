use approx::assert_relative_eq;
use graphix::config::{ConfigArgs, load_config, save_config};
use graphix::export::encode_png;
use graphix::surface::DrawCommand;
use graphix::{
    EditOutcome, ExpressionError, Graphix, GraphixConfig, GraphixError, InputEvent,
    PlottersSurface, RecordingSurface, RenderError, Rgb, ScreenPoint, ThemeName, Tool,
};
use std::collections::HashMap;

fn rendered(app: &mut Graphix) -> bool {
    let mut surface = RecordingSurface::new(app.viewport().width(), app.viewport().height());
    app.render_frame(&mut surface).unwrap()
}

#[test]
fn test_redraws_are_coalesced() {
    let mut app = Graphix::default();
    assert!(rendered(&mut app), "first frame is always drawn");
    assert!(!rendered(&mut app));

    app.add_equation("x").unwrap();
    app.add_equation("x^2").unwrap();
    app.pan(3.0, 4.0);
    app.request_redraw();
    assert!(rendered(&mut app));
    assert!(!rendered(&mut app));
    assert_eq!(app.scheduler().frames(), 2);
}

#[test]
fn test_rejected_input_does_not_redraw() {
    let mut app = Graphix::default();
    rendered(&mut app);

    let err = app.add_equation("2*").unwrap_err();
    assert!(matches!(
        err,
        GraphixError::Expression(ExpressionError::Incomplete(ref text)) if text == "2*"
    ));
    assert!(app.zoom(-1.0, None).is_err());
    assert!(app.equations().is_empty());
    assert!(!rendered(&mut app));
}

#[test]
fn test_equation_lifecycle() {
    let mut app = Graphix::default();
    let palette = app.theme().palette;
    let first = app.add_equation("  sin(x) ").unwrap();
    let second = app.add_equation("cos(x)").unwrap();
    assert_eq!(app.equations().get(first).unwrap().expression, "sin(x)");
    assert_eq!(app.equations().get(first).unwrap().color, palette[0]);
    assert_eq!(app.equations().get(second).unwrap().color, palette[1]);

    rendered(&mut app);
    assert_eq!(app.edit_equation(first, "sin(x)").unwrap(), EditOutcome::Unchanged);
    assert!(!rendered(&mut app));

    assert_eq!(app.edit_equation(first, "x^3").unwrap(), EditOutcome::Replaced);
    assert_eq!(app.equations().get(first).unwrap().function.eval(2.0), 8.0);

    let err = app.edit_equation(first, "x^").unwrap_err();
    assert!(matches!(err, GraphixError::Expression(_)));
    assert_eq!(app.equations().get(first).unwrap().expression, "x^3");

    app.set_equation_color(second, Rgb::new(1, 2, 3)).unwrap();
    assert_eq!(app.equations().get(second).unwrap().color, Rgb::new(1, 2, 3));

    app.remove_equation(second).unwrap();
    assert!(matches!(
        app.remove_equation(second),
        Err(GraphixError::UnknownEquation(id)) if id == second
    ));
    assert!(app.edit_equation(second, "x").is_err());

    // palette position keeps counting after removals
    let third = app.add_equation("x").unwrap();
    assert_eq!(app.equations().get(third).unwrap().color, palette[2]);
    let order: Vec<_> = app.equations().iter().map(|e| e.id).collect();
    assert_eq!(order, vec![first, third]);
}

#[test]
fn test_drag_pans_the_view() {
    let mut app = Graphix::default();
    app.handle_event(InputEvent::PointerDown { x: 100.0, y: 100.0 }).unwrap();
    assert!(app.is_dragging());
    app.handle_event(InputEvent::PointerMove { x: 110.0, y: 95.0 }).unwrap();
    app.handle_event(InputEvent::PointerMove { x: 130.0, y: 80.0 }).unwrap();
    app.handle_event(InputEvent::PointerUp).unwrap();
    assert_eq!(app.viewport().offset(), (30.0, -20.0));

    app.handle_event(InputEvent::PointerMove { x: 500.0, y: 500.0 }).unwrap();
    assert_eq!(app.viewport().offset(), (30.0, -20.0));

    app.handle_event(InputEvent::PointerDown { x: 0.0, y: 0.0 }).unwrap();
    app.handle_event(InputEvent::PointerLeave).unwrap();
    assert!(!app.is_dragging());
}

#[test]
fn test_zoom_controls() {
    let mut app = Graphix::default();
    app.zoom_in().unwrap();
    assert_relative_eq!(app.viewport().scale(), 62.5);
    app.zoom_out().unwrap();
    assert_relative_eq!(app.viewport().scale(), 50.0);

    let cursor = ScreenPoint::new(600.0, 100.0);
    let before = app.viewport().to_graph(cursor.x, cursor.y);
    app.handle_event(InputEvent::Wheel { x: cursor.x, y: cursor.y, delta_y: -120.0 })
        .unwrap();
    assert_relative_eq!(app.viewport().scale(), 55.0);
    let after = app.viewport().to_graph(cursor.x, cursor.y);
    assert_relative_eq!(before.x, after.x, epsilon = 1e-12);
    assert_relative_eq!(before.y, after.y, epsilon = 1e-12);

    app.handle_event(InputEvent::Wheel { x: 0.0, y: 0.0, delta_y: 3.0 }).unwrap();
    assert_relative_eq!(app.viewport().scale(), 49.5);

    app.handle_event(InputEvent::DoubleClick).unwrap();
    assert_eq!(app.viewport().scale(), 50.0);
    assert_eq!(app.viewport().offset(), (0.0, 0.0));
}

#[test]
fn test_tool_clicks_measure() {
    let mut app = Graphix::default();
    app.select_tool(Tool::Distance);
    let first = app
        .handle_event(InputEvent::PointerDown { x: 400.0, y: 300.0 })
        .unwrap();
    assert!(first.is_none());
    assert!(!app.is_dragging(), "clicks with a tool never drag");

    let done = app
        .handle_event(InputEvent::PointerDown { x: 550.0, y: 100.0 })
        .unwrap()
        .unwrap();
    assert_eq!(done.value.label(), "5.00");

    app.select_tool(Tool::Angle);
    app.click_at(400.0, 300.0).unwrap();
    app.click_at(400.0, 300.0).unwrap();
    let err = app.click_at(450.0, 300.0).unwrap_err();
    assert!(matches!(err, GraphixError::Measure(_)));

    app.clear_measurements();
    assert!(app.measurements().measurements().is_empty());
    assert_eq!(app.active_tool(), None);
}

#[test]
fn test_info_text() {
    let mut app = Graphix::default();
    assert_eq!(app.info_text(), "Zoom: 1.0x");
    assert_eq!(
        app.info_text_at(Some(ScreenPoint::new(450.0, 250.0))),
        "Position: (1.00, 1.00) | Zoom: 1.0x"
    );

    app.handle_event(InputEvent::PointerMove { x: 375.0, y: 325.0 }).unwrap();
    app.zoom(2.0, Some(ScreenPoint::new(400.0, 300.0))).unwrap();
    assert_eq!(app.info_text(), "Position: (-0.25, -0.25) | Zoom: 2.0x");

    app.handle_event(InputEvent::PointerLeave).unwrap();
    assert_eq!(app.info_text(), "Zoom: 2.0x");
}

#[test]
fn test_frame_contents() {
    let mut app = Graphix::default();
    let eq = app.add_equation("x").unwrap();
    app.add_point();
    app.select_tool(Tool::Distance);
    app.click_at(400.0, 300.0).unwrap();
    app.click_at(550.0, 100.0).unwrap();

    let mut surface = RecordingSurface::new(800, 600);
    assert!(app.render_frame(&mut surface).unwrap());

    assert_eq!(surface.commands[0], DrawCommand::Fill(app.theme().background));
    let texts: Vec<&str> = surface.texts().collect();
    assert_eq!(texts[0], "GraphiX");
    assert!(texts.contains(&"0"));
    assert!(texts.contains(&"2"));
    assert!(texts.contains(&"-6"));
    assert!(texts.contains(&"5.00"));

    let color = app.equations().get(eq).unwrap().color;
    let curves: Vec<_> = surface
        .polylines()
        .filter(|(_, stroke)| stroke.color == color)
        .collect();
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].0.len(), 800);
    assert_eq!(curves[0].1.width, 2.5);

    let dots = surface
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    assert_eq!(dots, 3, "one data point plus two measurement ends");

    // label box sits right before its text
    let label = surface
        .commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Text { text, .. } if text == "5.00"))
        .unwrap();
    assert!(matches!(surface.commands[label - 1], DrawCommand::Rect { .. }));
}

#[test]
fn test_pending_clicks_are_previewed() {
    let mut app = Graphix::default();
    app.select_tool(Tool::Angle);
    app.click_at(100.0, 100.0).unwrap();
    app.click_at(200.0, 100.0).unwrap();
    rendered(&mut app);

    app.handle_event(InputEvent::PointerMove { x: 10.0, y: 10.0 }).unwrap();
    let mut surface = RecordingSurface::new(800, 600);
    assert!(app.render_frame(&mut surface).unwrap());
    let accent = app.theme().accent;
    let preview: Vec<_> = surface
        .polylines()
        .filter(|(_, stroke)| stroke.color == accent)
        .collect();
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0].0.len(), 2);
}

#[test]
fn test_offscreen_huge_constant_draws_no_curve() {
    let mut app = Graphix::default();
    let eq = app.add_equation("1.7e308").unwrap();
    let color = app.equations().get(eq).unwrap().color;

    let mut surface = RecordingSurface::new(800, 600);
    app.render_frame(&mut surface).unwrap();
    assert_eq!(surface.polylines().filter(|(_, s)| s.color == color).count(), 0);

    let image = app.export_now(Rgb::WHITE).unwrap();
    let [r, g, b] = [color.r, color.g, color.b];
    let top_row_hits = (0..800)
        .filter(|&x| image.get_pixel(x, 0).0 == [r, g, b])
        .count();
    assert_eq!(top_row_hits, 0);
}

#[test]
fn test_theme_toggle() {
    let mut app = Graphix::default();
    rendered(&mut app);
    let light = app.theme().background;
    app.toggle_theme();
    assert_eq!(app.theme().name, ThemeName::Dark);
    assert_ne!(app.theme().background, light);
    assert!(rendered(&mut app));
    app.toggle_theme();
    assert_eq!(app.theme().background, light);
}

fn dominant_pixel(image: &image::RgbImage) -> [u8; 3] {
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(pixel.0).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(rgb, _)| rgb)
        .unwrap()
}

#[test]
fn test_render_frame_into_bitmap() {
    let mut app = Graphix::new(GraphixConfig {
        width: 160,
        height: 120,
        ..GraphixConfig::default()
    });
    app.add_equation("x").unwrap();
    app.select_tool(Tool::Distance);
    app.click_at(80.0, 60.0).unwrap();
    app.click_at(130.0, 10.0).unwrap();

    let mut buffer = vec![0u8; 160 * 120 * 3];
    {
        let mut surface = PlottersSurface::new(&mut buffer, 160, 120).unwrap();
        assert!(app.render_frame(&mut surface).unwrap());
        surface.present().unwrap();
    }
    let background = app.theme().background;
    let filled = buffer
        .chunks(3)
        .filter(|px| *px == [background.r, background.g, background.b])
        .count();
    assert!(filled > 160 * 120 / 2);

    let mut wrong = vec![0u8; 10];
    assert!(matches!(
        PlottersSurface::new(&mut wrong, 160, 120),
        Err(RenderError::BufferSize { expected: 57600, actual: 10 })
    ));
}

#[test]
fn test_export_now_bypasses_scheduler() {
    let config = GraphixConfig {
        width: 200,
        height: 100,
        ..GraphixConfig::default()
    };
    let mut app = Graphix::new(config);
    app.add_equation("x^2").unwrap();
    rendered(&mut app);

    let background = Rgb::new(10, 20, 30);
    let image = app.export_now(background).unwrap();
    assert_eq!(image.dimensions(), (200, 100));
    assert_eq!(dominant_pixel(&image), [10, 20, 30]);
    assert!(!rendered(&mut app), "export does not consume or request a frame");

    let png = encode_png(&image).unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn test_export_png_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphix-export.png");

    let mut app = Graphix::new(GraphixConfig {
        width: 120,
        height: 90,
        ..GraphixConfig::default()
    });
    app.add_equation("sin(x)").unwrap();
    app.import_csv("0,0\n1,1").unwrap();
    app.export_png(&path, Rgb::WHITE).unwrap();

    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (120, 90));
    assert_eq!(dominant_pixel(&decoded), [255, 255, 255]);
}

#[test]
fn test_config_file_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphix.json");
    std::fs::write(&path, r#"{ "width": 640, "theme": "dark", "wheel_zoom_in": 1.5 }"#).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.width, 640);
    assert_eq!(config.height, 600);
    assert_eq!(config.theme, ThemeName::Dark);
    assert_eq!(config.wheel_zoom_in, 1.5);
    assert_eq!(config.button_zoom_in, 1.25);

    let args = ConfigArgs {
        config: Some(path.clone()),
        height: Some(480),
        theme: Some(ThemeName::Light),
        ..ConfigArgs::default()
    };
    let resolved = args.resolve().unwrap();
    assert_eq!((resolved.width, resolved.height), (640, 480));
    assert_eq!(resolved.theme, ThemeName::Light);

    let copy = dir.path().join("copy.json");
    save_config(&resolved, &copy).unwrap();
    assert_eq!(load_config(&copy).unwrap(), resolved);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_config(&path), Err(GraphixError::Config(_))));
}

#[test]
fn test_wheel_uses_configured_factors() {
    let mut app = Graphix::new(GraphixConfig {
        wheel_zoom_in: 2.0,
        ..GraphixConfig::default()
    });
    app.handle_event(InputEvent::Wheel { x: 400.0, y: 300.0, delta_y: -1.0 })
        .unwrap();
    assert_eq!(app.viewport().scale(), 100.0);
    assert_eq!(app.info_text(), "Zoom: 2.0x");
}

#[test]
fn test_resize_event() {
    let mut app = Graphix::default();
    app.handle_event(InputEvent::Resize { width: 1024, height: 768 }).unwrap();
    assert_eq!(app.viewport().width(), 1024);
    let mut surface = RecordingSurface::new(1024, 768);
    app.render_frame(&mut surface).unwrap();
    assert_eq!(app.viewport().center(), ScreenPoint::new(512.0, 384.0));
}
