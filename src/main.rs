#![cfg(not(tarpaulin_include))]

use clap::Parser;
use env_logger::Env;
use graphix::config::ConfigArgs;
use graphix::surface::PlottersSurface;
use graphix::{Axis, EquationId, Graphix, InputEvent, PointId, Rgb, ScreenPoint, Tool};
use std::io::{self, Write};
use std::time::Instant;

/// Interactive GraphiX session driven by commands on stdin
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Start with an empty equation list
    #[arg(long)]
    empty: bool,
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  add <expr>: Plot y = <expr>");
    println!("  edit <n> <expr>: Replace equation n");
    println!("  rm <n>: Remove equation n");
    println!("  color <n> <#rrggbb>: Recolour equation n");
    println!("  list: Show equations, points and measurements");
    println!("  point add | point set <n> <x|y> <value> | point rm <n>");
    println!("  csv <path>: Replace all points with a CSV file");
    println!("  pan <dx> <dy>: Move the view by pixels");
    println!("  drag <x0> <y0> <x1> <y1>: Drag the canvas");
    println!("  zoom in | zoom out | zoom <factor> [px py]");
    println!("  wheel <px> <py> <delta>: Scroll the wheel over a pixel");
    println!("  reset: Restore the default view");
    println!("  resize <w> <h>: Change the canvas size");
    println!("  tool distance | tool angle: Toggle a measurement tool");
    println!("  click <px> <py>: Click on the canvas");
    println!("  clear: Drop all measurements");
    println!("  theme: Toggle light/dark theme");
    println!("  info [px py]: Show the status line");
    println!("  export <path> [#rrggbb]: Save a PNG");
}

fn nth_equation(app: &Graphix, arg: Option<&str>) -> Option<EquationId> {
    let n: usize = arg?.parse().ok()?;
    app.equations().iter().nth(n.checked_sub(1)?).map(|e| e.id)
}

fn nth_point(app: &Graphix, arg: Option<&str>) -> Option<PointId> {
    let n: usize = arg?.parse().ok()?;
    app.points().iter().nth(n.checked_sub(1)?).map(|p| p.id)
}

fn numbers<const N: usize>(args: &[&str]) -> Option<[f64; N]> {
    if args.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().ok()?;
    }
    Some(out)
}

/// Canvas size from exactly two non-negative integers.
fn dimensions(args: &[&str]) -> Option<(u32, u32)> {
    match args {
        [w, h] => Some((w.parse().ok()?, h.parse().ok()?)),
        _ => None,
    }
}

fn list(app: &Graphix) {
    for (i, eq) in app.equations().iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, eq.function, eq.color);
    }
    for (i, p) in app.points().iter().enumerate() {
        println!("  p{}. ({}, {})", i + 1, p.x, p.y);
    }
    for m in app.measurements().measurements() {
        println!("  {}: {}", m.tool, m.value.label());
    }
}

/// Runs one command. Returns the status shown in the next prompt.
fn run_command(app: &mut Graphix, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let (head, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    match head {
        "add" if !rest.is_empty() => {
            app.add_equation(rest)?;
        }
        "edit" => {
            let (n, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let Some(id) = nth_equation(app, Some(n)) else {
                return Ok("no such equation".into());
            };
            let outcome = app.edit_equation(id, text)?;
            return Ok(format!("{:?}", outcome).to_lowercase());
        }
        "rm" => {
            let Some(id) = nth_equation(app, args.first().copied()) else {
                return Ok("no such equation".into());
            };
            app.remove_equation(id)?;
        }
        "color" => {
            let Some(id) = nth_equation(app, args.first().copied()) else {
                return Ok("no such equation".into());
            };
            let Some(color) = args.get(1).and_then(|c| c.parse::<Rgb>().ok()) else {
                return Ok("invalid colour".into());
            };
            app.set_equation_color(id, color)?;
        }
        "list" => list(app),
        "point" => match args.as_slice() {
            ["add"] => {
                app.add_point();
            }
            ["set", n, axis, value] => {
                let Some(id) = nth_point(app, Some(*n)) else {
                    return Ok("no such point".into());
                };
                let axis = match *axis {
                    "x" => Axis::X,
                    "y" => Axis::Y,
                    _ => return Ok("axis must be x or y".into()),
                };
                let value: f64 = value.parse().unwrap_or(f64::NAN);
                if !app.update_point(id, axis, value) {
                    return Ok("ignored".into());
                }
            }
            ["rm", n] => {
                let Some(id) = nth_point(app, Some(*n)) else {
                    return Ok("no such point".into());
                };
                app.remove_point(id)?;
            }
            _ => return Ok("invalid command".into()),
        },
        "csv" if !rest.is_empty() => {
            let count = app.import_csv_file(rest)?;
            return Ok(format!("{} points", count));
        }
        "pan" => {
            let Some([dx, dy]) = numbers::<2>(&args) else {
                return Ok("invalid command".into());
            };
            app.pan(dx, dy);
        }
        "drag" => {
            let Some([x0, y0, x1, y1]) = numbers::<4>(&args) else {
                return Ok("invalid command".into());
            };
            app.handle_event(InputEvent::PointerDown { x: x0, y: y0 })?;
            app.handle_event(InputEvent::PointerMove { x: x1, y: y1 })?;
            app.handle_event(InputEvent::PointerUp)?;
        }
        "zoom" => match args.as_slice() {
            ["in"] => app.zoom_in()?,
            ["out"] => app.zoom_out()?,
            [factor, coords @ ..] => {
                let factor: f64 = factor.parse()?;
                let anchor = numbers::<2>(coords).map(|[x, y]| ScreenPoint::new(x, y));
                app.zoom(factor, anchor)?;
            }
            [] => return Ok("invalid command".into()),
        },
        "wheel" => {
            let Some([x, y, delta_y]) = numbers::<3>(&args) else {
                return Ok("invalid command".into());
            };
            app.handle_event(InputEvent::Wheel { x, y, delta_y })?;
        }
        "reset" => app.handle_event(InputEvent::DoubleClick).map(|_| ())?,
        "resize" => {
            let Some((width, height)) = dimensions(&args) else {
                return Ok("invalid command".into());
            };
            app.handle_event(InputEvent::Resize { width, height })?;
        }
        "tool" => {
            match rest {
                "distance" => app.select_tool(Tool::Distance),
                "angle" => app.select_tool(Tool::Angle),
                _ => return Ok("unknown tool".into()),
            }
            return Ok(match app.active_tool() {
                Some(tool) => format!("{} tool", tool),
                None => "no tool".into(),
            });
        }
        "click" => {
            let Some([x, y]) = numbers::<2>(&args) else {
                return Ok("invalid command".into());
            };
            if let Some(m) = app.handle_event(InputEvent::PointerDown { x, y })? {
                return Ok(format!("{}: {}", m.tool, m.value.label()));
            }
            app.handle_event(InputEvent::PointerUp)?;
        }
        "clear" => app.clear_measurements(),
        "theme" => app.toggle_theme(),
        "info" => {
            let cursor = numbers::<2>(&args).map(|[x, y]| ScreenPoint::new(x, y));
            println!("{}", app.info_text_at(cursor));
        }
        "export" => {
            let Some(path) = args.first() else {
                return Ok("invalid command".into());
            };
            let background = match args.get(1) {
                Some(c) => c.parse::<Rgb>()?,
                None => app.theme().background,
            };
            app.export_png(path, background)?;
        }
        _ => return Ok("invalid command".into()),
    }
    Ok("ok".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = cli.config.resolve()?;

    let mut app = Graphix::new(config);
    if !cli.empty {
        for text in graphix::app::STARTUP_EQUATIONS {
            app.add_equation(text)?;
        }
    }

    let mut frame = Vec::new();
    let mut status = String::from("ok");
    let mut start_time = Instant::now();
    loop {
        // stands in for the display refresh
        let (w, h) = (app.viewport().width(), app.viewport().height());
        frame.resize(w as usize * h as usize * 3, 0);
        {
            let mut surface = PlottersSurface::new(&mut frame, w, h)?;
            app.render_frame(&mut surface)?;
        }

        print!("[{:.1}] ({}) > ", start_time.elapsed().as_secs_f64(), status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();

        match command {
            "" => status = String::from("invalid command"),
            "q" | "quit" => break,
            "help" => print_help(),
            _ => {
                status = match run_command(&mut app, command) {
                    Ok(s) => s,
                    Err(e) => e.to_string(),
                }
            }
        }
    }
    Ok(())
}
