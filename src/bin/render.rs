#![cfg(not(tarpaulin_include))]

use clap::Parser;
use env_logger::Env;
use graphix::config::ConfigArgs;
use graphix::{Graphix, Rgb};
use std::path::PathBuf;

/// Render equations (and optionally CSV points) straight to a PNG
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Equations to plot, e.g. "x^2" "sin(x)"
    #[arg(required = true)]
    equations: Vec<String>,

    /// Headerless x,y CSV of points to draw
    #[arg(long)]
    points: Option<PathBuf>,

    /// Solid background colour, defaults to the theme's
    #[arg(long)]
    background: Option<Rgb>,

    #[arg(short, long, default_value = "graphix-export.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut app = Graphix::new(cli.config.resolve()?);
    for text in &cli.equations {
        app.add_equation(text)?;
    }
    if let Some(path) = &cli.points {
        app.import_csv_file(path)?;
    }

    let background = cli.background.unwrap_or(app.theme().background);
    app.export_png(&cli.output, background)?;
    println!("Created graph at {}", cli.output.display());
    Ok(())
}
