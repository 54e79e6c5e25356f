use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::error::GraphixError;
use crate::theme::ThemeName;

/// Start-up settings. Every field has a default, so a config file only needs
/// to list what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphixConfig {
    pub width: u32,
    pub height: u32,
    pub theme: ThemeName,
    /// Scale multiplier for the zoom-in button.
    pub button_zoom_in: f64,
    pub button_zoom_out: f64,
    /// Scale multiplier for one wheel notch towards the user.
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub curve_width: f64,
    pub point_radius: f64,
}

impl Default for GraphixConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            theme: ThemeName::Light,
            button_zoom_in: 1.25,
            button_zoom_out: 0.8,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            curve_width: 2.5,
            point_radius: 4.0,
        }
    }
}

/// Command-line flags shared by the binaries. Explicit flags win over the file.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct ConfigArgs {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeName>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<GraphixConfig, GraphixError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GraphixConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        Ok(config)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<GraphixConfig, GraphixError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: GraphixConfig = serde_json::from_reader(reader)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn save_config(config: &GraphixConfig, path: impl AsRef<Path>) -> Result<(), GraphixError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, config)?;
    Ok(())
}
