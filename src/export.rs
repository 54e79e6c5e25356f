use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbImage};
use log::info;
use std::fs;
use std::path::Path;

use crate::error::{GraphixError, RenderError};
use crate::render::{Scene, draw_scene};
use crate::surface::PlottersSurface;

/// Renders `scene` right away into a new RGB image the size of its viewport.
pub fn render_image(scene: &Scene<'_>) -> Result<RgbImage, RenderError> {
    let (width, height) = (scene.viewport.width(), scene.viewport.height());
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let mut surface = PlottersSurface::new(&mut buffer, width, height)?;
        draw_scene(&mut surface, scene)?;
        surface.present()?;
    }
    image_from_buffer(width, height, buffer)
}

/// Wraps a packed RGB buffer of `width * height` pixels as an image.
fn image_from_buffer(width: u32, height: u32, buffer: Vec<u8>) -> Result<RgbImage, RenderError> {
    let expected = width as usize * height as usize * 3;
    let actual = buffer.len();
    RgbImage::from_raw(width, height, buffer).ok_or(RenderError::BufferSize { expected, actual })
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, GraphixError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;
    Ok(bytes)
}

pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<(), GraphixError> {
    let path = path.as_ref();
    let bytes = encode_png(image)?;
    fs::write(path, &bytes)?;
    info!(
        "exported {}x{} PNG ({} bytes) to {}",
        image.width(),
        image.height(),
        bytes.len(),
        path.display()
    );
    Ok(())
}
