use std::path::Path;

use crate::persistence::domain::image_writer::ImageWriter;
use crate::shared::pixel_buffer::{PixelBuffer, RowOrder};

/// Writes buffers as RGBA PNG files using the `image` crate.
pub struct PngFileWriter;

impl PngFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for PngFileWriter {
    fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>> {
        if buffer.is_empty() {
            return Err(format!(
                "Cannot encode a {}x{} buffer",
                buffer.width(),
                buffer.height()
            )
            .into());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbaImage::from_raw(
            buffer.width(),
            buffer.height(),
            buffer.to_rgba_bytes(RowOrder::TopDown),
        )
        .ok_or("Failed to create image from pixel buffer")?;

        img.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
