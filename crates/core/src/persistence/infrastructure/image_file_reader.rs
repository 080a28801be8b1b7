use std::path::Path;

use crate::persistence::domain::image_reader::ImageReader;
use crate::shared::pixel_buffer::{PixelBuffer, RowOrder};

/// Decodes image files with the `image` crate, converting every format to RGBA8.
///
/// Decoders hand rows over top-down; they are flipped so the returned
/// buffer follows the bottom-up convention.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        let buffer = PixelBuffer::from_rgba_bytes(img.as_raw(), width, height, RowOrder::TopDown)?;
        Ok(buffer)
    }
}
