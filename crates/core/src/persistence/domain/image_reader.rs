use std::path::Path;

use crate::shared::pixel_buffer::PixelBuffer;

/// Decodes an image file into a bottom-up RGBA buffer.
pub trait ImageReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>>;
}
