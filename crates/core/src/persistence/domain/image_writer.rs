use std::path::Path;

use crate::shared::pixel_buffer::PixelBuffer;

/// Encodes a buffer to an image file.
pub trait ImageWriter: Send + Sync {
    fn write(&self, path: &Path, buffer: &PixelBuffer) -> Result<(), Box<dyn std::error::Error>>;
}
