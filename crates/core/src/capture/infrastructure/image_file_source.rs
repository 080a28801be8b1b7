use std::path::{Path, PathBuf};

use crate::capture::domain::capture_size::CaptureSize;
use crate::capture::domain::capture_source::CaptureSource;
use crate::persistence::domain::image_reader::ImageReader;
use crate::shared::constants::FALLBACK_SOURCE_NAME;
use crate::shared::pixel_buffer::{PixelBuffer, RowOrder};

/// Treats a pre-rendered image on disk as the rendered view.
///
/// The image's own dimensions act as the viewport. Captures at any other
/// size are resampled with a triangle filter, the same way a renderer would
/// rasterize the view at a different target resolution.
pub struct ImageFileSource {
    path: PathBuf,
    name: String,
    frame: PixelBuffer,
}

impl ImageFileSource {
    /// Decodes `path` once; every capture works from the decoded frame.
    pub fn open(path: &Path, reader: &dyn ImageReader) -> Result<Self, Box<dyn std::error::Error>> {
        let frame = reader.read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| FALLBACK_SOURCE_NAME.to_string());
        log::debug!(
            "Opened capture source {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            name,
            frame,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for ImageFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn viewport(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn capture(&mut self, size: CaptureSize) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
        if (size.width, size.height) == self.frame.dimensions() {
            return Ok(self.frame.clone());
        }
        if self.frame.is_empty() {
            return Err(format!("Capture source {} has no pixels", self.path.display()).into());
        }

        // Resampling is orientation-agnostic, so bottom-up rows go straight through.
        let img = image::RgbaImage::from_raw(
            self.frame.width(),
            self.frame.height(),
            self.frame.to_rgba_bytes(RowOrder::BottomUp),
        )
        .ok_or("Failed to wrap capture frame")?;
        let resized = image::imageops::resize(
            &img,
            size.width,
            size.height,
            image::imageops::FilterType::Triangle,
        );
        let buffer =
            PixelBuffer::from_rgba_bytes(resized.as_raw(), size.width, size.height, RowOrder::BottomUp)?;
        Ok(buffer)
    }
}
