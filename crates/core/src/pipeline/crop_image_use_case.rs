use std::path::{Path, PathBuf};

use crate::capture::domain::capture_size::{CaptureMultiplier, CaptureSize};
use crate::capture::domain::capture_source::CaptureSource;
use crate::cropping::domain::bounding_box::BoundingBox;
use crate::cropping::domain::cropper::Cropper;
use crate::persistence::domain::image_writer::ImageWriter;
use crate::persistence::domain::output_name::{OutputName, Timestamp};

/// What a single capture produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropReport {
    pub path: PathBuf,
    pub capture_size: CaptureSize,
    pub bounds: BoundingBox,
    pub output_size: (u32, u32),
}

/// Single-capture pipeline: capture → bounds → crop → name → write.
pub struct CropImageUseCase {
    source: Box<dyn CaptureSource>,
    writer: Box<dyn ImageWriter>,
    cropper: Cropper,
    multiplier: CaptureMultiplier,
}

impl CropImageUseCase {
    pub fn new(
        source: Box<dyn CaptureSource>,
        writer: Box<dyn ImageWriter>,
        cropper: Cropper,
        multiplier: CaptureMultiplier,
    ) -> Self {
        Self {
            source,
            writer,
            cropper,
            multiplier,
        }
    }

    /// Captures the source, trims it and writes the result into `output_dir`
    /// under a resolution/timestamp/source filename.
    pub fn execute(
        &mut self,
        output_dir: &Path,
        timestamp: Timestamp,
    ) -> Result<CropReport, Box<dyn std::error::Error>> {
        let (viewport_w, viewport_h) = self.source.viewport();
        let capture_size = CaptureSize::scaled(viewport_w, viewport_h, self.multiplier)?;
        log::info!(
            "Capturing {} at {}x{} (x{})",
            self.source.name(),
            capture_size.width,
            capture_size.height,
            self.multiplier.value()
        );

        let captured = self.source.capture(capture_size)?;
        if captured.dimensions() != (capture_size.width, capture_size.height) {
            return Err(format!(
                "Capture source returned {}x{}, expected {}x{}",
                captured.width(),
                captured.height(),
                capture_size.width,
                capture_size.height
            )
            .into());
        }

        let trimmed = self.cropper.trim(&captured)?;
        let output_size = trimmed.buffer.dimensions();

        let name = OutputName::new(viewport_w, viewport_h, timestamp, self.source.name());
        let path = output_dir.join(name.file_name());
        self.writer.write(&path, &trimmed.buffer)?;
        log::info!(
            "Wrote {}x{} crop to {}",
            output_size.0,
            output_size.1,
            path.display()
        );

        Ok(CropReport {
            path,
            capture_size,
            bounds: trimmed.bounds,
            output_size,
        })
    }
}
