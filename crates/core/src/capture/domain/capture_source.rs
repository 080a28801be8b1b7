use crate::capture::domain::capture_size::CaptureSize;
use crate::shared::pixel_buffer::PixelBuffer;

/// Produces the pixels of a rendered view.
///
/// Implementations own whatever sequencing the producer needs (render,
/// wait for queued commands to flush, read back) and must return a
/// bottom-up buffer of exactly the requested size.
pub trait CaptureSource: Send {
    /// Identifier embedded in output filenames.
    fn name(&self) -> &str;

    /// Reference resolution that the capture multiplier scales.
    fn viewport(&self) -> (u32, u32);

    fn capture(&mut self, size: CaptureSize) -> Result<PixelBuffer, Box<dyn std::error::Error>>;
}
