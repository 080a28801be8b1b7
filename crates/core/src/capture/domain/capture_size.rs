use thiserror::Error;

use crate::shared::constants::{DEFAULT_MULTIPLIER, MAX_MULTIPLIER, MIN_MULTIPLIER};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error(
        "size multiplier must be between {min} and {max}, got {0}",
        min = MIN_MULTIPLIER,
        max = MAX_MULTIPLIER
    )]
    MultiplierOutOfRange(f32),
    #[error("{viewport_width}x{viewport_height} scaled by {multiplier} leaves no pixels")]
    EmptyCapture {
        viewport_width: u32,
        viewport_height: u32,
        multiplier: f32,
    },
}

/// Scale applied to the viewport resolution when capturing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureMultiplier(f32);

impl CaptureMultiplier {
    pub fn new(value: f32) -> Result<Self, CaptureError> {
        // Written as a contains check so NaN is rejected too.
        if (MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CaptureError::MultiplierOutOfRange(value))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for CaptureMultiplier {
    fn default() -> Self {
        Self(DEFAULT_MULTIPLIER)
    }
}

/// Pixel dimensions of the offscreen target a capture renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSize {
    pub width: u32,
    pub height: u32,
}

impl CaptureSize {
    /// Viewport dimensions scaled by `multiplier`, truncated toward zero.
    pub fn scaled(
        viewport_width: u32,
        viewport_height: u32,
        multiplier: CaptureMultiplier,
    ) -> Result<Self, CaptureError> {
        let m = multiplier.value() as f64;
        let width = (viewport_width as f64 * m) as u32;
        let height = (viewport_height as f64 * m) as u32;
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyCapture {
                viewport_width,
                viewport_height,
                multiplier: multiplier.value(),
            });
        }
        Ok(Self { width, height })
    }
}
