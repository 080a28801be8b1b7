/// Smallest accepted capture size multiplier.
pub const MIN_MULTIPLIER: f32 = 0.1;
/// Largest accepted capture size multiplier.
pub const MAX_MULTIPLIER: f32 = 3.0;
pub const DEFAULT_MULTIPLIER: f32 = 1.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "tga", "tiff", "tif", "webp", "bmp"];

pub const OUTPUT_EXTENSION: &str = "png";

/// Appended to the file stem of batch outputs.
pub const BATCH_OUTPUT_SUFFIX: &str = "_cropped";

/// Source identifier used when a capture source has no usable name.
pub const FALLBACK_SOURCE_NAME: &str = "capture";
