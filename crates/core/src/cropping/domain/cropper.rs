use thiserror::Error;

use crate::cropping::domain::bounding_box::BoundingBox;
use crate::shared::pixel_buffer::PixelBuffer;

/// Rejected crop inputs. Every variant is an invalid-input condition; nothing
/// here is transient or worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error("cannot scan an empty {width}x{height} buffer")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("no visible pixels, bounding box is empty")]
    EmptyBounds,
    #[error("bounding box {bounds:?} does not fit a {width}x{height} buffer")]
    OutOfBounds {
        bounds: BoundingBox,
        width: u32,
        height: u32,
    },
    #[error("crop region {width}x{height} has no area")]
    DegenerateRegion { width: u32, height: u32 },
}

impl CropError {
    pub fn is_invalid_input(&self) -> bool {
        true
    }
}

/// How a bounding box turns into crop dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CropExtent {
    /// `right - left` by `top - bottom`: drops the rightmost column and the
    /// top row of the box. Bit-compatible with thumbnails produced by the
    /// earlier engine-side tool.
    #[default]
    Legacy,
    /// `right - left + 1` by `top - bottom + 1`: keeps every visible pixel.
    Inclusive,
}

/// Output of [`Cropper::trim`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trimmed {
    pub bounds: BoundingBox,
    pub buffer: PixelBuffer,
}

/// Removes transparent margins, optionally padding the result to a square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cropper {
    square: bool,
    extent: CropExtent,
}

impl Cropper {
    pub fn new(square: bool) -> Self {
        Self {
            square,
            extent: CropExtent::default(),
        }
    }

    pub fn with_extent(mut self, extent: CropExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn square(&self) -> bool {
        self.square
    }

    pub fn extent(&self) -> CropExtent {
        self.extent
    }

    pub fn compute_bounds(&self, buffer: &PixelBuffer) -> Result<BoundingBox, CropError> {
        compute_bounds(buffer)
    }

    pub fn crop(&self, buffer: &PixelBuffer, bounds: &BoundingBox) -> Result<PixelBuffer, CropError> {
        crop(buffer, bounds, self.square, self.extent)
    }

    /// Scans for bounds, then crops with this cropper's settings.
    pub fn trim(&self, buffer: &PixelBuffer) -> Result<Trimmed, CropError> {
        let bounds = self.compute_bounds(buffer)?;
        log::debug!("Visible bounds {bounds:?} in {}x{} buffer", buffer.width(), buffer.height());
        let cropped = self.crop(buffer, &bounds)?;
        Ok(Trimmed {
            bounds,
            buffer: cropped,
        })
    }
}

/// Single row-major pass over `buffer` collecting the extremes of every
/// pixel with non-zero alpha.
///
/// A fully transparent buffer is not an error here: it yields the inverted
/// [`BoundingBox::empty`] seed, which [`crop`] then rejects.
pub fn compute_bounds(buffer: &PixelBuffer) -> Result<BoundingBox, CropError> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(CropError::EmptyBuffer { width, height });
    }

    let mut bounds = BoundingBox::empty(width, height);
    let w = width as usize;
    for (i, px) in buffer.pixels().iter().enumerate() {
        if px.is_visible() {
            bounds.include((i % w) as u32, (i / w) as u32);
        }
    }
    Ok(bounds)
}

/// Dimensions of the crop a box produces under `extent`, or `None` for an
/// empty box.
pub fn crop_size(bounds: &BoundingBox, extent: CropExtent) -> Option<(u32, u32)> {
    let width = bounds.right.checked_sub(bounds.left)?;
    let height = bounds.top.checked_sub(bounds.bottom)?;
    match extent {
        CropExtent::Legacy => Some((width, height)),
        CropExtent::Inclusive => Some((width.checked_add(1)?, height.checked_add(1)?)),
    }
}

/// Copies the region described by `bounds` into a new buffer.
///
/// With `square`, the region is centred on the shorter axis of a transparent
/// `max(w, h)` canvas; the leftover pixel of an odd difference goes to the
/// top/right side.
pub fn crop(
    buffer: &PixelBuffer,
    bounds: &BoundingBox,
    square: bool,
    extent: CropExtent,
) -> Result<PixelBuffer, CropError> {
    if bounds.is_empty() {
        return Err(CropError::EmptyBounds);
    }
    let (buf_w, buf_h) = buffer.dimensions();
    if !bounds.fits_within(buf_w, buf_h) {
        return Err(CropError::OutOfBounds {
            bounds: *bounds,
            width: buf_w,
            height: buf_h,
        });
    }

    let (width, height) = crop_size(bounds, extent).ok_or(CropError::EmptyBounds)?;
    if width == 0 || height == 0 {
        return Err(CropError::DegenerateRegion { width, height });
    }

    let region = buffer
        .region(bounds.left, bounds.bottom, width, height)
        .ok_or(CropError::OutOfBounds {
            bounds: *bounds,
            width: buf_w,
            height: buf_h,
        })?;

    if !square {
        return Ok(region);
    }

    let side = width.max(height);
    let (x, y) = square_offset(width, height);
    let mut canvas = PixelBuffer::transparent(side, side);
    canvas.blit(x, y, &region);
    Ok(canvas)
}

/// Placement of a `width x height` block inside its `max(w, h)` square.
fn square_offset(width: u32, height: u32) -> (u32, u32) {
    if width > height {
        (0, (width - height) / 2)
    } else {
        ((height - width) / 2, 0)
    }
}
