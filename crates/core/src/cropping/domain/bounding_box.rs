/// Extremal coordinates of the visible pixels in a buffer, inclusive on all sides.
///
/// `bottom` is the smallest row index and `top` the largest, matching the
/// y-up convention of [`PixelBuffer`](crate::shared::pixel_buffer::PixelBuffer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl BoundingBox {
    /// The inverted seed a scan starts from: `left = width`, `bottom = height`,
    /// `right = top = 0`. It stays empty until a visible pixel is included.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            left: width,
            right: 0,
            top: 0,
            bottom: height,
        }
    }

    /// True when no pixel was ever included.
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }

    /// Tightens the box so it covers `(x, y)`.
    pub fn include(&mut self, x: u32, y: u32) {
        if x < self.left {
            self.left = x;
        }
        if x > self.right {
            self.right = x;
        }
        if y > self.top {
            self.top = y;
        }
        if y < self.bottom {
            self.bottom = y;
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.left..=self.right).contains(&x) && (self.bottom..=self.top).contains(&y)
    }

    /// Every edge lies on a valid column/row of a `width x height` buffer.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left < width && self.right < width && self.bottom < height && self.top < height
    }
}
