use thiserror::Error;

use crate::shared::pixel::Rgba8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PixelBufferError {
    #[error("pixel count {actual} does not match {width}x{height} (expected {expected})")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Row order of raw pixel data handed over by a producer or consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    /// First row is the top of the image (image files, most decoders).
    TopDown,
    /// First row is the bottom of the image (GPU readbacks, y-up textures).
    BottomUp,
}

/// A width/height-tagged RGBA image stored row-major.
///
/// Row 0 is the bottom row: `y` grows upward. Producers that hand over
/// top-down data convert through [`RowOrder`] at the boundary, so
/// everything downstream sees a single convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgba8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn new(pixels: Vec<Rgba8>, width: u32, height: u32) -> Result<Self, PixelBufferError> {
        let expected = area(width, height);
        if pixels.len() != expected {
            return Err(PixelBufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn filled(width: u32, height: u32, pixel: Rgba8) -> Self {
        Self {
            pixels: vec![pixel; area(width, height)],
            width,
            height,
        }
    }

    /// A canvas where every pixel is [`Rgba8::CLEAR`].
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::CLEAR)
    }

    /// Builds a buffer from packed RGBA bytes in the given row order.
    pub fn from_rgba_bytes(
        bytes: &[u8],
        width: u32,
        height: u32,
        order: RowOrder,
    ) -> Result<Self, PixelBufferError> {
        let expected = area(width, height);
        if bytes.len() != expected * 4 {
            return Err(PixelBufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: bytes.len() / 4,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();
        let buffer = Self::new(pixels, width, height)?;
        Ok(match order {
            RowOrder::BottomUp => buffer,
            RowOrder::TopDown => buffer.flipped_vertical(),
        })
    }

    /// Packs the pixels into RGBA bytes in the requested row order.
    pub fn to_rgba_bytes(&self, order: RowOrder) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        match order {
            RowOrder::BottomUp => {
                for px in &self.pixels {
                    bytes.extend_from_slice(&px.to_array());
                }
            }
            RowOrder::TopDown => {
                for row in self.rows().rev() {
                    for px in row {
                        bytes.extend_from_slice(&px.to_array());
                    }
                }
            }
        }
        bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes a pixel; out-of-range coordinates are ignored and reported as `false`.
    pub fn set(&mut self, x: u32, y: u32, pixel: Rgba8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = pixel;
                true
            }
            None => false,
        }
    }

    /// Copies the `width x height` block whose lower-left corner is `(x, y)`.
    ///
    /// Returns `None` if the block does not fit inside the buffer.
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Option<PixelBuffer> {
        if !self.contains_block(x, y, width, height) {
            return None;
        }
        let mut pixels = Vec::with_capacity(area(width, height));
        for row in y..y + height {
            let start = row as usize * self.width as usize + x as usize;
            pixels.extend_from_slice(&self.pixels[start..start + width as usize]);
        }
        Some(PixelBuffer {
            pixels,
            width,
            height,
        })
    }

    /// Overwrites the block at `(x, y)` with the contents of `src`.
    ///
    /// Returns `false` and leaves `self` untouched if `src` does not fit.
    pub fn blit(&mut self, x: u32, y: u32, src: &PixelBuffer) -> bool {
        if !self.contains_block(x, y, src.width, src.height) {
            return false;
        }
        for (src_row, row) in src.rows().zip(y..) {
            let start = row as usize * self.width as usize + x as usize;
            self.pixels[start..start + src_row.len()].copy_from_slice(src_row);
        }
        true
    }

    pub fn flipped_vertical(&self) -> PixelBuffer {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.rows().rev() {
            pixels.extend_from_slice(row);
        }
        PixelBuffer {
            pixels,
            width: self.width,
            height: self.height,
        }
    }

    /// Rows from bottom (`y = 0`) to top.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Rgba8]> + '_ {
        // chunks_exact(0) panics; a zero-width buffer has no pixels anyway.
        let chunk = (self.width as usize).max(1);
        self.pixels.chunks_exact(chunk)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    fn contains_block(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        x.checked_add(width).is_some_and(|r| r <= self.width)
            && y.checked_add(height).is_some_and(|t| t <= self.height)
    }
}

fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::opaque(255, 0, 0);
    const BLUE: Rgba8 = Rgba8::opaque(0, 0, 255);

    /// 3x2 buffer where each pixel encodes its own coordinates in r/g.
    fn coordinate_buffer(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.push(Rgba8::new(x as u8, y as u8, 0, 255));
            }
        }
        PixelBuffer::new(pixels, width, height).unwrap()
    }

    #[test]
    fn test_construction_and_accessors() {
        let buffer = PixelBuffer::filled(4, 3, RED);
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.dimensions(), (4, 3));
        assert_eq!(buffer.pixels().len(), 12);
        assert!(buffer.pixels().iter().all(|p| *p == RED));
    }

    #[test]
    fn test_mismatched_length_is_rejected() {
        let err = PixelBuffer::new(vec![RED; 5], 2, 3).unwrap_err();
        assert_eq!(
            err,
            PixelBufferError::LengthMismatch {
                width: 2,
                height: 3,
                expected: 6,
                actual: 5,
            }
        );
    }

    #[test]
    fn test_transparent_is_clear() {
        let buffer = PixelBuffer::transparent(3, 3);
        assert!(buffer.pixels().iter().all(|p| *p == Rgba8::CLEAR));
    }

    #[test]
    fn test_zero_sized_buffer_is_empty() {
        let buffer = PixelBuffer::transparent(0, 5);
        assert!(buffer.is_empty());
        assert_eq!(buffer.rows().count(), 0);
    }

    #[test]
    fn test_get_and_set() {
        let mut buffer = PixelBuffer::transparent(2, 2);
        assert!(buffer.set(1, 0, BLUE));
        assert_eq!(buffer.get(1, 0), Some(BLUE));
        assert_eq!(buffer.pixels()[1], BLUE);
        assert!(!buffer.set(2, 0, BLUE));
        assert_eq!(buffer.get(0, 2), None);
    }

    #[test]
    fn test_region_copies_block() {
        let buffer = coordinate_buffer(4, 3);
        let block = buffer.region(1, 1, 2, 2).unwrap();
        assert_eq!(block.dimensions(), (2, 2));
        assert_eq!(block.get(0, 0), Some(Rgba8::new(1, 1, 0, 255)));
        assert_eq!(block.get(1, 1), Some(Rgba8::new(2, 2, 0, 255)));
    }

    #[test]
    fn test_region_out_of_range_is_none() {
        let buffer = coordinate_buffer(4, 3);
        assert!(buffer.region(3, 0, 2, 1).is_none());
        assert!(buffer.region(0, 2, 1, 2).is_none());
        assert!(buffer.region(u32::MAX, 0, 2, 1).is_none());
    }

    #[test]
    fn test_blit_writes_block() {
        let mut canvas = PixelBuffer::transparent(4, 4);
        let patch = PixelBuffer::filled(2, 1, RED);
        assert!(canvas.blit(1, 2, &patch));
        assert_eq!(canvas.get(1, 2), Some(RED));
        assert_eq!(canvas.get(2, 2), Some(RED));
        assert_eq!(canvas.get(3, 2), Some(Rgba8::CLEAR));
        assert_eq!(canvas.get(1, 1), Some(Rgba8::CLEAR));
    }

    #[test]
    fn test_blit_rejects_oversized_source() {
        let mut canvas = PixelBuffer::transparent(2, 2);
        let patch = PixelBuffer::filled(2, 2, RED);
        assert!(!canvas.blit(1, 0, &patch));
        assert!(canvas.pixels().iter().all(|p| *p == Rgba8::CLEAR));
    }

    #[test]
    fn test_flipped_vertical_reverses_rows() {
        let buffer = coordinate_buffer(2, 3);
        let flipped = buffer.flipped_vertical();
        assert_eq!(flipped.get(0, 0), Some(Rgba8::new(0, 2, 0, 255)));
        assert_eq!(flipped.get(1, 2), Some(Rgba8::new(1, 0, 0, 255)));
        assert_eq!(flipped.flipped_vertical(), buffer);
    }

    #[test]
    fn test_from_top_down_bytes_puts_first_row_on_top() {
        // Top row red, bottom row blue, as an image decoder would hand it over.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&RED.to_array());
        bytes.extend_from_slice(&BLUE.to_array());
        let buffer = PixelBuffer::from_rgba_bytes(&bytes, 1, 2, RowOrder::TopDown).unwrap();
        assert_eq!(buffer.get(0, 1), Some(RED));
        assert_eq!(buffer.get(0, 0), Some(BLUE));
    }

    #[test]
    fn test_from_bottom_up_bytes_keeps_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&RED.to_array());
        bytes.extend_from_slice(&BLUE.to_array());
        let buffer = PixelBuffer::from_rgba_bytes(&bytes, 1, 2, RowOrder::BottomUp).unwrap();
        assert_eq!(buffer.get(0, 0), Some(RED));
        assert_eq!(buffer.get(0, 1), Some(BLUE));
    }

    #[test]
    fn test_from_rgba_bytes_rejects_short_input() {
        assert!(PixelBuffer::from_rgba_bytes(&[0; 7], 1, 2, RowOrder::TopDown).is_err());
    }

    #[test]
    fn test_to_rgba_bytes_matches_input_order() {
        let buffer = coordinate_buffer(3, 2);
        let top_down = buffer.to_rgba_bytes(RowOrder::TopDown);
        let back = PixelBuffer::from_rgba_bytes(&top_down, 3, 2, RowOrder::TopDown).unwrap();
        assert_eq!(back, buffer);
        // First pixel of top-down output is the top-left pixel (y = 1).
        assert_eq!(&top_down[..4], &[0, 1, 0, 255]);
    }

    #[test]
    fn test_clone_is_independent() {
        let buffer = PixelBuffer::filled(2, 2, RED);
        let mut cloned = buffer.clone();
        cloned.set(0, 0, BLUE);
        assert_eq!(buffer.get(0, 0), Some(RED));
        assert_eq!(cloned.get(0, 0), Some(BLUE));
    }
}
