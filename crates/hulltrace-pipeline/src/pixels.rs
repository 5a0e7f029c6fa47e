//! Borrowed RGBA pixel buffers.
//!
//! Decoding is the caller's job: the pipeline only ever sees interleaved
//! RGBA bytes plus dimensions. [`PixelBuffer`] validates that the two
//! agree before any sampling happens.

use image::RgbaImage;

use crate::types::{Dimensions, TraceError};

/// A read-only view of interleaved RGBA pixel data.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    dimensions: Dimensions,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA bytes laid out row-major, four bytes per pixel.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::EmptyPixelBuffer`] if `data` is empty and
    /// [`TraceError::BufferSizeMismatch`] if its length is not exactly
    /// `width * height * 4`.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, TraceError> {
        if data.is_empty() {
            return Err(TraceError::EmptyPixelBuffer);
        }
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(TraceError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            dimensions: Dimensions { width, height },
        })
    }

    /// Borrow an already-decoded [`RgbaImage`].
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::EmptyPixelBuffer`] for zero-sized images.
    pub fn from_rgba_image(image: &'a RgbaImage) -> Result<Self, TraceError> {
        Self::new(image.as_raw(), image.width(), image.height())
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Width and height together.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// The raw interleaved bytes.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The `[r, g, b, a]` value at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dimensions.width || y >= self.dimensions.height {
            return None;
        }
        let index = ((y as usize) * (self.dimensions.width as usize) + (x as usize)) * 4;
        let px = self.data.get(index..index + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate over every pixel as `[r, g, b, a]` in row-major order.
    pub fn pixels(self) -> impl Iterator<Item = [u8; 4]> + 'a {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}
