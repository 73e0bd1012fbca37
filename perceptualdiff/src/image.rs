//! Packed RGBA pixel buffer.
//!
//! Pixels are stored row-major as one `u32` per pixel in ARGB order
//! (alpha in bits 24-31, red in 16-23, green in 8-15, blue in 0-7).
//!
//! The channel accessors used by the metric read this word with red and
//! blue exchanged: [`RgbaImage::red`] returns bits 0-7 and
//! [`RgbaImage::blue`] returns bits 16-23. The published fixture counts
//! were produced with that ordering, so it is kept on purpose.

use imgref::ImgRef;
use rgb::RGBA8;

use crate::PdiffError;

const OPAQUE_BLACK: u32 = pack(0, 0, 0, 255);
const OPAQUE_RED: u32 = pack(255, 0, 0, 255);

#[inline]
const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// An RGBA image with 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    data: Vec<u32>,
    width: usize,
    height: usize,
}

impl RgbaImage {
    /// Creates a fully transparent black image.
    ///
    /// # Panics
    /// Panics if `width * height` overflows `usize`; see [`Self::try_new`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Ok(img) => img,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a fully transparent black image.
    ///
    /// # Errors
    /// Returns [`PdiffError::ImageTooLarge`] if the pixel count overflows.
    pub fn try_new(width: usize, height: usize) -> Result<Self, PdiffError> {
        let len = width
            .checked_mul(height)
            .ok_or(PdiffError::ImageTooLarge { width, height })?;

        Ok(Self {
            data: vec![0; len],
            width,
            height,
        })
    }

    /// Creates an image from an interleaved `RGBARGBA...` byte buffer.
    ///
    /// # Errors
    /// Returns [`PdiffError::InvalidBufferSize`] if `rgba.len()` is not
    /// `width * height * 4`, or [`PdiffError::ImageTooLarge`] if that
    /// product overflows.
    pub fn from_rgba8(rgba: &[u8], width: usize, height: usize) -> Result<Self, PdiffError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(PdiffError::ImageTooLarge { width, height })?;
        if rgba.len() != expected {
            return Err(PdiffError::InvalidBufferSize {
                expected,
                actual: rgba.len(),
            });
        }

        let data = rgba
            .chunks_exact(4)
            .map(|c| pack(c[0], c[1], c[2], c[3]))
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image from an `imgref` view, honouring its stride.
    #[must_use]
    pub fn from_imgref(img: ImgRef<'_, RGBA8>) -> Self {
        let mut data = Vec::with_capacity(img.width() * img.height());
        for row in img.rows() {
            data.extend(row.iter().map(|px| pack(px.r, px.g, px.b, px.a)));
        }

        Self {
            data,
            width: img.width(),
            height: img.height(),
        }
    }

    /// Image width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the image has no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Packed ARGB word of the pixel at linear index `i`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> u32 {
        self.data[i]
    }

    /// Packed ARGB words, row-major.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Bits 0-7 of the packed word.
    #[inline]
    #[must_use]
    pub fn red(&self, i: usize) -> u8 {
        (self.data[i] & 0xFF) as u8
    }

    /// Bits 8-15 of the packed word.
    #[inline]
    #[must_use]
    pub fn green(&self, i: usize) -> u8 {
        ((self.data[i] >> 8) & 0xFF) as u8
    }

    /// Bits 16-23 of the packed word.
    #[inline]
    #[must_use]
    pub fn blue(&self, i: usize) -> u8 {
        ((self.data[i] >> 16) & 0xFF) as u8
    }

    /// Bits 24-31 of the packed word.
    #[inline]
    #[must_use]
    pub fn alpha(&self, i: usize) -> u8 {
        (self.data[i] >> 24) as u8
    }

    /// Stores a conventional (non-swapped) RGBA colour at linear index `i`.
    #[inline]
    pub fn set(&mut self, r: u8, g: u8, b: u8, a: u8, i: usize) {
        self.data[i] = pack(r, g, b, a);
    }

    /// Mutable packed words, row-major.
    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Converts back to interleaved RGBA bytes in conventional order.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for &p in &self.data {
            out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8]);
        }
        out
    }
}

/// Paint value for a pixel that passed (`false`) or failed (`true`).
#[inline]
pub(crate) fn difference_color(failed: bool) -> u32 {
    if failed {
        OPAQUE_RED
    } else {
        OPAQUE_BLACK
    }
}
