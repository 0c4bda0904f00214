//! Packing of dithered pixels into row-aligned 1-bit-per-pixel bytes.
//!
//! Bits are MSB first: bit 7 of each byte is the leftmost pixel of its
//! 8-pixel group. A set bit is a dark pixel (a dot to print). Each row
//! starts on a fresh byte and unused trailing bits are zero.

use image::{GrayImage, Luma};

use crate::{CHANNELS, Result, check_buffer};
use crate::luminance::LuminanceThresholder;

/// Number of packed bytes per row for `width` pixels.
#[inline]
pub fn bytes_per_row(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Converts a dithered RGBA buffer into packed monochrome rows.
#[derive(Debug, Clone, Copy)]
pub struct BitPacker {
    thresholder: LuminanceThresholder,
}

impl BitPacker {
    pub fn new(thresholder: LuminanceThresholder) -> Self {
        Self { thresholder }
    }

    /// Pack `width * height` RGBA pixels into `ceil(width / 8) * height` bytes.
    pub fn pack(&self, dithered: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        check_buffer(dithered, width, height)?;
        let row_pixels = width as usize * CHANNELS;
        let mut out = Vec::with_capacity(bytes_per_row(width) * height as usize);

        for row in dithered.chunks_exact(row_pixels) {
            out.extend(row.chunks(8 * CHANNELS).map(|group| {
                let mut byte_val: u8 = 0;
                for (i, px) in group.chunks_exact(CHANNELS).enumerate() {
                    if self.thresholder.is_dark([px[0], px[1], px[2], px[3]]) {
                        byte_val |= 1 << (7 - i);
                    }
                }
                byte_val
            }));
        }
        Ok(out)
    }
}

/// A packed 1bpp bitmap with its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRaster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PackedRaster {
    pub(crate) fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), bytes_per_row(width) * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> usize {
        bytes_per_row(self.width)
    }

    /// Packed bytes, row after row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Packed bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.bytes_per_row();
        let start = y as usize * stride;
        Some(&self.data[start..start + stride])
    }

    /// Iterate over packed rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.bytes_per_row())
    }

    /// Whether the pixel at `(x, y)` is printed black. Out-of-range is `false`.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width {
            return false;
        }
        self.row(y)
            .is_some_and(|row| row[x as usize / 8] & (0x80 >> (x % 8)) != 0)
    }

    /// Render the bitmap as an 8-bit grayscale preview (black = 0, white = 255).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.is_black(x, y) { 0 } else { 255 }])
        })
    }
}
