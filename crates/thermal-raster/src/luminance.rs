//! Luminance thresholding of RGBA pixels.

/// Pure black with the alpha channel set separately.
const BLACK: u8 = 0;
/// Pure white.
const WHITE: u8 = 255;

/// Perceptual luminance of an RGBA pixel (alpha ignored).
#[inline]
pub fn luminance(pixel: [u8; 4]) -> f64 {
    0.299 * f64::from(pixel[0]) + 0.587 * f64::from(pixel[1]) + 0.114 * f64::from(pixel[2])
}

/// Maps pixels to pure black or white around a fixed luminance cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuminanceThresholder {
    threshold: u8,
}

impl LuminanceThresholder {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// True when the pixel is darker than the cutoff (a dot to print).
    ///
    /// A luminance equal to the cutoff counts as white.
    #[inline]
    pub fn is_dark(&self, pixel: [u8; 4]) -> bool {
        luminance(pixel) < f64::from(self.threshold)
    }

    /// Quantize a pixel to `[0,0,0,A]` or `[255,255,255,A]`.
    #[inline]
    pub fn apply(&self, pixel: [u8; 4]) -> [u8; 4] {
        let v = if self.is_dark(pixel) { BLACK } else { WHITE };
        [v, v, v, pixel[3]]
    }
}

impl Default for LuminanceThresholder {
    fn default() -> Self {
        Self::new(128)
    }
}
