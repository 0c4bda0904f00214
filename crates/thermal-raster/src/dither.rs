//! Single-pass error-diffusion dithering over RGBA buffers.
//!
//! Pixels are visited once in raster order (top-to-bottom, left-to-right).
//! Each pixel is thresholded from its current, error-adjusted color and its
//! quantization error is pushed forward into unvisited neighbors.

use tracing::debug;

use crate::{CHANNELS, Result, check_buffer};
use crate::diffuse::ErrorDiffuser;
use crate::kernel::Kernel;
use crate::luminance::LuminanceThresholder;

/// Drives a forward dithering pass with a fixed kernel and threshold.
#[derive(Debug, Clone, Copy)]
pub struct DitherEngine<'a> {
    thresholder: LuminanceThresholder,
    diffuser: ErrorDiffuser<'a>,
}

impl<'a> DitherEngine<'a> {
    pub fn new(kernel: &'a Kernel, thresholder: LuminanceThresholder) -> Self {
        Self {
            thresholder,
            diffuser: ErrorDiffuser::new(kernel),
        }
    }

    /// Dither a copy of `image`, returning a buffer of pure black/white pixels.
    ///
    /// `image` must hold exactly `width * height * 4` bytes.
    pub fn dither(&self, image: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        check_buffer(image, width, height)?;
        debug!(width, height, "Applying error-diffusion dithering");

        let mut buffer = image.to_vec();
        let mut idx = 0;
        for y in 0..height {
            for x in 0..width {
                let original = [
                    buffer[idx],
                    buffer[idx + 1],
                    buffer[idx + 2],
                    buffer[idx + 3],
                ];
                let quantized = self.thresholder.apply(original);
                self.diffuser
                    .diffuse(&mut buffer, original, quantized, x, y, width, height);
                buffer[idx..idx + CHANNELS].copy_from_slice(&quantized);
                idx += CHANNELS;
            }
        }

        debug!("Error-diffusion dithering complete");
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RasterError;
    use crate::kernel::KernelPreset;

    /// RGBA gradient running dark to light along both axes.
    fn create_gradient_image(width: u32, height: u32) -> Vec<u8> {
        let mut img = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let val = ((x + y) * 255 / (width + height - 2)) as u8;
                img.extend_from_slice(&[val, val, val, 255]);
            }
        }
        img
    }

    fn engine(kernel: &Kernel) -> DitherEngine<'_> {
        DitherEngine::new(kernel, LuminanceThresholder::default())
    }

    #[test]
    fn test_dither_output_is_binary() {
        let kernel = Kernel::default();
        let img = create_gradient_image(8, 8);
        let result = engine(&kernel).dither(&img, 8, 8).unwrap();

        assert_eq!(result.len(), img.len());
        for (i, px) in result.chunks_exact(CHANNELS).enumerate() {
            assert!(
                px[..3] == [0, 0, 0] || px[..3] == [255, 255, 255],
                "Pixel {i} = {px:?}, expected black or white"
            );
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_dither_does_not_mutate_input() {
        let kernel = Kernel::default();
        let img = create_gradient_image(5, 4);
        let copy = img.clone();
        let _ = engine(&kernel).dither(&img, 5, 4).unwrap();
        assert_eq!(img, copy);
    }

    #[test]
    fn test_dither_all_white_and_all_black() {
        let kernel = Kernel::preset(KernelPreset::Atkinson);
        let white = [255u8, 255, 255, 255].repeat(12);
        assert_eq!(engine(&kernel).dither(&white, 4, 3).unwrap(), white);
        let black = [0u8, 0, 0, 255].repeat(12);
        assert_eq!(engine(&kernel).dither(&black, 4, 3).unwrap(), black);
    }

    #[test]
    fn test_dither_known_2x2_grey() {
        // Grey 100 everywhere: three dark pixels push enough error into
        // (1,1) to lift it over the threshold (100 -> 110 -> 125 -> 140).
        let kernel = Kernel::default();
        let img = [100u8, 100, 100, 255].repeat(4);
        let result = engine(&kernel).dither(&img, 2, 2).unwrap();
        assert_eq!(
            result,
            vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 255]
        );
    }

    #[test]
    fn test_dither_rejects_bad_input() {
        let kernel = Kernel::default();
        assert_eq!(
            engine(&kernel).dither(&[0; 8], 2, 2),
            Err(RasterError::BufferSizeMismatch {
                expected: 16,
                actual: 8
            })
        );
        assert_eq!(
            engine(&kernel).dither(&[], 4, 0),
            Err(RasterError::InvalidDimensions { width: 4, height: 0 })
        );
    }

    #[test]
    fn test_dither_is_deterministic() {
        let kernel = Kernel::default();
        let img = create_gradient_image(13, 7);
        let a = engine(&kernel).dither(&img, 13, 7).unwrap();
        let b = engine(&kernel).dither(&img, 13, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dither_preserves_alpha() {
        let kernel = Kernel::default();
        let img = vec![90, 90, 90, 7, 200, 200, 200, 0, 30, 30, 30, 128];
        let result = engine(&kernel).dither(&img, 3, 1).unwrap();
        assert_eq!(result, vec![0, 0, 0, 7, 255, 255, 255, 0, 0, 0, 0, 128]);
    }
}
