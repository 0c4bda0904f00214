//! The rasterization entry point: dither, then pack.

use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::clamp::clamp;
use crate::dither::DitherEngine;
use crate::kernel::Kernel;
use crate::luminance::LuminanceThresholder;
use crate::options::RasterOptions;
use crate::pack::{BitPacker, PackedRaster};
use crate::Result;

/// Converts RGBA buffers into packed 1bpp rows.
///
/// Kernel, divisor and threshold are fixed at construction; every call
/// works on its own copy of the input, so one instance can be reused and
/// shared freely.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    kernel: Kernel,
    thresholder: LuminanceThresholder,
}

impl Rasterizer {
    /// Build a rasterizer, validating the kernel.
    ///
    /// The threshold is clamped and rounded into `0..=255` and a divisor
    /// of zero or less becomes 1.
    pub fn new(options: &RasterOptions) -> Result<Self> {
        let kernel = Kernel::new(&options.matrix_pattern.matrix(), options.divisor)?;
        let thresholder = LuminanceThresholder::new(clamp(options.threshold));
        debug!(
            threshold = thresholder.threshold(),
            divisor = kernel.divisor(),
            anchor = kernel.anchor(),
            rows = kernel.rows(),
            cols = kernel.cols(),
            "Rasterizer configured"
        );
        Ok(Self {
            kernel,
            thresholder,
        })
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn threshold(&self) -> u8 {
        self.thresholder.threshold()
    }

    /// Dither and pack `image_data` (RGBA, `width * height * 4` bytes).
    ///
    /// Returns `ceil(width / 8) * height` bytes, MSB first, set bit = black.
    pub fn raster(&self, image_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        debug!(width, height, "Rasterizing image");

        let engine = DitherEngine::new(&self.kernel, self.thresholder);
        let dithered = engine.dither(image_data, width, height)?;
        let packed = BitPacker::new(self.thresholder).pack(&dithered, width, height)?;

        debug!(bytes = packed.len(), "Rasterization complete");
        Ok(packed)
    }

    /// Like [`raster`](Self::raster), keeping the dimensions with the bytes.
    pub fn raster_packed(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PackedRaster> {
        let data = self.raster(image_data, width, height)?;
        Ok(PackedRaster::new(width, height, data))
    }

    /// Rasterize an in-memory RGBA image.
    pub fn raster_image(&self, img: &RgbaImage) -> Result<PackedRaster> {
        let (width, height) = img.dimensions();
        self.raster_packed(img.as_raw(), width, height)
    }

    /// Rasterize any in-memory image, converting it to RGBA8 first.
    pub fn raster_dynamic(&self, img: &DynamicImage) -> Result<PackedRaster> {
        self.raster_image(&img.to_rgba8())
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            thresholder: LuminanceThresholder::default(),
        }
    }
}

/// Rasterize with the default JJN kernel, divisor 48 and threshold 128.
pub fn raster(image_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    Rasterizer::default().raster(image_data, width, height)
}
