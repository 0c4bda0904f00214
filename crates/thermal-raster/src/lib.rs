//! Monochrome rasterization for thermal printers.
//!
//! Converts RGBA pixel buffers into packed 1-bit-per-pixel rows using
//! luminance thresholding with error-diffusion dithering
//! (Jarvis-Judice-Ninke or Atkinson, or a custom kernel).

pub mod clamp;
pub(crate) mod diffuse;
pub mod dither;
pub mod kernel;
pub mod luminance;
pub mod options;
pub mod pack;
pub mod raster;

// Re-exports for convenience
pub use clamp::clamp;
pub use kernel::{ATKINSON, JARVIS_JUDICE_NINKE, Kernel, KernelPreset};
pub use luminance::LuminanceThresholder;
pub use options::{MatrixPattern, RasterOptions};
pub use pack::PackedRaster;
pub use raster::{Rasterizer, raster};

/// Bytes per RGBA pixel in input buffers.
pub const CHANNELS: usize = 4;

/// Errors that can occur while configuring or running a raster pass.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid buffer size: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),
}

/// Result type alias for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Expected RGBA buffer length for the given dimensions.
///
/// Zero dimensions, or a size that overflows `usize`, are rejected.
pub(crate) fn expected_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(CHANNELS))
        .ok_or(RasterError::InvalidDimensions { width, height })
}

/// Check that `data` holds exactly `width * height` RGBA pixels.
pub(crate) fn check_buffer(data: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = expected_len(width, height)?;
    if data.len() != expected {
        return Err(RasterError::BufferSizeMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
