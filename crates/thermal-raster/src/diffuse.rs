//! Forward error diffusion.

use crate::CHANNELS;
use crate::clamp::clamp;
use crate::kernel::Kernel;

/// Spreads one pixel's quantization error into not-yet-visited neighbors.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDiffuser<'a> {
    kernel: &'a Kernel,
}

impl<'a> ErrorDiffuser<'a> {
    pub fn new(kernel: &'a Kernel) -> Self {
        Self { kernel }
    }

    /// Distribute `original - quantized` (R, G, B only) around `(x, y)`.
    ///
    /// Targets in image row 0 or column 0 never receive error, matching the
    /// `<= 0` edge guard; targets past the right or bottom edge are dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn diffuse(
        &self,
        buffer: &mut [u8],
        original: [u8; 4],
        quantized: [u8; 4],
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) {
        let error = [
            i32::from(original[0]) - i32::from(quantized[0]),
            i32::from(original[1]) - i32::from(quantized[1]),
            i32::from(original[2]) - i32::from(quantized[2]),
        ];
        if error == [0, 0, 0] {
            return;
        }
        let divisor = f64::from(self.kernel.divisor());
        let (x, y) = (i64::from(x), i64::from(y));
        let (width, height) = (i64::from(width), i64::from(height));
        let anchor = i64::from(self.kernel.anchor());

        for (row, col, weight) in self.kernel.cells() {
            let ty = y + row as i64;
            let tx = x + col as i64 - anchor;
            if tx <= 0 || tx >= width || ty <= 0 || ty >= height {
                continue;
            }

            let idx = (ty * width + tx) as usize * CHANNELS;
            let scale = f64::from(weight) / divisor;
            for (c, &err) in error.iter().enumerate() {
                let adjusted = f64::from(buffer[idx + c]) + f64::from(err) * scale;
                buffer[idx + c] = clamp(adjusted);
            }
        }
    }
}
