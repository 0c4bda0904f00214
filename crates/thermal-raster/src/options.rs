//! Rasterizer configuration options.
//!
//! Options are plain values; clamping of the threshold and coercion of the
//! divisor happen when a [`Rasterizer`](crate::Rasterizer) is built.

use serde::Deserialize;
use tracing::warn;

use crate::kernel::KernelPreset;

/// Environment variable overriding the luminance threshold.
pub const ENV_THRESHOLD: &str = "RASTER_THRESHOLD";
/// Environment variable overriding the kernel divisor.
pub const ENV_DIVISOR: &str = "RASTER_DIVISOR";
/// Environment variable selecting a kernel preset by name.
pub const ENV_KERNEL: &str = "RASTER_KERNEL";

/// Diffusion kernel source: a named preset or an explicit weight matrix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MatrixPattern {
    Preset(KernelPreset),
    Custom(Vec<Vec<i32>>),
}

impl MatrixPattern {
    /// The weight matrix this pattern resolves to.
    pub fn matrix(&self) -> Vec<Vec<i32>> {
        match self {
            Self::Preset(preset) => preset.matrix(),
            Self::Custom(matrix) => matrix.clone(),
        }
    }
}

impl Default for MatrixPattern {
    fn default() -> Self {
        Self::Preset(KernelPreset::JarvisJudiceNinke)
    }
}

/// Configuration for a [`Rasterizer`](crate::Rasterizer).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RasterOptions {
    /// Diffusion kernel.
    pub matrix_pattern: MatrixPattern,

    /// Weight scaling denominator. Values <= 0 are treated as 1.
    pub divisor: i32,

    /// Luminance cutoff. Pixels strictly darker than this print black.
    /// Clamped and rounded into 0..=255.
    pub threshold: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            matrix_pattern: MatrixPattern::default(),
            divisor: 48,
            threshold: 128.0,
        }
    }
}

impl RasterOptions {
    /// Create options with the default JJN kernel, divisor 48 and threshold 128.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: use a custom weight matrix. The divisor is left unchanged.
    pub fn with_matrix_pattern(mut self, matrix: Vec<Vec<i32>>) -> Self {
        self.matrix_pattern = MatrixPattern::Custom(matrix);
        self
    }

    /// Builder: use a preset kernel. The divisor is left unchanged; pair it
    /// with [`KernelPreset::divisor`] to get the preset's conventional one.
    pub fn with_preset(mut self, preset: KernelPreset) -> Self {
        self.matrix_pattern = MatrixPattern::Preset(preset);
        self
    }

    /// Builder: set the divisor.
    pub fn with_divisor(mut self, divisor: i32) -> Self {
        self.divisor = divisor;
        self
    }

    /// Builder: set the luminance threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Load options from `RASTER_KERNEL`, `RASTER_DIVISOR` and `RASTER_THRESHOLD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load options through a key lookup, falling back to defaults.
    ///
    /// Each key sets only its own field. Unparsable values are logged and
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(v) = lookup(ENV_KERNEL) {
            match KernelPreset::from_name(&v) {
                Some(preset) => opts = opts.with_preset(preset),
                None => warn!(key = ENV_KERNEL, value = %v, "Unknown kernel preset, ignoring"),
            }
        }
        if let Some(v) = lookup(ENV_DIVISOR) {
            match v.trim().parse::<i32>() {
                Ok(d) => opts.divisor = d,
                Err(_) => warn!(key = ENV_DIVISOR, value = %v, "Divisor is not an integer"),
            }
        }
        if let Some(v) = lookup(ENV_THRESHOLD) {
            match v.trim().parse::<f64>() {
                Ok(t) if t.is_finite() => opts.threshold = t,
                _ => warn!(key = ENV_THRESHOLD, value = %v, "Threshold is not a finite number"),
            }
        }

        opts
    }
}
