//! Error diffusion kernels.
//!
//! A kernel is a matrix of integer weights plus a divisor. Row 0 is the
//! current scanline; the first nonzero weight in row 0 sits one column
//! to the right of the pixel being quantized.

use serde::Deserialize;

use crate::{RasterError, Result};

/// Jarvis-Judice-Ninke kernel (conventional divisor 48).
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: [[i32; 5]; 3] =
    [[0, 0, 0, 7, 5], [3, 5, 7, 5, 3], [1, 3, 5, 3, 1]];

/// Atkinson kernel (conventional divisor 8, propagates 6/8 of the error).
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: [[i32; 4]; 3] = [[0, 0, 1, 1], [1, 1, 1, 0], [0, 1, 0, 0]];

/// Named kernel presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelPreset {
    #[default]
    #[serde(alias = "jjn")]
    JarvisJudiceNinke,
    Atkinson,
}

impl KernelPreset {
    /// Weight matrix of the preset.
    pub fn matrix(self) -> Vec<Vec<i32>> {
        match self {
            Self::JarvisJudiceNinke => JARVIS_JUDICE_NINKE.iter().map(|r| r.to_vec()).collect(),
            Self::Atkinson => ATKINSON.iter().map(|r| r.to_vec()).collect(),
        }
    }

    /// Divisor conventionally paired with the preset.
    pub fn divisor(self) -> i32 {
        match self {
            Self::JarvisJudiceNinke => 48,
            Self::Atkinson => 8,
        }
    }

    /// Parse a preset name (`jarvis_judice_ninke`, `jjn`, `atkinson`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "jarvis_judice_ninke" | "jjn" => Some(Self::JarvisJudiceNinke),
            "atkinson" => Some(Self::Atkinson),
            _ => None,
        }
    }
}

/// A validated diffusion kernel.
///
/// Weights are stored row-major in a flat vector. The divisor and anchor
/// offset are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    weights: Vec<i32>,
    rows: usize,
    cols: usize,
    divisor: i32,
    anchor: i32,
}

impl Kernel {
    /// Build a kernel from a weight matrix and divisor.
    ///
    /// A divisor of zero or less is coerced to 1. The matrix must be
    /// non-empty and rectangular, and row 0 must hold a nonzero weight.
    pub fn new<R: AsRef<[i32]>>(matrix: &[R], divisor: i32) -> Result<Self> {
        let first = matrix
            .first()
            .ok_or_else(|| RasterError::InvalidKernel("matrix has no rows".into()))?
            .as_ref();
        let cols = first.len();
        if cols == 0 {
            return Err(RasterError::InvalidKernel("matrix rows are empty".into()));
        }
        if let Some(i) = matrix.iter().position(|r| r.as_ref().len() != cols) {
            return Err(RasterError::InvalidKernel(format!(
                "row {i} has {} weights, expected {cols}",
                matrix[i].as_ref().len()
            )));
        }
        let anchor = anchor_of(first)
            .ok_or_else(|| RasterError::InvalidKernel("row 0 has no nonzero weight".into()))?;

        let weights = matrix.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Ok(Self::from_parts(weights, cols, divisor, anchor))
    }

    /// Build a preset kernel with its conventional divisor.
    pub fn preset(preset: KernelPreset) -> Self {
        const JJN_ANCHOR: i32 = preset_anchor(&JARVIS_JUDICE_NINKE[0]);
        const ATKINSON_ANCHOR: i32 = preset_anchor(&ATKINSON[0]);

        let (weights, cols, anchor) = match preset {
            KernelPreset::JarvisJudiceNinke => {
                (JARVIS_JUDICE_NINKE.concat(), JARVIS_JUDICE_NINKE[0].len(), JJN_ANCHOR)
            }
            KernelPreset::Atkinson => (ATKINSON.concat(), ATKINSON[0].len(), ATKINSON_ANCHOR),
        };
        Self::from_parts(weights, cols, preset.divisor(), anchor)
    }

    fn from_parts(weights: Vec<i32>, cols: usize, divisor: i32, anchor: i32) -> Self {
        Self {
            rows: weights.len() / cols,
            weights,
            cols,
            divisor: divisor.max(1),
            anchor,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Column offset aligning row 0 with the current pixel.
    pub fn anchor(&self) -> i32 {
        self.anchor
    }

    /// Weight at `(row, col)`, zero outside the matrix.
    pub fn weight(&self, row: usize, col: usize) -> i32 {
        if row >= self.rows || col >= self.cols {
            return 0;
        }
        self.weights[row * self.cols + col]
    }

    /// Iterate `(row, col, weight)` over the nonzero cells.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0)
            .map(|(i, &w)| (i / self.cols, i % self.cols, w))
    }
}

/// Index of the first nonzero weight in `row`, minus one.
const fn anchor_of(row: &[i32]) -> Option<i32> {
    let mut i = 0;
    while i < row.len() {
        if row[i] != 0 {
            return Some(i as i32 - 1);
        }
        i += 1;
    }
    None
}

/// Anchor of a built-in preset, checked at compile time.
const fn preset_anchor(row: &[i32]) -> i32 {
    match anchor_of(row) {
        Some(anchor) => anchor,
        None => panic!("preset row 0 has no nonzero weight"),
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::preset(KernelPreset::JarvisJudiceNinke)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jjn_anchor_offset() {
        let kernel = Kernel::new(&JARVIS_JUDICE_NINKE, 48).unwrap();
        assert_eq!(kernel.anchor(), 2);
        assert_eq!(kernel.rows(), 3);
        assert_eq!(kernel.cols(), 5);
        assert_eq!(kernel.weight(0, 3), 7);
        assert_eq!(kernel.weight(2, 4), 1);
        assert_eq!(kernel.weight(3, 0), 0);
        assert_eq!(kernel.weight(0, 5), 0);
    }

    #[test]
    fn test_atkinson_anchor_offset() {
        let kernel = Kernel::new(&ATKINSON, 8).unwrap();
        assert_eq!(kernel.anchor(), 1);
        assert_eq!(kernel.rows(), 3);
        assert_eq!(kernel.cols(), 4);
    }

    #[test]
    fn test_preset_matches_constructed() {
        for preset in [KernelPreset::JarvisJudiceNinke, KernelPreset::Atkinson] {
            let built = Kernel::new(&preset.matrix(), preset.divisor()).unwrap();
            assert_eq!(Kernel::preset(preset), built);
        }
    }

    #[test]
    fn test_anchor_of() {
        assert_eq!(anchor_of(&[0, 0, 0, 7, 5]), Some(2));
        assert_eq!(anchor_of(&[3, 0]), Some(-1));
        assert_eq!(anchor_of(&[0, 0]), None);
        assert_eq!(anchor_of(&[]), None);
    }

    #[test]
    fn test_divisor_coerced_to_one() {
        assert_eq!(Kernel::new(&ATKINSON, 0).unwrap().divisor(), 1);
        assert_eq!(Kernel::new(&ATKINSON, -12).unwrap().divisor(), 1);
    }

    #[test]
    fn test_leading_nonzero_at_column_zero() {
        let kernel = Kernel::new(&[[1, 1]], 2).unwrap();
        assert_eq!(kernel.anchor(), -1);
    }

    #[test]
    fn test_cells_skip_zero_weights() {
        let kernel = Kernel::preset(KernelPreset::Atkinson);
        let cells: Vec<_> = kernel.cells().collect();
        assert_eq!(
            cells,
            vec![(0, 2, 1), (0, 3, 1), (1, 0, 1), (1, 1, 1), (1, 2, 1), (2, 1, 1)]
        );
        let total: i32 = Kernel::default().cells().map(|(_, _, w)| w).sum();
        assert_eq!(total, 48);
    }

    #[test]
    fn test_rejects_empty_matrix() {
        let empty: [[i32; 0]; 0] = [];
        assert!(matches!(Kernel::new(&empty, 1), Err(RasterError::InvalidKernel(_))));
        let no_cols: [[i32; 0]; 2] = [[], []];
        assert!(matches!(Kernel::new(&no_cols, 1), Err(RasterError::InvalidKernel(_))));
    }

    #[test]
    fn test_rejects_zero_first_row() {
        let err = Kernel::new(&[[0, 0, 0], [1, 2, 1]], 4).unwrap_err();
        assert_eq!(
            err,
            RasterError::InvalidKernel("row 0 has no nonzero weight".into())
        );
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let matrix = vec![vec![0, 1, 1], vec![1, 1]];
        let err = Kernel::new(&matrix, 3).unwrap_err();
        assert_eq!(
            err,
            RasterError::InvalidKernel("row 1 has 2 weights, expected 3".into())
        );
    }

    #[test]
    fn test_preset_from_name() {
        assert_eq!(KernelPreset::from_name("atkinson"), Some(KernelPreset::Atkinson));
        assert_eq!(
            KernelPreset::from_name(" Jarvis-Judice-Ninke "),
            Some(KernelPreset::JarvisJudiceNinke)
        );
        assert_eq!(KernelPreset::from_name("JJN"), Some(KernelPreset::JarvisJudiceNinke));
        assert_eq!(KernelPreset::from_name("floyd"), None);
    }
}
