//! Byte-range clamping for diffused channel values.

/// Clamp a real value into `0..=255`, rounding to the nearest integer.
///
/// Ties round half away from zero, so `127.5` becomes `128`.
/// NaN maps to 0.
#[inline]
pub fn clamp(value: f64) -> u8 {
    if value > 255.0 {
        255
    } else if value >= 0.0 {
        value.round() as u8
    } else {
        0
    }
}
