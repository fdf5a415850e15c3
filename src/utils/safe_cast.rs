//! Checked conversions between landmark-space floats and pixel coordinates

use crate::{Error, Result};

/// Truncate a pixel coordinate toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside the i64 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
pub fn f64_to_i64_trunc(value: f64) -> Result<i64> {
    // i64::MAX as f64 rounds up to 2^63, which does not fit
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(value.trunc() as i64)
    } else {
        Err(Error::EmptyFaceRegion(format!(
            "coordinate {value} cannot be converted to a pixel position"
        )))
    }
}

/// Clamp a signed pixel coordinate into `[min, max]` and convert to u32
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
#[allow(clippy::cast_sign_loss)] // Clamping ensures non-negative
pub fn i64_to_u32_clamp(value: i64, min: u32, max: u32) -> u32 {
    // Ensure min <= max
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    value.clamp(i64::from(min), i64::from(max)) as u32
}

/// Convert a sample count to f64 for averaging
#[must_use]
#[allow(clippy::cast_precision_loss)] // Window sizes are far below 2^52
pub fn count_to_f64(count: usize) -> f64 {
    count as f64
}
