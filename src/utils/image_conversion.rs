//! Conversions from frames to `ndarray` model input tensors.

use crate::constants::{LUMA_WEIGHTS, PIXEL_NORMALIZATION_SCALE};
use image::{imageops::FilterType, GrayImage, Luma, RgbImage};
use ndarray::Array4;

/// Resize an RGB image to `size`×`size` and lay it out as an NCHW tensor
///
/// # Arguments
/// * `image` - RGB image of any size
/// * `size` - Square side length expected by the model
///
/// # Returns
/// * `Array4<f32>` with shape (1, 3, size, size) and values in [0, 1]
#[must_use]
pub fn rgb_to_nchw(image: &RgbImage, size: u32) -> Array4<f32> {
    let resized = image::imageops::resize(image, size, size, FilterType::Triangle);
    let side = size as usize;

    let mut tensor = Array4::<f32>::zeros((1, 3, side, side));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for ch in 0..3 {
            tensor[[0, ch, y as usize, x as usize]] = f32::from(pixel[ch]) * PIXEL_NORMALIZATION_SCALE;
        }
    }
    tensor
}

/// Convert an RGB image to 8-bit BT.601 grayscale
#[must_use]
pub fn rgb_to_luma(image: &RgbImage) -> GrayImage {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        let luma = wr * f64::from(p[0]) + wg * f64::from(p[1]) + wb * f64::from(p[2]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to u8 range
        let value = luma.round().clamp(0.0, 255.0) as u8;
        Luma([value])
    })
}

/// Grayscale, resize to `size`×`size` and lay out as a single-channel NCHW tensor
///
/// # Returns
/// * `Array4<f32>` with shape (1, 1, size, size) and values in [0, 1]
#[must_use]
pub fn luma_to_nchw(image: &RgbImage, size: u32) -> Array4<f32> {
    let gray = rgb_to_luma(image);
    let resized = image::imageops::resize(&gray, size, size, FilterType::Triangle);
    let side = size as usize;

    let mut tensor = Array4::<f32>::zeros((1, 1, side, side));
    for (x, y, pixel) in resized.enumerate_pixels() {
        tensor[[0, 0, y as usize, x as usize]] = f32::from(pixel[0]) * PIXEL_NORMALIZATION_SCALE;
    }
    tensor
}
