//! Decoded video frames.

use crate::{constants::LUMA_WEIGHTS, geometry::BoundingBox, Error, Result};
use image::{imageops, RgbImage};
use std::path::Path;

/// An immutable RGB frame with non-zero dimensions
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an already decoded image
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if either dimension is zero.
    pub fn new(image: RgbImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::InvalidFrame(format!(
                "frame has zero dimension: {}x{}",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    /// Build a frame from packed RGB bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if the buffer length does not match
    /// `width * height * 3` or a dimension is zero.
    pub fn from_raw(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let len = rgb.len();
        let image = RgbImage::from_raw(width, height, rgb).ok_or_else(|| {
            Error::InvalidFrame(format!("{len} bytes do not form a {width}x{height} RGB frame"))
        })?;
        Self::new(image)
    }

    /// Decode an encoded image (JPEG, PNG, ...) from memory
    ///
    /// # Errors
    ///
    /// Returns an image error if the bytes cannot be decoded, or
    /// `InvalidFrame` for zero-sized images.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgb8();
        Self::new(image)
    }

    /// Read and decode an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let image = image::open(path)?.to_rgb8();
        Self::new(image)
    }

    /// Uniformly colored frame
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrame` if either dimension is zero.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self> {
        Self::new(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Copy out the region covered by `bbox`
    ///
    /// # Errors
    ///
    /// Returns `EmptyFaceRegion` if the box is empty or extends past the
    /// frame.
    pub fn crop(&self, bbox: &BoundingBox) -> Result<Self> {
        if bbox.is_empty() || bbox.x_max > self.width() || bbox.y_max > self.height() {
            return Err(Error::EmptyFaceRegion(format!(
                "{bbox} does not fit a non-empty region of a {}x{} frame",
                self.width(),
                self.height()
            )));
        }
        let region = imageops::crop_imm(&self.image, bbox.x_min, bbox.y_min, bbox.width(), bbox.height());
        Ok(Self {
            image: region.to_image(),
        })
    }

    /// Mean BT.601 luma over the whole frame, each pixel rounded to 8 bits
    #[must_use]
    pub fn mean_luma(&self) -> f64 {
        let [wr, wg, wb] = LUMA_WEIGHTS;
        let total: f64 = self
            .image
            .pixels()
            .map(|p| (wr * f64::from(p[0]) + wg * f64::from(p[1]) + wb * f64::from(p[2])).round())
            .sum();
        total / (f64::from(self.width()) * f64::from(self.height()))
    }
}
