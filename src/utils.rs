//! Utility functions for coordinate conversion and model input preparation.

pub mod image_conversion;
pub mod safe_cast;
