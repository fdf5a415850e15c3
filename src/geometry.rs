//! Face region extraction and heuristic head pose from landmarks.

use crate::{
    constants::{LEFT_EYE_INDEX, NOSE_TIP_INDEX, POSE_DEGREES_SCALE, RIGHT_EYE_INDEX},
    frame::Frame,
    landmarks::LandmarkSet,
    utils::safe_cast::{f64_to_i64_trunc, i64_to_u32_clamp},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned pixel box; `x_max` and `y_max` are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x_min: u32,
    pub y_min: u32,
    pub x_max: u32,
    pub y_max: u32,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.x_max.saturating_sub(self.x_min)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.y_max.saturating_sub(self.y_min)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[({}, {}) - ({}, {})]", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

/// Head orientation in degrees
///
/// This is a first-order approximation from three landmarks, not a solved
/// perspective projection. `roll` is not estimated and is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HeadPose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Landmark indices used for head pose estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseLandmarks {
    /// Nose tip
    pub nose_tip: usize,
    /// Left-eye reference point
    pub left_eye: usize,
    /// Right-eye reference point
    pub right_eye: usize,
}

impl Default for PoseLandmarks {
    fn default() -> Self {
        Self {
            nose_tip: NOSE_TIP_INDEX,
            left_eye: LEFT_EYE_INDEX,
            right_eye: RIGHT_EYE_INDEX,
        }
    }
}

/// Bounding box of all landmarks in pixel space, padded and clamped to the frame
///
/// # Errors
///
/// Returns `EmptyFaceRegion` if `landmarks` is empty, contains non-finite
/// coordinates, or lies entirely outside the frame.
pub fn face_bounding_box(width: u32, height: u32, landmarks: &LandmarkSet, padding: u32) -> Result<BoundingBox> {
    if landmarks.is_empty() {
        return Err(Error::EmptyFaceRegion("no landmarks to bound".to_string()));
    }

    let (w, h) = (f64::from(width), f64::from(height));
    let mut x_lo = f64::INFINITY;
    let mut x_hi = f64::NEG_INFINITY;
    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    for p in landmarks {
        let (x, y) = (p.x * w, p.y * h);
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }

    let pad = i64::from(padding);
    let bbox = BoundingBox {
        x_min: i64_to_u32_clamp(f64_to_i64_trunc(x_lo)?.saturating_sub(pad), 0, width),
        y_min: i64_to_u32_clamp(f64_to_i64_trunc(y_lo)?.saturating_sub(pad), 0, height),
        x_max: i64_to_u32_clamp(f64_to_i64_trunc(x_hi)?.saturating_add(pad), 0, width),
        y_max: i64_to_u32_clamp(f64_to_i64_trunc(y_hi)?.saturating_add(pad), 0, height),
    };

    if bbox.is_empty() {
        return Err(Error::EmptyFaceRegion(format!(
            "landmarks fall outside the {width}x{height} frame"
        )));
    }
    Ok(bbox)
}

/// Crop the face region covered by `landmarks` out of `frame`
///
/// Callers handle the no-face case first; an empty landmark set is an error.
///
/// # Errors
///
/// Returns `EmptyFaceRegion` if no non-empty region can be derived.
pub fn extract_face_region(frame: &Frame, landmarks: &LandmarkSet, padding: u32) -> Result<(BoundingBox, Frame)> {
    let bbox = face_bounding_box(frame.width(), frame.height(), landmarks, padding)?;
    let region = frame.crop(&bbox)?;
    Ok((bbox, region))
}

/// Estimate yaw and pitch from the nose tip and the two eye reference points
///
/// Returns `None` when any of the three designated landmarks is missing.
#[must_use]
pub fn estimate_head_pose(landmarks: &LandmarkSet, indices: &PoseLandmarks) -> Option<HeadPose> {
    let nose = landmarks.point(indices.nose_tip)?;
    let left_eye = landmarks.point(indices.left_eye)?;
    let right_eye = landmarks.point(indices.right_eye)?;

    let yaw = (left_eye.x - right_eye.x) * POSE_DEGREES_SCALE;
    let pitch = (nose.y - (left_eye.y + right_eye.y) / 2.0) * POSE_DEGREES_SCALE;

    Some(HeadPose { yaw, pitch, roll: 0.0 })
}
