//! Frame quality checks that produce user-facing warnings.

use crate::{
    constants::{DEFAULT_MAX_BRIGHTNESS, DEFAULT_MAX_PITCH, DEFAULT_MAX_YAW, DEFAULT_MIN_BRIGHTNESS},
    frame::Frame,
    geometry::{estimate_head_pose, PoseLandmarks},
    landmarks::LandmarkSet,
};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A condition that may reduce classification accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityWarning {
    LowLighting,
    Overexposed,
    FaceNotDetected,
    FaceTurned,
    FaceTilted,
    /// Emitted by the pipeline when the landmark detector finds no face
    NoFaceInFrame,
}

impl QualityWarning {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::LowLighting => "Low lighting detected - may affect accuracy",
            Self::Overexposed => "Overexposed lighting - may affect accuracy",
            Self::FaceNotDetected => "Face not detected or too small",
            Self::FaceTurned => "Face turned too far to the side",
            Self::FaceTilted => "Face tilted too much",
            Self::NoFaceInFrame => "No face detected in frame",
        }
    }
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for QualityWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// Thresholds used by [`assess_quality`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Mean luma below which lighting is too low
    pub min_brightness: f64,

    /// Mean luma above which the frame is overexposed
    pub max_brightness: f64,

    /// Largest acceptable absolute yaw in degrees
    pub max_yaw: f64,

    /// Largest acceptable absolute pitch in degrees
    pub max_pitch: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
            max_brightness: DEFAULT_MAX_BRIGHTNESS,
            max_yaw: DEFAULT_MAX_YAW,
            max_pitch: DEFAULT_MAX_PITCH,
        }
    }
}

/// Check lighting, face presence and head pose, in that order
///
/// Each check emits at most one warning. Pose checks are skipped when the
/// designated pose landmarks are missing.
#[must_use]
pub fn assess_quality(
    frame: &Frame,
    landmarks: &LandmarkSet,
    config: &QualityConfig,
    pose_landmarks: &PoseLandmarks,
) -> Vec<QualityWarning> {
    let mut warnings = Vec::new();

    let brightness = frame.mean_luma();
    if brightness < config.min_brightness {
        warnings.push(QualityWarning::LowLighting);
    } else if brightness > config.max_brightness {
        warnings.push(QualityWarning::Overexposed);
    }

    if landmarks.is_empty() {
        warnings.push(QualityWarning::FaceNotDetected);
    } else if let Some(pose) = estimate_head_pose(landmarks, pose_landmarks) {
        if pose.yaw.abs() > config.max_yaw {
            warnings.push(QualityWarning::FaceTurned);
        }
        if pose.pitch.abs() > config.max_pitch {
            warnings.push(QualityWarning::FaceTilted);
        }
    } else {
        log::debug!("Pose landmarks missing from {} points, skipping pose checks", landmarks.len());
    }

    warnings
}
