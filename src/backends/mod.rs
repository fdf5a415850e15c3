//! Landmark detection and emotion classification capabilities.
//!
//! The pipeline only depends on the two traits defined here. The ONNX Runtime
//! implementations in the submodules are the production backends; tests and
//! benchmarks drive the pipeline with deterministic doubles instead.

/// Face-mesh landmark detector backed by ONNX Runtime
pub mod face_mesh;

/// FER-style emotion classifier backed by ONNX Runtime
pub mod emotion_model;

use crate::{emotion::ProbabilityVector, frame::Frame, landmarks::LandmarkSet, Result};

pub use emotion_model::OnnxEmotionClassifier;
pub use face_mesh::OnnxLandmarkDetector;

/// Locates facial landmarks in a frame
pub trait LandmarkDetector: Send + Sync {
    /// Landmarks of at most one face, normalized to the frame; empty when no
    /// face is found
    fn detect(&self, frame: &Frame) -> Result<LandmarkSet>;

    /// Get detector name
    fn name(&self) -> &str;
}

/// Classifies the emotion shown in a cropped face region
pub trait EmotionClassifier: Send + Sync {
    /// Probability per emotion label, summing to one
    fn classify(&self, face: &Frame) -> Result<ProbabilityVector>;

    /// Get classifier name
    fn name(&self) -> &str;
}

impl<T: LandmarkDetector + ?Sized> LandmarkDetector for Box<T> {
    fn detect(&self, frame: &Frame) -> Result<LandmarkSet> {
        (**self).detect(frame)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: EmotionClassifier + ?Sized> EmotionClassifier for Box<T> {
    fn classify(&self, face: &Frame) -> Result<ProbabilityVector> {
        (**self).classify(face)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logistic function for presence scores reported as logits
#[must_use]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
