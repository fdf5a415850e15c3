//! Configuration management for the emotion analysis service

use crate::{
    constants::{
        DEFAULT_CROP_PADDING, DEFAULT_EMOTION_INPUT_SIZE, DEFAULT_FACE_PRESENCE_THRESHOLD,
        DEFAULT_LANDMARK_INPUT_SIZE, DEFAULT_METRICS_WINDOW, DEFAULT_SESSION_MAX_IDLE_SECS,
        DEFAULT_SMOOTHING_WINDOW,
    },
    geometry::PoseLandmarks,
    quality::QualityConfig,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Landmark detector configuration
    pub landmarks: LandmarkModelConfig,

    /// Emotion classifier configuration
    pub classifier: ClassifierConfig,

    /// Face crop and pose configuration
    pub geometry: GeometryConfig,

    /// Frame quality thresholds
    pub quality: QualityConfig,

    /// Temporal smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Metrics window configuration
    pub metrics: MetricsConfig,

    /// Session lifecycle configuration
    pub session: SessionConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the face-mesh landmark ONNX model
    pub landmark_detector: PathBuf,

    /// Path to the emotion classification ONNX model
    pub emotion_classifier: PathBuf,
}

/// Landmark model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkModelConfig {
    /// Square model input size in pixels
    pub input_size: u32,

    /// Face presence score below which no landmarks are reported
    pub presence_threshold: f32,
}

/// Emotion classifier parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Square model input size in pixels
    pub input_size: u32,

    /// Feed the model a single grayscale channel instead of RGB
    pub grayscale: bool,

    /// Apply softmax to raw model scores
    pub apply_softmax: bool,
}

/// Face crop and pose parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Padding in pixels around the landmark bounding box
    pub crop_padding: u32,

    /// Landmark indices used for head pose
    pub pose_landmarks: PoseLandmarks,
}

/// Temporal smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of recent probability vectors averaged
    pub window_size: usize,

    /// Clear smoothing history when a frame has no face
    pub reset_on_no_face: bool,
}

/// Metrics parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Number of recent duration samples kept
    pub window_size: usize,
}

/// Session lifecycle parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds a session may stay unused before it can be evicted
    pub max_idle_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            landmark_detector: PathBuf::from("assets/face_mesh.onnx"),
            emotion_classifier: PathBuf::from("assets/emotion_ferplus.onnx"),
        }
    }
}

impl Default for LandmarkModelConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_LANDMARK_INPUT_SIZE,
            presence_threshold: DEFAULT_FACE_PRESENCE_THRESHOLD,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_EMOTION_INPUT_SIZE,
            grayscale: true,
            apply_softmax: true,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            crop_padding: DEFAULT_CROP_PADDING,
            pose_landmarks: PoseLandmarks::default(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_SMOOTHING_WINDOW,
            reset_on_no_face: false,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_METRICS_WINDOW,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_idle_secs: DEFAULT_SESSION_MAX_IDLE_SECS,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.max_idle_secs)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        // Validate windows
        if self.smoothing.window_size == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        if self.metrics.window_size == 0 {
            return Err(Error::ConfigError(
                "Metrics window size must be greater than 0".to_string(),
            ));
        }

        // Validate thresholds
        let quality = &self.quality;
        if !(0.0..=255.0).contains(&quality.min_brightness) || !(0.0..=255.0).contains(&quality.max_brightness) {
            return Err(Error::ConfigError(
                "Brightness bounds must be between 0 and 255".to_string(),
            ));
        }
        if quality.min_brightness > quality.max_brightness {
            return Err(Error::ConfigError(
                "Minimum brightness must not exceed maximum brightness".to_string(),
            ));
        }
        if !(quality.max_yaw > 0.0) || !(quality.max_pitch > 0.0) {
            return Err(Error::ConfigError(
                "Pose thresholds must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.landmarks.presence_threshold) {
            return Err(Error::ConfigError(
                "Presence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate model input sizes
        if self.landmarks.input_size == 0 || self.classifier.input_size == 0 {
            return Err(Error::ConfigError("Model input size must be greater than 0".to_string()));
        }

        Ok(())
    }

    /// Check that the configured model files exist
    pub fn check_model_paths(&self) -> Result<()> {
        if !self.models.landmark_detector.exists() {
            return Err(Error::ConfigError(format!(
                "Landmark model not found: {}",
                self.models.landmark_detector.display()
            )));
        }
        if !self.models.emotion_classifier.exists() {
            return Err(Error::ConfigError(format!(
                "Emotion model not found: {}",
                self.models.emotion_classifier.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Emotion Frame Analysis Configuration

# Model paths
models:
  landmark_detector: "assets/face_mesh.onnx"
  emotion_classifier: "assets/emotion_ferplus.onnx"

# Landmark detector
landmarks:
  input_size: 192
  presence_threshold: 0.5

# Emotion classifier
classifier:
  input_size: 48
  grayscale: true
  apply_softmax: true

# Face crop and head pose
geometry:
  crop_padding: 20
  pose_landmarks:
    nose_tip: 1
    left_eye: 33
    right_eye: 263

# Frame quality thresholds
quality:
  min_brightness: 50.0
  max_brightness: 200.0
  max_yaw: 30.0
  max_pitch: 25.0

# Temporal smoothing
smoothing:
  window_size: 5
  reset_on_no_face: false

# Metrics
metrics:
  window_size: 30

# Sessions
session:
  max_idle_secs: 300
"#;
