//! Constants used throughout the library

/// Number of emotion labels produced by the classifier
pub const NUM_EMOTIONS: usize = 7;

/// Face-mesh landmark index of the nose tip
pub const NOSE_TIP_INDEX: usize = 1;

/// Face-mesh landmark index used as the left-eye reference point
pub const LEFT_EYE_INDEX: usize = 33;

/// Face-mesh landmark index used as the right-eye reference point
pub const RIGHT_EYE_INDEX: usize = 263;

/// Pixels added on every side of the landmark bounding box before cropping
pub const DEFAULT_CROP_PADDING: u32 = 20;

/// Scale from normalized landmark offsets to approximate degrees
pub const POSE_DEGREES_SCALE: f64 = 90.0;

/// Mean luma below which a frame is considered too dark
pub const DEFAULT_MIN_BRIGHTNESS: f64 = 50.0;

/// Mean luma above which a frame is considered overexposed
pub const DEFAULT_MAX_BRIGHTNESS: f64 = 200.0;

/// Absolute yaw in degrees above which the face is turned too far
pub const DEFAULT_MAX_YAW: f64 = 30.0;

/// Absolute pitch in degrees above which the face is tilted too much
pub const DEFAULT_MAX_PITCH: f64 = 25.0;

/// BT.601 luma weights for red, green and blue
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Default number of probability vectors averaged by the smoother
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Default number of duration samples kept by the metrics tracker
pub const DEFAULT_METRICS_WINDOW: usize = 30;

/// Session used when the caller does not name one
pub const DEFAULT_SESSION_ID: &str = "default";

/// Default idle time after which a session may be evicted
pub const DEFAULT_SESSION_MAX_IDLE_SECS: u64 = 300;

/// Square input size of the face-mesh landmark model
pub const DEFAULT_LANDMARK_INPUT_SIZE: u32 = 192;

/// Square input size of FER-style emotion models
pub const DEFAULT_EMOTION_INPUT_SIZE: u32 = 48;

/// Sigmoid score below which the landmark model reports no face
pub const DEFAULT_FACE_PRESENCE_THRESHOLD: f32 = 0.5;

/// Tolerance when checking that a probability vector sums to one
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// Pixel value normalization for model inputs
pub const PIXEL_NORMALIZATION_SCALE: f32 = 1.0 / 255.0;
