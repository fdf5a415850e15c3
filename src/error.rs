//! Error types for the emotion frame analysis library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The frame is malformed or unusable (zero dimensions, bad pixel data)
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Encoded image bytes could not be decoded
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// Landmark detector failed on a frame
    #[error("Landmark detection error: {0}")]
    LandmarkDetection(String),

    /// Emotion classifier failed on a face region
    #[error("Classification error: {0}")]
    Classification(String),

    /// Classifier output is not a probability distribution over the label set
    #[error("Invalid probabilities: {0}")]
    InvalidProbabilities(String),

    /// Landmarks produced an empty crop after clamping to the frame
    #[error("Empty face region: {0}")]
    EmptyFaceRegion(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInputError(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Model data shape or format error
    #[error("Model data format error: {0}")]
    ModelDataFormatError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Operation referenced a session that does not exist
    #[error("Unknown session: {0}")]
    UnknownSession(String),
}

/// Coarse classification of an [`Error`] for callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied an unusable frame; retry with a new frame
    InvalidFrame,
    /// Something failed inside detection, cropping or classification
    ProcessingFailure,
    /// Bad configuration or an unknown session
    Configuration,
}

impl Error {
    /// Classify the error as client input, server processing or configuration
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFrame(_) | Self::Image(_) => ErrorKind::InvalidFrame,
            Self::ConfigError(_) | Self::UnknownSession(_) => ErrorKind::Configuration,
            Self::Io(_)
            | Self::OnnxRuntime(_)
            | Self::LandmarkDetection(_)
            | Self::Classification(_)
            | Self::InvalidProbabilities(_)
            | Self::EmptyFaceRegion(_)
            | Self::ModelInputError(_)
            | Self::ModelOutputError(_)
            | Self::ModelDataFormatError(_) => ErrorKind::ProcessingFailure,
        }
    }

    /// True when the failure was caused by the caller's input frame
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidFrame
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
