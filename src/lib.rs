//! Per-frame facial emotion analysis for live video streams.
//!
//! This library turns individual video frames into emotion estimates using:
//! - ONNX Runtime for face-mesh landmark detection and emotion classification
//! - The `image` crate for decoding, cropping and resizing frames
//! - Temporal smoothing over recent frames to suppress flicker
//!
//! The analysis pipeline consists of:
//! 1. Landmark detection over the whole frame
//! 2. Face region extraction from the landmark bounding box
//! 3. Emotion classification of the face crop
//! 4. Temporal smoothing of the class probabilities, per session
//! 5. Quality checks for lighting and head pose
//! 6. Throughput and latency bookkeeping
//!
//! # Examples
//!
//! ## Analyzing Frames
//!
//! ```no_run
//! use emotion_frame_analysis::{
//!     backends::{OnnxEmotionClassifier, OnnxLandmarkDetector},
//!     config::Config,
//!     frame::Frame,
//!     pipeline::{AnalyzeOptions, FramePipeline},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let detector = OnnxLandmarkDetector::new(&config.models.landmark_detector, &config.landmarks)?;
//! let classifier = OnnxEmotionClassifier::new(&config.models.emotion_classifier, &config.classifier)?;
//! let pipeline = FramePipeline::new(detector, classifier, config)?;
//!
//! let frame = Frame::open("frame_0001.png")?;
//! let result = pipeline.analyze(&frame, &AnalyzeOptions::default().with_session("camera-1"))?;
//! println!("{} ({:.2})", result.label, result.confidence);
//! for warning in &result.warnings {
//!     println!("  warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing Only
//!
//! ```
//! use emotion_frame_analysis::{emotion::{Emotion, ProbabilityVector}, smoothing::TemporalSmoother};
//!
//! let mut smoother = TemporalSmoother::new(3);
//! let happy = ProbabilityVector::new([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
//! let sad = ProbabilityVector::new([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
//!
//! smoother.smooth(happy);
//! let smoothed = smoother.smooth(sad);
//! assert_eq!(smoothed.get(Emotion::Happy), 0.5);
//! ```

/// Landmark detection and emotion classification capabilities
pub mod backends;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Emotion labels and probability vectors
pub mod emotion;

/// Error types and result handling
pub mod error;

/// Decoded video frames
pub mod frame;

/// Face bounding boxes and head pose from landmarks
pub mod geometry;

/// Facial landmark sets
pub mod landmarks;

/// Throughput and latency tracking
pub mod metrics;

/// Frame analysis orchestration
pub mod pipeline;

/// Frame quality assessment
pub mod quality;

/// Fixed-capacity circular buffer
pub mod ring_buffer;

/// Per-session state and registry
pub mod session;

/// Temporal smoothing of emotion probabilities
pub mod smoothing;

/// Utility functions for numeric casts and tensor conversion
pub mod utils;

pub use error::{Error, Result};
