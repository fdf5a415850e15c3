//! Throughput and latency statistics over recent frames.

use crate::{constants::DEFAULT_METRICS_WINDOW, ring_buffer::RingBuffer};
use serde::Serialize;

/// Sliding windows of per-frame and per-inference wall-clock durations
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    frame_times: RingBuffer<f64>,
    inference_times: RingBuffer<f64>,
}

impl MetricsTracker {
    /// Create a tracker keeping `window_size` samples of each duration
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            frame_times: RingBuffer::new(window_size),
            inference_times: RingBuffer::new(window_size),
        }
    }

    /// Record the total processing time of one frame, in seconds
    pub fn record_frame_time(&mut self, seconds: f64) {
        self.frame_times.push(seconds);
    }

    /// Record the classifier time of one frame, in seconds
    pub fn record_inference_time(&mut self, seconds: f64) {
        self.inference_times.push(seconds);
    }

    /// Frames per second as the reciprocal of mean frame latency
    ///
    /// This is not an arrival-rate count: idle time between frames is not
    /// reflected. Returns 0.0 with no samples.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        match self.frame_times.mean() {
            Some(mean) if mean > 0.0 => 1.0 / mean,
            _ => 0.0,
        }
    }

    /// Mean classifier latency in milliseconds, 0.0 with no samples
    #[must_use]
    pub fn mean_inference_millis(&self) -> f64 {
        self.inference_times.mean().map_or(0.0, |mean| mean * 1000.0)
    }

    /// Mean frame latency in milliseconds, 0.0 with no samples
    #[must_use]
    pub fn mean_frame_millis(&self) -> f64 {
        self.frame_times.mean().map_or(0.0, |mean| mean * 1000.0)
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.inference_times.clear();
    }

    pub fn reset_frame_times(&mut self) {
        self.frame_times.clear();
    }

    pub fn reset_inference_times(&mut self) {
        self.inference_times.clear();
    }

    #[must_use]
    pub fn frame_samples(&self) -> usize {
        self.frame_times.len()
    }

    #[must_use]
    pub fn inference_samples(&self) -> usize {
        self.inference_times.len()
    }

    /// Read-only summary for health reporting
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            throughput: self.throughput(),
            mean_inference_millis: self.mean_inference_millis(),
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_METRICS_WINDOW)
    }
}

/// Throughput and mean inference latency at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Approximate frames per second
    #[serde(rename = "fps")]
    pub throughput: f64,
    /// Mean classifier latency in milliseconds
    #[serde(rename = "avg_inference_ms")]
    pub mean_inference_millis: f64,
}

/// Per-frame metrics attached to an analysis result on request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameMetrics {
    /// Throughput after recording this frame
    pub fps: f64,
    /// Total processing time of this frame
    pub latency_ms: f64,
    /// Classifier time of this frame
    pub inference_ms: f64,
    pub face_detected: bool,
    pub landmarks_count: usize,
}
