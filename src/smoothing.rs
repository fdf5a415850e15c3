//! Temporal smoothing of classifier output over recent frames.
//!
//! The smoother averages the last N raw probability vectors it was given. It
//! knows nothing about time: gaps such as a face briefly leaving the frame are
//! not special-cased, it simply averages whatever was fed to it.

use crate::{constants::DEFAULT_SMOOTHING_WINDOW, emotion::ProbabilityVector, ring_buffer::RingBuffer};

/// Moving average over the last `window_size` probability vectors
#[derive(Debug, Clone)]
pub struct TemporalSmoother {
    buffer: RingBuffer<ProbabilityVector>,
}

impl TemporalSmoother {
    /// # Panics
    ///
    /// Panics if `window_size` is zero.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            buffer: RingBuffer::new(window_size),
        }
    }

    /// Add `probabilities` to the window and return the window average
    pub fn smooth(&mut self, probabilities: ProbabilityVector) -> ProbabilityVector {
        self.buffer.push(probabilities);
        ProbabilityVector::mean(self.buffer.iter())
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of vectors currently averaged
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Default for TemporalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_WINDOW)
    }
}
