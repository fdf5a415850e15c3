//! Emotion label set and probability vectors over it.

use crate::{
    constants::{NUM_EMOTIONS, PROBABILITY_SUM_TOLERANCE},
    utils::safe_cast::count_to_f64,
    Error, Result,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Fixed, ordered emotion label set (FER2013 ordering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// All labels in classifier output order
    pub const ALL: [Emotion; NUM_EMOTIONS] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Position of the label in the fixed ordering
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label at `index` in the fixed ordering
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "Angry",
            Self::Disgust => "Disgust",
            Self::Fear => "Fear",
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Surprise => "Surprise",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Label attached to an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLabel {
    /// A face was found and classified
    Emotion(Emotion),
    /// The landmark detector found no face
    NoFaceDetected,
}

impl ResultLabel {
    /// The emotion, if a face was classified
    #[must_use]
    pub fn emotion(self) -> Option<Emotion> {
        match self {
            Self::Emotion(emotion) => Some(emotion),
            Self::NoFaceDetected => None,
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emotion(emotion) => emotion.fmt(f),
            Self::NoFaceDetected => f.write_str("No Face Detected"),
        }
    }
}

impl Serialize for ResultLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One non-negative probability per emotion label, summing to one
///
/// The only vector that does not sum to one is [`ProbabilityVector::zeros`],
/// which is reserved for the "no face" result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityVector {
    values: [f64; NUM_EMOTIONS],
}

impl ProbabilityVector {
    /// Validate and wrap a classifier distribution
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbabilities` if any value is negative or not finite,
    /// or if the values do not sum to one within tolerance.
    pub fn new(values: [f64; NUM_EMOTIONS]) -> Result<Self> {
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
            return Err(Error::InvalidProbabilities(format!(
                "{} has invalid probability {v}",
                Emotion::ALL[i]
            )));
        }

        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(Error::InvalidProbabilities(format!(
                "probabilities sum to {sum}, expected 1.0"
            )));
        }

        Ok(Self { values })
    }

    /// Build a vector from a slice of model outputs
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbabilities` if the slice length does not match the
    /// label set or the values are not a distribution.
    pub fn from_slice(values: &[f32]) -> Result<Self> {
        let values: [f32; NUM_EMOTIONS] = values.try_into().map_err(|_| {
            Error::InvalidProbabilities(format!(
                "expected {NUM_EMOTIONS} values, got {}",
                values.len()
            ))
        })?;
        Self::new(values.map(f64::from))
    }

    /// Normalize raw scores with a numerically stable softmax
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbabilities` if the slice length does not match the
    /// label set or any score is not finite.
    pub fn from_logits(logits: &[f32]) -> Result<Self> {
        if logits.len() != NUM_EMOTIONS {
            return Err(Error::InvalidProbabilities(format!(
                "expected {NUM_EMOTIONS} scores, got {}",
                logits.len()
            )));
        }
        if logits.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidProbabilities("non-finite score".to_string()));
        }

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut values = [0.0; NUM_EMOTIONS];
        for (out, &logit) in values.iter_mut().zip(logits) {
            *out = f64::from(logit - max).exp();
        }
        let sum: f64 = values.iter().sum();
        for v in &mut values {
            *v /= sum;
        }

        Self::new(values)
    }

    /// All-zero vector used by the "no face" result
    #[must_use]
    pub fn zeros() -> Self {
        Self {
            values: [0.0; NUM_EMOTIONS],
        }
    }

    /// Element-wise mean; the caller guarantees a non-empty iterator
    pub(crate) fn mean<'a>(vectors: impl Iterator<Item = &'a ProbabilityVector>) -> Self {
        let mut sums = [0.0; NUM_EMOTIONS];
        let mut count = 0usize;
        for vector in vectors {
            for (sum, v) in sums.iter_mut().zip(vector.values) {
                *sum += v;
            }
            count += 1;
        }
        if count > 0 {
            for sum in &mut sums {
                *sum /= count_to_f64(count);
            }
        }
        Self { values: sums }
    }

    #[must_use]
    pub fn get(&self, emotion: Emotion) -> f64 {
        self.values[emotion.index()]
    }

    #[must_use]
    pub fn values(&self) -> &[f64; NUM_EMOTIONS] {
        &self.values
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Most probable label and its probability, ties going to the lowest index
    #[must_use]
    pub fn argmax(&self) -> (Emotion, f64) {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate().skip(1) {
            if v > self.values[best] {
                best = i;
            }
        }
        (Emotion::ALL[best], self.values[best])
    }

    /// Iterate `(label, probability)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.iter().copied().zip(self.values.iter().copied())
    }
}

impl Default for ProbabilityVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Serialize for ProbabilityVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_EMOTIONS))?;
        for (emotion, value) in self.iter() {
            map.serialize_entry(emotion.as_str(), &value)?;
        }
        map.end()
    }
}
