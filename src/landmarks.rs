//! Normalized facial landmark points as reported by a landmark detector.

use serde::{Deserialize, Serialize};

/// A single facial landmark
///
/// `x` and `y` are normalized to `[0, 1]` relative to the frame width and
/// height. `z` is the detector's relative depth. `index` names a fixed
/// anatomical point in the detector's convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    #[serde(rename = "idx")]
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    #[must_use]
    pub fn new(index: usize, x: f64, y: f64, z: f64) -> Self {
        Self { index, x, y, z }
    }
}

/// Ordered landmarks of one face; empty when no face was found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    #[must_use]
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Set with no face
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from `(x, y, z)` triples, numbering points by position
    #[must_use]
    pub fn from_coordinates(coords: &[(f64, f64, f64)]) -> Self {
        Self {
            points: coords
                .iter()
                .enumerate()
                .map(|(index, &(x, y, z))| LandmarkPoint::new(index, x, y, z))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LandmarkPoint> {
        self.points.iter()
    }

    /// Look up the point with the given anatomical index
    ///
    /// Detectors normally number points by position, so that slot is checked
    /// first before falling back to a scan.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&LandmarkPoint> {
        match self.points.get(index) {
            Some(p) if p.index == index => Some(p),
            _ => self.points.iter().find(|p| p.index == index),
        }
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a LandmarkPoint;
    type IntoIter = std::slice::Iter<'a, LandmarkPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
