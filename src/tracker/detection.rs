//! Detection input for the tracker.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// Inner-corner layout of the calibration grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatternSize {
    pub cols: u32,
    pub rows: u32,
}

impl PatternSize {
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    #[inline]
    pub fn corner_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }
}

impl Default for PatternSize {
    fn default() -> Self {
        Self::new(11, 8)
    }
}

/// Search effort requested from the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectMode {
    /// Cheap search, suited to large regions.
    #[default]
    Fast,
    /// Exhaustive search with corner refinement, suited to small regions.
    Accurate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    /// Region around the last accepted box.
    Roi,
    /// Whole image.
    Full,
}

/// A found pattern, in full-image coordinates.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Bounding box of `corners`.
    pub bbox: Rect,
    /// Corners in detector order, `pattern.corner_count()` of them.
    pub corners: Vec<Point2<f32>>,
    pub pattern: PatternSize,
    pub source: AttemptKind,
}

impl Detection {
    /// Build a detection from detector output.
    ///
    /// Returns `None` when the corner count does not match `pattern`, when a
    /// corner is not finite, or when the corners span no area.
    pub fn from_corners(
        corners: Vec<Point2<f32>>,
        pattern: PatternSize,
        source: AttemptKind,
    ) -> Option<Self> {
        if corners.len() != pattern.corner_count() {
            return None;
        }
        if corners.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let bbox = Rect::bounding(&corners).filter(|bbox| !bbox.is_empty())?;
        Some(Self {
            bbox,
            corners,
            pattern,
            source,
        })
    }
}
