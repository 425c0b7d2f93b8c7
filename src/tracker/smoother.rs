//! Exponential smoothing of the reported box with a motion-adaptive gain.

use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Gain schedule for the smoother.
///
/// `steps` is a list of `(shift_threshold, alpha)` pairs checked in order;
/// the first threshold strictly below the normalised centre shift wins.
/// `floor_alpha` applies when none match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherParams {
    pub steps: Vec<(f32, f32)>,
    pub floor_alpha: f32,
    /// Box sizes at or below this are too small to normalise a shift by.
    pub min_extent: f32,
}

impl Default for SmootherParams {
    fn default() -> Self {
        Self {
            steps: vec![(0.40, 0.70), (0.25, 0.55), (0.12, 0.40)],
            floor_alpha: 0.20,
            min_extent: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Smoother {
    params: SmootherParams,
}

impl Smoother {
    pub fn new(params: SmootherParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SmootherParams {
        &self.params
    }

    /// Centre displacement from `prev` to `next`, relative to the larger side of `prev`.
    pub fn shift_norm(&self, prev: &Rect, next: &Rect) -> f32 {
        let extent = prev.width.max(prev.height);
        if extent <= self.params.min_extent {
            return 0.0;
        }
        (next.center() - prev.center()).norm() / extent
    }

    pub fn gain(&self, shift_norm: f32) -> f32 {
        self.params
            .steps
            .iter()
            .find(|(threshold, _)| shift_norm > *threshold)
            .map_or(self.params.floor_alpha, |&(_, alpha)| alpha)
    }

    /// Fold an accepted detection into the state's smoothed box.
    ///
    /// The first accepted box is taken as-is.
    pub fn update(&self, state: &mut TrackState, detection: &Rect) {
        if !state.has_smoothed {
            state.smoothed_box = *detection;
            state.has_smoothed = true;
            return;
        }

        let prev = state.smoothed_box;
        let alpha = self.gain(self.shift_norm(&prev, detection));
        let blend = |new: f32, old: f32| alpha * new + (1.0 - alpha) * old;

        state.smoothed_box = Rect::new(
            blend(detection.x, prev.x),
            blend(detection.y, prev.y),
            blend(detection.width, prev.width),
            blend(detection.height, prev.height),
        );
        state.adaptive_alpha = alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded(bbox: Rect) -> TrackState {
        let mut state = TrackState::new();
        state.smoothed_box = bbox;
        state.has_smoothed = true;
        state
    }

    #[test]
    fn test_gain_schedule() {
        let smoother = Smoother::default();
        let prev = Rect::new(0.0, 0.0, 100.0, 100.0);

        for (offset, expected) in [(45.0, 0.70), (30.0, 0.55), (15.0, 0.40), (5.0, 0.20)] {
            let next = Rect::new(offset, 0.0, 100.0, 100.0);
            let shift = smoother.shift_norm(&prev, &next);
            assert_relative_eq!(shift, offset / 100.0, epsilon = 1e-6);
            assert_eq!(smoother.gain(shift), expected);
        }
    }

    #[test]
    fn test_gain_thresholds_are_strict() {
        let smoother = Smoother::default();
        assert_eq!(smoother.gain(0.40), 0.55);
        assert_eq!(smoother.gain(0.25), 0.40);
        assert_eq!(smoother.gain(0.12), 0.20);
        assert_eq!(smoother.gain(0.0), 0.20);
    }

    #[test]
    fn test_diagonal_shift_uses_euclidean_distance() {
        let smoother = Smoother::default();
        let prev = Rect::new(0.0, 0.0, 100.0, 50.0);
        let next = Rect::new(30.0, 40.0, 100.0, 50.0);
        assert_relative_eq!(smoother.shift_norm(&prev, &next), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_previous_box() {
        let smoother = Smoother::default();
        let prev = Rect::new(10.0, 10.0, 0.0, 0.0);
        let next = Rect::new(500.0, 500.0, 40.0, 40.0);
        assert_eq!(smoother.shift_norm(&prev, &next), 0.0);
    }

    #[test]
    fn test_first_update_copies_detection() {
        let smoother = Smoother::default();
        let mut state = TrackState::new();
        let det = Rect::new(12.0, 34.0, 56.0, 78.0);
        smoother.update(&mut state, &det);
        assert!(state.has_smoothed);
        assert_eq!(state.smoothed_box, det);
    }

    #[test]
    fn test_blend_small_motion() {
        let smoother = Smoother::default();
        let mut state = seeded(Rect::new(0.0, 0.0, 100.0, 100.0));
        smoother.update(&mut state, &Rect::new(5.0, 0.0, 110.0, 100.0));

        // centre moves by 10 px -> shift 0.10 -> alpha 0.20
        assert_relative_eq!(state.adaptive_alpha, 0.20);
        assert_relative_eq!(state.smoothed_box.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(state.smoothed_box.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(state.smoothed_box.width, 102.0, epsilon = 1e-5);
        assert_relative_eq!(state.smoothed_box.height, 100.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blend_large_motion() {
        let smoother = Smoother::default();
        let mut state = seeded(Rect::new(0.0, 0.0, 100.0, 100.0));
        smoother.update(&mut state, &Rect::new(100.0, 0.0, 100.0, 100.0));

        assert_relative_eq!(state.adaptive_alpha, 0.70);
        assert_relative_eq!(state.smoothed_box.x, 70.0, epsilon = 1e-4);
    }

    #[test]
    fn test_custom_schedule() {
        let smoother = Smoother::new(SmootherParams {
            steps: vec![(0.5, 1.0)],
            floor_alpha: 0.5,
            ..SmootherParams::default()
        });
        assert_eq!(smoother.gain(0.6), 1.0);
        assert_eq!(smoother.gain(0.45), 0.5);
    }
}
