use std::fmt;

use crate::tracker::rect::Rect;

/// Smoothing gain before the first blend has happened.
pub const BASE_ALPHA: f32 = 0.30;

/// Lifecycle phase of the tracked pattern, derived from [`TrackState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackPhase {
    /// No smoothed box; only scheduled full-frame scans run.
    #[default]
    Lost,
    /// Last frame produced an accepted detection.
    Tracking,
    /// Recent misses, smoothed box still valid.
    Holding,
}

/// Per-frame status tag reported alongside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    /// Box reported, detection accepted this frame.
    Stable,
    /// Box reported from the grace window.
    Hold,
    /// No box, but a full-frame scan ran this frame.
    Searching,
    /// No box and no full-frame scan.
    Lost,
}

impl TrackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackStatus::Stable => "stable",
            TrackStatus::Hold => "hold",
            TrackStatus::Searching => "searching",
            TrackStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable tracking state of one stream.
///
/// Created at stream start and mutated once per frame by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Most recent accepted detection; seeds the next ROI attempt while non-empty.
    pub last_raw_box: Rect,
    /// Output box; meaningful only while `has_smoothed` is set.
    pub smoothed_box: Rect,
    pub has_smoothed: bool,
    /// Frames in a row whose ROI attempt produced nothing usable.
    pub consecutive_roi_misses: u32,
    /// Frames since the last accepted detection.
    pub miss_grace: u32,
    /// Index of the frame being processed, starting at 1.
    pub frame_index: u64,
    /// Last gain used by the smoother.
    pub adaptive_alpha: f32,
}

impl Default for TrackState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackState {
    pub fn new() -> Self {
        Self {
            last_raw_box: Rect::default(),
            smoothed_box: Rect::default(),
            has_smoothed: false,
            consecutive_roi_misses: 0,
            miss_grace: 0,
            frame_index: 0,
            adaptive_alpha: BASE_ALPHA,
        }
    }

    /// Whether a ROI attempt will be made next frame.
    #[inline]
    pub fn is_seeded(&self) -> bool {
        !self.last_raw_box.is_empty()
    }

    pub fn phase(&self) -> TrackPhase {
        match (self.has_smoothed, self.miss_grace) {
            (false, _) => TrackPhase::Lost,
            (true, 0) => TrackPhase::Tracking,
            (true, _) => TrackPhase::Holding,
        }
    }

    pub fn advance_frame(&mut self) -> u64 {
        self.frame_index += 1;
        self.frame_index
    }

    /// Record an accepted detection box. Smoothing is applied separately.
    pub fn mark_accepted(&mut self, bbox: Rect) {
        self.last_raw_box = bbox;
        self.consecutive_roi_misses = 0;
        self.miss_grace = 0;
    }

    /// Count a failed ROI attempt; drop the seed once `reset_after` is reached.
    ///
    /// Returns `true` if the seed was dropped.
    pub fn mark_roi_miss(&mut self, reset_after: u32) -> bool {
        self.consecutive_roi_misses += 1;
        if self.consecutive_roi_misses >= reset_after {
            self.last_raw_box = Rect::default();
            self.consecutive_roi_misses = 0;
            return true;
        }
        false
    }

    /// Count a frame without an accepted detection.
    ///
    /// Once `miss_grace` exceeds `lost_after` the whole track is dropped and
    /// `true` is returned.
    pub fn mark_missed(&mut self, lost_after: u32) -> bool {
        self.miss_grace += 1;
        if self.miss_grace > lost_after && (self.has_smoothed || self.is_seeded()) {
            self.last_raw_box = Rect::default();
            self.smoothed_box = Rect::default();
            self.has_smoothed = false;
            return true;
        }
        false
    }

    /// Box to report, if the track is within its grace window.
    pub fn reported_box(&self, grace_frames: u32) -> Option<Rect> {
        (self.has_smoothed && self.miss_grace <= grace_frames).then_some(self.smoothed_box)
    }

    /// Status tag for the current frame.
    pub fn status(&self, grace_frames: u32, full_scanned: bool) -> TrackStatus {
        match self.reported_box(grace_frames) {
            Some(_) if self.miss_grace == 0 => TrackStatus::Stable,
            Some(_) => TrackStatus::Hold,
            None if full_scanned => TrackStatus::Searching,
            None => TrackStatus::Lost,
        }
    }

    /// Drop the current track but keep the frame counter running.
    pub fn reset(&mut self) {
        *self = Self {
            frame_index: self.frame_index,
            ..Self::new()
        };
    }
}
