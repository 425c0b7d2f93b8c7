//! Per-frame choice of where to run the detector.

use crate::tracker::detection::{AttemptKind, DetectMode};
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Pixel region of the working image, `[y, y + height) x [x, x + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width: cols,
            height: rows,
        }
    }

    /// Clip `bbox` to a `rows x cols` image and pad it by
    /// `max(min_pad, floor(side * frac))` on every side, clipping again.
    ///
    /// Returns `None` when the clipped box is empty.
    pub fn around(bbox: &Rect, frac: f32, min_pad: usize, rows: usize, cols: usize) -> Option<Self> {
        if bbox.is_empty() || rows == 0 || cols == 0 {
            return None;
        }
        let [x1, y1, x2, y2] = bbox.to_tlbr();
        let x0 = x1.floor().clamp(0.0, cols as f32) as usize;
        let y0 = y1.floor().clamp(0.0, rows as f32) as usize;
        let x1 = x2.ceil().clamp(0.0, cols as f32) as usize;
        let y1 = y2.ceil().clamp(0.0, rows as f32) as usize;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let (w, h) = (x1 - x0, y1 - y0);
        let dx = min_pad.max((w as f32 * frac) as usize);
        let dy = min_pad.max((h as f32 * frac) as usize);
        let x = x0.saturating_sub(dx);
        let y = y0.saturating_sub(dy);
        Some(Self {
            x,
            y,
            width: (x1 + dx).min(cols) - x,
            height: (y1 + dy).min(rows) - y,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchAttempt {
    pub kind: AttemptKind,
    /// `None` when the seed fell outside the image; the attempt fails without detecting.
    pub region: Option<Region>,
    pub mode: DetectMode,
}

/// Up to two attempts in priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPlan {
    pub attempts: Vec<SearchAttempt>,
}

impl SearchPlan {
    pub fn has_roi(&self) -> bool {
        self.attempts.iter().any(|a| a.kind == AttemptKind::Roi)
    }

    pub fn has_full(&self) -> bool {
        self.attempts.iter().any(|a| a.kind == AttemptKind::Full)
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchPlanner {
    pub full_scan_interval: u64,
    pub roi_expand_frac: f32,
    pub roi_min_pad: usize,
    pub roi_mode: DetectMode,
    pub full_mode: DetectMode,
}

impl Default for SearchPlanner {
    fn default() -> Self {
        Self {
            full_scan_interval: 3,
            roi_expand_frac: 0.30,
            roi_min_pad: 2,
            roi_mode: DetectMode::Accurate,
            full_mode: DetectMode::Fast,
        }
    }
}

impl SearchPlanner {
    /// Whole-image scans run only on every `full_scan_interval`-th frame.
    pub fn is_full_scan_frame(&self, frame_index: u64) -> bool {
        self.full_scan_interval > 0 && frame_index % self.full_scan_interval == 0
    }

    /// Plan the attempts for the state's current frame on a `rows x cols` image.
    pub fn plan(&self, state: &TrackState, rows: usize, cols: usize) -> SearchPlan {
        let mut attempts = Vec::with_capacity(2);

        if state.is_seeded() {
            attempts.push(SearchAttempt {
                kind: AttemptKind::Roi,
                region: Region::around(
                    &state.last_raw_box,
                    self.roi_expand_frac,
                    self.roi_min_pad,
                    rows,
                    cols,
                ),
                mode: self.roi_mode,
            });
        }

        if self.is_full_scan_frame(state.frame_index) {
            attempts.push(SearchAttempt {
                kind: AttemptKind::Full,
                region: (rows > 0 && cols > 0).then(|| Region::full(rows, cols)),
                mode: self.full_mode,
            });
        }

        SearchPlan { attempts }
    }
}
