//! IoU gate against the smoothed box.

use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// No smoothed box yet.
    First,
    /// Overlaps the smoothed box enough.
    Consistent { iou: f32 },
    /// Low overlap, but the track has been failing long enough to let it through.
    Recovered { iou: f32 },
    Rejected { iou: f32 },
}

impl Verdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verdict::Rejected { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    pub min_iou_accept: f32,
    /// Low-overlap candidates pass once `miss_grace` exceeds this.
    pub outlier_grace: u32,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            min_iou_accept: 0.15,
            outlier_grace: 2,
        }
    }
}

impl OutlierFilter {
    pub fn new(min_iou_accept: f32, outlier_grace: u32) -> Self {
        Self {
            min_iou_accept,
            outlier_grace,
        }
    }

    pub fn judge(&self, candidate: &Rect, state: &TrackState) -> Verdict {
        if !state.has_smoothed {
            return Verdict::First;
        }
        let iou = candidate.iou(&state.smoothed_box);
        if iou >= self.min_iou_accept {
            Verdict::Consistent { iou }
        } else if state.miss_grace > self.outlier_grace {
            Verdict::Recovered { iou }
        } else {
            Verdict::Rejected { iou }
        }
    }

    pub fn accepts(&self, candidate: &Rect, state: &TrackState) -> bool {
        self.judge(candidate, state).is_accepted()
    }
}
