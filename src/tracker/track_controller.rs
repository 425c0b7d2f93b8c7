//! Per-frame tracking loop: plan, detect, gate, smooth, report.

use std::time::{Duration, Instant};

use log::{debug, trace};
use nalgebra::Vector2;
use ndarray::{ArrayView2, s};

use crate::integration::PatternDetector;
use crate::tracker::config::{ConfigError, TrackerConfig};
use crate::tracker::detection::{AttemptKind, Detection};
use crate::tracker::outlier_filter::{OutlierFilter, Verdict};
use crate::tracker::rect::Rect;
use crate::tracker::search_planner::{SearchAttempt, SearchPlanner};
use crate::tracker::smoother::Smoother;
use crate::tracker::track_state::{TrackState, TrackStatus};

/// What the tracker reports for one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Smoothed box, absent outside the grace window.
    pub reported_box: Option<Rect>,
    pub status: TrackStatus,
    /// Time spent in detector calls this frame.
    pub last_detect_latency: Duration,
    pub adaptive_alpha: f32,
    pub miss_grace: u32,
    /// Detection accepted this frame, with its corners.
    pub detection: Option<Detection>,
}

impl FrameReport {
    /// Reported box mapped from the working resolution `from` to `to`,
    /// both given as `(width, height)`, rounded to whole pixels.
    pub fn scaled_box(&self, from: (u32, u32), to: (u32, u32)) -> Option<Rect> {
        if from.0 == 0 || from.1 == 0 {
            return None;
        }
        let fx = to.0 as f32 / from.0 as f32;
        let fy = to.1 as f32 / from.1 as f32;
        self.reported_box
            .map(|bbox| bbox.scale(fx, fy).round())
            .filter(|bbox| !bbox.is_empty())
    }
}

/// Tracks one calibration pattern through a stream of grayscale frames.
///
/// Owns its detector and state; independent controllers never share anything.
pub struct TrackController<D: PatternDetector> {
    detector: D,
    config: TrackerConfig,
    planner: SearchPlanner,
    filter: OutlierFilter,
    smoother: Smoother,
    state: TrackState,
}

impl<D: PatternDetector> TrackController<D> {
    /// Create a controller after validating `config`.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(detector, config))
    }

    /// Create a controller with the default configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::from_parts(detector, TrackerConfig::default())
    }

    /// `config` must already be valid.
    fn from_parts(detector: D, config: TrackerConfig) -> Self {
        Self {
            detector,
            planner: config.planner(),
            filter: config.outlier_filter(),
            smoother: Smoother::new(config.smoothing.clone()),
            config,
            state: TrackState::new(),
        }
    }

    /// Process a single frame at the working resolution.
    ///
    /// Not finding the pattern is a normal outcome; only detector backend
    /// errors are returned.
    pub fn process_frame(&mut self, image: ArrayView2<'_, u8>) -> Result<FrameReport, D::Error> {
        let frame_index = self.state.advance_frame();
        let (rows, cols) = image.dim();
        let plan = self.planner.plan(&self.state, rows, cols);
        trace!("frame {frame_index}: plan {:?}", plan.attempts);

        let started = Instant::now();
        let mut found = None;
        let mut full_scanned = false;
        for attempt in &plan.attempts {
            full_scanned |= attempt.kind == AttemptKind::Full;
            if let Some(det) = self.run_attempt(image, attempt)? {
                found = Some(det);
                break;
            }
        }
        let last_detect_latency = started.elapsed();

        let accepted = found.filter(|det| {
            let verdict = self.filter.judge(&det.bbox, &self.state);
            match verdict {
                Verdict::Rejected { iou } => debug!(
                    "frame {frame_index}: rejected {:?} detection, iou {iou:.3}, miss_grace {}",
                    det.source, self.state.miss_grace
                ),
                Verdict::Recovered { iou } => debug!(
                    "frame {frame_index}: accepted jump to {:?}, iou {iou:.3} after {} misses",
                    det.bbox, self.state.miss_grace
                ),
                _ => {}
            }
            verdict.is_accepted()
        });

        match &accepted {
            Some(det) => {
                if !self.state.has_smoothed {
                    debug!("frame {frame_index}: track acquired at {:?}", det.bbox);
                }
                self.state.mark_accepted(det.bbox);
                self.smoother.update(&mut self.state, &det.bbox);
            }
            None => {
                if plan.has_roi() && self.state.mark_roi_miss(self.config.roi_miss_reset) {
                    debug!("frame {frame_index}: ROI seed dropped after repeated misses");
                }
                if self.state.mark_missed(self.config.lost_after()) {
                    debug!(
                        "frame {frame_index}: track lost after {} missed frames",
                        self.state.miss_grace
                    );
                }
            }
        }

        let grace = self.config.grace_frames;
        Ok(FrameReport {
            frame_index,
            reported_box: self.state.reported_box(grace),
            status: self.state.status(grace, full_scanned),
            last_detect_latency,
            adaptive_alpha: self.state.adaptive_alpha,
            miss_grace: self.state.miss_grace,
            detection: accepted,
        })
    }

    /// Run one attempt, probing each configured pattern size in order.
    fn run_attempt(
        &mut self,
        image: ArrayView2<'_, u8>,
        attempt: &SearchAttempt,
    ) -> Result<Option<Detection>, D::Error> {
        let Some(region) = attempt.region else {
            return Ok(None);
        };
        let view = image.slice(s![
            region.y..region.y + region.height,
            region.x..region.x + region.width
        ]);
        let offset = Vector2::new(region.x as f32, region.y as f32);

        for &pattern in &self.config.pattern_sizes {
            let Some(corners) = self.detector.detect(view.view(), pattern, attempt.mode)? else {
                continue;
            };
            let corners = corners.into_iter().map(|p| p + offset).collect();
            match Detection::from_corners(corners, pattern, attempt.kind) {
                Some(det) => return Ok(Some(det)),
                None => debug!(
                    "{:?} attempt: {}x{} pattern returned unusable corners",
                    attempt.kind, pattern.cols, pattern.rows
                ),
            }
        }
        Ok(None)
    }

    /// Drop the current track; the next acceptance starts afresh.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    pub fn into_detector(self) -> D {
        self.detector
    }
}
