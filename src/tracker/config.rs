use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracker::detection::{DetectMode, PatternSize};
use crate::tracker::outlier_filter::OutlierFilter;
use crate::tracker::search_planner::SearchPlanner;
use crate::tracker::smoother::SmootherParams;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("full_scan_interval must be at least 1")]
    ZeroFullScanInterval,
    #[error("at least one pattern size is required")]
    NoPatternSizes,
    #[error("pattern size {cols}x{rows} has a zero dimension")]
    EmptyPattern { cols: u32, rows: u32 },
    #[error("roi_expand_frac must be at least 0.10, got {0}")]
    RoiExpandTooSmall(f32),
    #[error("{name} must lie in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f32,
    },
}

/// Configuration for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Grid layouts to probe, in order.
    pub pattern_sizes: Vec<PatternSize>,
    /// Full-image scans run on every N-th frame.
    pub full_scan_interval: u64,
    /// Fractional padding around the previous box for ROI attempts.
    pub roi_expand_frac: f32,
    pub roi_min_pad: usize,
    pub roi_mode: DetectMode,
    pub full_mode: DetectMode,
    pub min_iou_accept: f32,
    pub outlier_grace: u32,
    /// Failed ROI attempts in a row before the seed is dropped.
    pub roi_miss_reset: u32,
    /// Missed frames during which the last smoothed box is still reported.
    pub grace_frames: u32,
    pub smoothing: SmootherParams,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pattern_sizes: vec![PatternSize::default()],
            full_scan_interval: 3,
            roi_expand_frac: 0.30,
            roi_min_pad: 2,
            roi_mode: DetectMode::Accurate,
            full_mode: DetectMode::Fast,
            min_iou_accept: 0.15,
            outlier_grace: 2,
            roi_miss_reset: 5,
            grace_frames: 6,
            smoothing: SmootherParams::default(),
        }
    }
}

impl TrackerConfig {
    /// Missed frames after which the whole track is dropped.
    pub fn lost_after(&self) -> u32 {
        self.roi_miss_reset + self.grace_frames
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.full_scan_interval == 0 {
            return Err(ConfigError::ZeroFullScanInterval);
        }
        if self.pattern_sizes.is_empty() {
            return Err(ConfigError::NoPatternSizes);
        }
        if let Some(p) = self.pattern_sizes.iter().find(|p| p.corner_count() == 0) {
            return Err(ConfigError::EmptyPattern {
                cols: p.cols,
                rows: p.rows,
            });
        }
        if !(self.roi_expand_frac >= 0.10) {
            return Err(ConfigError::RoiExpandTooSmall(self.roi_expand_frac));
        }
        if !(0.0..=1.0).contains(&self.min_iou_accept) {
            return Err(ConfigError::OutOfRange {
                name: "min_iou_accept",
                range: "[0, 1]",
                value: self.min_iou_accept,
            });
        }
        let gains = self
            .smoothing
            .steps
            .iter()
            .map(|&(_, alpha)| alpha)
            .chain(std::iter::once(self.smoothing.floor_alpha));
        for alpha in gains {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    name: "smoothing gain",
                    range: "(0, 1]",
                    value: alpha,
                });
            }
        }
        Ok(())
    }

    pub fn planner(&self) -> SearchPlanner {
        SearchPlanner {
            full_scan_interval: self.full_scan_interval,
            roi_expand_frac: self.roi_expand_frac,
            roi_min_pad: self.roi_min_pad,
            roi_mode: self.roi_mode,
            full_mode: self.full_mode,
        }
    }

    pub fn outlier_filter(&self) -> OutlierFilter {
        OutlierFilter::new(self.min_iou_accept, self.outlier_grace)
    }
}
