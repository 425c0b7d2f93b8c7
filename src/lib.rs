//! Temporal tracking of a planar calibration grid in a live video stream.
//!
//! Each frame the [`TrackController`] decides where to look (a region around
//! the last accepted box, or the whole image on a fixed schedule), hands that
//! view to a [`PatternDetector`], gates the result against the smoothed box,
//! and reports a stable bounding box with a status tag. Short dropouts keep
//! the last box on screen; longer ones report the pattern as lost.
//!
//! ```ignore
//! use gridtrack_rs::{SyntheticGridDetector, TrackController};
//!
//! let mut tracker = TrackController::with_default_config(SyntheticGridDetector::new());
//! for frame in frames {
//!     let report = tracker.process_frame(frame.view())?;
//!     println!("{} {:?}", report.status, report.reported_box);
//! }
//! ```

pub mod integration;
pub mod tracker;

pub use integration::{PatternDetector, SyntheticGridDetector};
pub use tracker::{
    ConfigError, DetectMode, Detection, FrameReport, PatternSize, Rect, TrackController,
    TrackPhase, TrackState, TrackStatus, TrackerConfig,
};
