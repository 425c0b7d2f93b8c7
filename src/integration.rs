//! Integration module for connecting corner detectors with the tracker.
//!
//! A detector only has to answer "where are the corners of this pattern in
//! this grayscale view"; the tracker decides which view to hand it.

mod detector;
pub mod synthetic;

pub use detector::PatternDetector;
pub use synthetic::{DetectCall, SyntheticGridDetector};
