mod config;
mod detection;
mod outlier_filter;
mod rect;
mod search_planner;
mod smoother;
mod track_controller;
mod track_state;

pub use config::{ConfigError, TrackerConfig};
pub use detection::{AttemptKind, DetectMode, Detection, PatternSize};
pub use outlier_filter::{OutlierFilter, Verdict};
pub use rect::Rect;
pub use search_planner::{Region, SearchAttempt, SearchPlan, SearchPlanner};
pub use smoother::{Smoother, SmootherParams};
pub use track_controller::{FrameReport, TrackController};
pub use track_state::{BASE_ALPHA, TrackPhase, TrackState, TrackStatus};
