use gridtrack_rs::integration::synthetic::render_boxes;
use gridtrack_rs::{
    Rect, SyntheticGridDetector, TrackController, TrackPhase, TrackStatus, TrackerConfig,
};
use ndarray::Array2;

const ROWS: usize = 240;
const COLS: usize = 320;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn board(x: f32, y: f32) -> Array2<u8> {
    render_boxes(ROWS, COLS, &[Rect::new(x, y, 50.0, 50.0)])
}

fn blank() -> Array2<u8> {
    render_boxes(ROWS, COLS, &[])
}

#[test]
fn test_hold_then_lost() {
    init_logging();
    let mut tracker = TrackController::with_default_config(SyntheticGridDetector::new());

    // Frames 1-3 show the board; only frame 3 is on the full-scan schedule.
    let mut reports = Vec::new();
    for _ in 1..=3 {
        reports.push(tracker.process_frame(board(10.0, 10.0).view()).unwrap());
    }
    assert_eq!(reports[0].status, TrackStatus::Lost);
    assert_eq!(reports[1].status, TrackStatus::Lost);
    assert_eq!(reports[2].status, TrackStatus::Stable);
    let held = reports[2].reported_box.unwrap();
    // 50 px board: corners sit on pixels 10..=59, so the span is 49 px
    assert_eq!(held, Rect::new(10.0, 10.0, 49.0, 49.0));

    // Frames 4-9: within the grace window.
    for frame in 4..=9 {
        let report = tracker.process_frame(blank().view()).unwrap();
        assert_eq!(report.frame_index, frame);
        assert_eq!(report.status, TrackStatus::Hold, "frame {frame}");
        assert_eq!(report.reported_box, Some(held));
        assert_eq!(report.miss_grace as u64, frame - 3);
    }
    assert_eq!(tracker.state().phase(), TrackPhase::Holding);

    // Frame 10: grace exhausted, no scan scheduled.
    let report = tracker.process_frame(blank().view()).unwrap();
    assert_eq!(report.status, TrackStatus::Lost);
    assert_eq!(report.reported_box, None);
}

#[test]
fn test_searching_when_scanning_every_frame() {
    init_logging();
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();

    for _ in 1..=3 {
        let report = tracker.process_frame(board(10.0, 10.0).view()).unwrap();
        assert_eq!(report.status, TrackStatus::Stable);
    }
    for _ in 4..=9 {
        let report = tracker.process_frame(blank().view()).unwrap();
        assert_eq!(report.status, TrackStatus::Hold);
    }
    let report = tracker.process_frame(blank().view()).unwrap();
    assert_eq!(report.status, TrackStatus::Searching);
    assert_eq!(report.reported_box, None);
}

#[test]
fn test_grace_window_counts_every_miss() {
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let grace = config.grace_frames;
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();
    tracker.process_frame(board(100.0, 80.0).view()).unwrap();
    assert_eq!(tracker.state().phase(), TrackPhase::Tracking);

    for n in 1..=grace + 3 {
        let report = tracker.process_frame(blank().view()).unwrap();
        assert_eq!(report.miss_grace, n);
        assert_eq!(report.reported_box.is_some(), n <= grace);
    }
}

#[test]
fn test_full_reset_then_fresh_acquisition() {
    init_logging();
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let lost_after = config.lost_after();
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();

    for _ in 0..4 {
        tracker.process_frame(board(20.0, 20.0).view()).unwrap();
    }
    for _ in 0..lost_after {
        tracker.process_frame(blank().view()).unwrap();
    }
    assert!(tracker.state().has_smoothed);

    tracker.process_frame(blank().view()).unwrap();
    let state = tracker.state();
    assert_eq!(state.phase(), TrackPhase::Lost);
    assert!(!state.has_smoothed);
    assert!(!state.is_seeded());

    // Reappearing far away is a first-ever detection: no blending, no gating.
    let report = tracker.process_frame(board(200.0, 150.0).view()).unwrap();
    assert_eq!(report.status, TrackStatus::Stable);
    assert_eq!(report.reported_box, Some(Rect::new(200.0, 150.0, 49.0, 49.0)));
    assert_eq!(tracker.state().smoothed_box, Rect::new(200.0, 150.0, 49.0, 49.0));
}

#[test]
fn test_jump_is_held_back_until_misses_accumulate() {
    init_logging();
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();

    let first = tracker.process_frame(board(10.0, 10.0).view()).unwrap();
    let origin = first.reported_box.unwrap();

    // The board jumps across the image: rejected while miss_grace <= 2.
    for expected_grace in 1..=3 {
        let report = tracker.process_frame(board(200.0, 150.0).view()).unwrap();
        assert_eq!(report.status, TrackStatus::Hold);
        assert_eq!(report.reported_box, Some(origin));
        assert_eq!(report.miss_grace, expected_grace);
        assert!(report.detection.is_none());
    }

    let report = tracker.process_frame(board(200.0, 150.0).view()).unwrap();
    assert_eq!(report.status, TrackStatus::Stable);
    assert_eq!(report.adaptive_alpha, 0.70);
    let jumped = report.reported_box.unwrap();
    assert!((jumped.x - (0.7 * 200.0 + 0.3 * 10.0)).abs() < 1e-3);
    assert!((jumped.y - (0.7 * 150.0 + 0.3 * 10.0)).abs() < 1e-3);
    assert_eq!(
        tracker.state().last_raw_box,
        Rect::new(200.0, 150.0, 49.0, 49.0)
    );
}

#[test]
fn test_slow_drift_is_smoothed() {
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();

    tracker.process_frame(board(100.0, 100.0).view()).unwrap();
    let report = tracker.process_frame(board(104.0, 100.0).view()).unwrap();

    assert_eq!(report.status, TrackStatus::Stable);
    assert_eq!(report.adaptive_alpha, 0.20);
    let bbox = report.reported_box.unwrap();
    assert!((bbox.x - 100.8).abs() < 1e-3);
    assert_eq!(tracker.state().last_raw_box.x, 104.0);
}

#[test]
fn test_independent_trackers() {
    let mut a = TrackController::with_default_config(SyntheticGridDetector::new());
    let mut b = TrackController::with_default_config(SyntheticGridDetector::new());

    for _ in 0..3 {
        a.process_frame(board(30.0, 30.0).view()).unwrap();
    }
    let report = b.process_frame(board(30.0, 30.0).view()).unwrap();

    assert_eq!(a.state().phase(), TrackPhase::Tracking);
    assert_eq!(b.state().phase(), TrackPhase::Lost);
    assert_eq!(report.frame_index, 1);
}

#[test]
fn test_stale_seed_dropped_while_holding() {
    init_logging();
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let roi_miss_reset = config.roi_miss_reset;
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();

    tracker.process_frame(board(100.0, 100.0).view()).unwrap();
    let tracked = tracker
        .process_frame(board(100.0, 100.0).view())
        .unwrap()
        .reported_box;

    for n in 1..roi_miss_reset {
        tracker.process_frame(blank().view()).unwrap();
        assert_eq!(tracker.state().consecutive_roi_misses, n);
        assert!(tracker.state().is_seeded());
    }

    let report = tracker.process_frame(blank().view()).unwrap();
    let state = tracker.state();
    assert!(!state.is_seeded());
    assert!(state.has_smoothed);
    assert_eq!(state.consecutive_roi_misses, 0);
    assert_eq!(report.status, TrackStatus::Hold);
    assert_eq!(report.reported_box, tracked);

    // Without a seed only whole-image scans run.
    let before = tracker.detector().calls.len();
    let report = tracker.process_frame(blank().view()).unwrap();
    assert_eq!(report.status, TrackStatus::Hold);
    let calls = &tracker.detector().calls[before..];
    assert_eq!(calls.len(), 1);
    assert!(calls.iter().all(|c| c.rows == ROWS && c.cols == COLS));
}

#[test]
fn test_rejected_full_scan_counts_as_roi_miss() {
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();
    tracker.process_frame(board(10.0, 10.0).view()).unwrap();
    let seed = tracker.state().last_raw_box;

    let report = tracker.process_frame(board(200.0, 150.0).view()).unwrap();
    assert_eq!(report.status, TrackStatus::Hold);
    assert!(report.detection.is_none());

    let state = tracker.state();
    assert_eq!(state.consecutive_roi_misses, 1);
    assert_eq!(state.miss_grace, 1);
    assert_eq!(state.last_raw_box, seed);
}

#[test]
fn test_rejected_roi_detection_counts_as_roi_miss() {
    let config = TrackerConfig {
        full_scan_interval: 1,
        ..TrackerConfig::default()
    };
    let mut tracker = TrackController::new(SyntheticGridDetector::new(), config).unwrap();
    tracker.process_frame(board(100.0, 100.0).view()).unwrap();
    let seed = tracker.state().last_raw_box;

    // A small blob inside the ROI overlaps the smoothed box far below the IoU gate.
    let speck = render_boxes(ROWS, COLS, &[Rect::new(140.0, 140.0, 10.0, 10.0)]);
    for n in 1..=2 {
        let calls_before = tracker.detector().calls.len();
        let report = tracker.process_frame(speck.view()).unwrap();
        assert_eq!(report.status, TrackStatus::Hold);
        assert!(report.detection.is_none());
        assert_eq!(tracker.state().consecutive_roi_misses, n);
        assert_eq!(tracker.state().last_raw_box, seed);

        // the ROI hit short-circuits the full scan
        let calls = &tracker.detector().calls[calls_before..];
        assert_eq!(calls.len(), 1);
        assert!(calls[0].rows < ROWS && calls[0].cols < COLS);
    }
}
