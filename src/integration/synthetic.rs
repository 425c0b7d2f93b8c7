//! Deterministic detector and frame helpers for synthetic scenes.
//!
//! The detector treats the bright region of a frame as the pattern and lays a
//! regular corner grid across it. It is enough to drive the tracker in tests
//! and demos without a real corner detector.

use std::convert::Infallible;

use nalgebra::Point2;
use ndarray::{Array2, ArrayView2, s};

use crate::integration::PatternDetector;
use crate::tracker::{DetectMode, PatternSize, Rect};

/// One recorded detector call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectCall {
    pub rows: usize,
    pub cols: usize,
    pub pattern: PatternSize,
    pub mode: DetectMode,
}

/// Finds the bounding box of pixels above `threshold` and returns a
/// `cols x rows` grid spanning it.
///
/// A bright region touching the view border is reported as not found, like
/// a real board cut off by the search region.
#[derive(Debug, Clone)]
pub struct SyntheticGridDetector {
    pub threshold: u8,
    /// Only answer for these layouts; any layout when empty.
    pub accepted_patterns: Vec<PatternSize>,
    pub calls: Vec<DetectCall>,
}

impl Default for SyntheticGridDetector {
    fn default() -> Self {
        Self {
            threshold: 127,
            accepted_patterns: Vec::new(),
            calls: Vec::new(),
        }
    }
}

impl SyntheticGridDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn only(mut self, pattern: PatternSize) -> Self {
        self.accepted_patterns.push(pattern);
        self
    }

    fn bright_bounds(&self, image: &ArrayView2<'_, u8>) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for ((r, c), &v) in image.indexed_iter() {
            if v <= self.threshold {
                continue;
            }
            bounds = Some(match bounds {
                None => (c, r, c, r),
                Some((x0, y0, x1, y1)) => (x0.min(c), y0.min(r), x1.max(c), y1.max(r)),
            });
        }
        bounds
    }
}

impl PatternDetector for SyntheticGridDetector {
    type Error = Infallible;

    fn detect(
        &mut self,
        image: ArrayView2<'_, u8>,
        pattern: PatternSize,
        mode: DetectMode,
    ) -> Result<Option<Vec<Point2<f32>>>, Self::Error> {
        let (rows, cols) = image.dim();
        self.calls.push(DetectCall {
            rows,
            cols,
            pattern,
            mode,
        });

        if !self.accepted_patterns.is_empty() && !self.accepted_patterns.contains(&pattern) {
            return Ok(None);
        }
        let Some((x0, y0, x1, y1)) = self.bright_bounds(&image) else {
            return Ok(None);
        };
        if x0 == 0 || y0 == 0 || x1 + 1 >= cols || y1 + 1 >= rows {
            return Ok(None);
        }

        // span * i / n keeps the last corner exactly on the far edge
        let lerp = |lo: usize, hi: usize, i: u32, n: u32| {
            lo as f32 + (hi - lo) as f32 * i as f32 / n.saturating_sub(1).max(1) as f32
        };
        let corners = (0..pattern.rows)
            .flat_map(|j| {
                (0..pattern.cols).map(move |i| {
                    Point2::new(lerp(x0, x1, i, pattern.cols), lerp(y0, y1, j, pattern.rows))
                })
            })
            .collect();
        Ok(Some(corners))
    }
}

/// Black `rows x cols` frame with white filled boxes.
pub fn render_boxes(rows: usize, cols: usize, boxes: &[Rect]) -> Array2<u8> {
    let mut frame = Array2::zeros((rows, cols));
    for bbox in boxes {
        let x0 = (bbox.x.max(0.0) as usize).min(cols);
        let y0 = (bbox.y.max(0.0) as usize).min(rows);
        let x1 = ((bbox.x + bbox.width).max(0.0) as usize).min(cols);
        let y1 = ((bbox.y + bbox.height).max(0.0) as usize).min(rows);
        if x1 > x0 && y1 > y0 {
            frame.slice_mut(s![y0..y1, x0..x1]).fill(255);
        }
    }
    frame
}
