use nalgebra::Point2;

/// Axis-aligned bounding box in image coordinates.
///
/// A box with zero (or negative) area stands for "absent".
///
/// Supports two layouts:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Tight bounding box of a point set. Returns `None` for an empty set.
    pub fn bounding(points: &[Point2<f32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut x1, mut y1, mut x2, mut y2) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Some(Self::from_tlbr(x1, y1, x2, y2))
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box. Degenerate boxes report 0.
    #[inline]
    pub fn area(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width * self.height
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    /// Multiply every coordinate by the given per-axis factors.
    pub fn scale(&self, fx: f32, fy: f32) -> Self {
        Self::new(self.x * fx, self.y * fy, self.width * fx, self.height * fy)
    }

    /// Round every field to the nearest whole pixel.
    pub fn round(&self) -> Self {
        Self::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }

    /// Calculate Intersection over Union (IoU) with another bounding box.
    ///
    /// Returns 0 for disjoint boxes and when either box is degenerate.
    pub fn iou(&self, other: &Rect) -> f32 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        let inter_area = inter_width * inter_height;
        if inter_area <= 0.0 {
            return 0.0;
        }

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            (inter_area / union_area).min(1.0)
        } else {
            0.0
        }
    }
}
