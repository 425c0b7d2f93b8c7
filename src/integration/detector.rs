//! Trait for calibration-pattern detection backends.

use nalgebra::Point2;
use ndarray::ArrayView2;

use crate::tracker::{DetectMode, PatternSize};

/// Trait for pattern detection backends.
///
/// Implement this trait to plug any corner detector into the tracker.
///
/// # Example
///
/// ```ignore
/// use gridtrack_rs::{DetectMode, PatternDetector, PatternSize};
///
/// struct MyDetector;
///
/// impl PatternDetector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(
///         &mut self,
///         image: ArrayView2<'_, u8>,
///         pattern: PatternSize,
///         mode: DetectMode,
///     ) -> Result<Option<Vec<Point2<f32>>>, Self::Error> {
///         Ok(None)
///     }
/// }
/// ```
pub trait PatternDetector {
    /// Error type for backend failures. Not finding the pattern is not an error.
    type Error;

    /// Look for `pattern` in a grayscale image.
    ///
    /// # Arguments
    /// * `image` - Grayscale pixels indexed `[row, col]`; may be a sub-view of the frame
    /// * `pattern` - Inner-corner layout to look for
    /// * `mode` - Requested search effort
    ///
    /// # Returns
    /// The ordered corners in `image`-local pixel coordinates, or `None` if
    /// the pattern was not found.
    fn detect(
        &mut self,
        image: ArrayView2<'_, u8>,
        pattern: PatternSize,
        mode: DetectMode,
    ) -> Result<Option<Vec<Point2<f32>>>, Self::Error>;
}

impl<D: PatternDetector + ?Sized> PatternDetector for &mut D {
    type Error = D::Error;

    fn detect(
        &mut self,
        image: ArrayView2<'_, u8>,
        pattern: PatternSize,
        mode: DetectMode,
    ) -> Result<Option<Vec<Point2<f32>>>, Self::Error> {
        (**self).detect(image, pattern, mode)
    }
}

impl<D: PatternDetector + ?Sized> PatternDetector for Box<D> {
    type Error = D::Error;

    fn detect(
        &mut self,
        image: ArrayView2<'_, u8>,
        pattern: PatternSize,
        mode: DetectMode,
    ) -> Result<Option<Vec<Point2<f32>>>, Self::Error> {
        (**self).detect(image, pattern, mode)
    }
}
