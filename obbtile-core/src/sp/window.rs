// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use num_traits::Float;
use serde::Serialize;

use crate::constant::COVERAGE_FALLBACK_EPS;
use crate::cv::overlap::{Point, Quad};
use crate::error::TileError;

/// An axis-aligned crop region in image pixel coordinates
///
/// The right and bottom edges may extend past the image; the excess is
/// filled with padding when the patch is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Window {
    /// Initialize a new window
    ///
    /// # Examples
    ///
    /// ```
    /// use obbtile_core::sp::Window;
    ///
    /// let window = Window::new(0, 0, 512, 256);
    /// assert_eq!(window.width(), 512);
    /// assert_eq!(window.height(), 256);
    /// ```
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        debug_assert!(x1 < x2 && y1 < y2, "window must have positive extent");
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Nominal area of the window including any padding region
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Area of the window that falls inside a `width` x `height` image
    pub fn area_within(&self, width: u32, height: u32) -> u64 {
        let x2 = self.x2.min(width);
        let y2 = self.y2.min(height);
        x2.saturating_sub(self.x1) as u64 * y2.saturating_sub(self.y1) as u64
    }

    /// Clockwise vertices `(x1, y1), (x2, y1), (x2, y2), (x1, y2)`
    pub fn to_quad<T: Float>(&self) -> Quad<T> {
        let x1 = T::from(self.x1).unwrap_or_else(T::zero);
        let y1 = T::from(self.y1).unwrap_or_else(T::zero);
        let x2 = T::from(self.x2).unwrap_or_else(T::zero);
        let y2 = T::from(self.y2).unwrap_or_else(T::zero);

        [
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x2, y2),
            Point::new(x1, y2),
        ]
    }
}

/// Check that sizes and gaps pair up and every size exceeds its gap
pub fn validate_pairs(sizes: &[u32], gaps: &[u32]) -> Result<(), TileError> {
    if sizes.len() != gaps.len() {
        return Err(TileError::ConfigLengthError(
            "The number of sizes and gaps must be the same.",
        ));
    }

    for (&size, &gap) in sizes.iter().zip(gaps.iter()) {
        if size <= gap {
            return Err(TileError::SizeGapError { size, gap });
        }
    }

    Ok(())
}

/// Start offsets of tiles of `size` along an axis of length `extent`
///
/// The final start is pulled back so the last tile ends flush with the
/// axis whenever more than one tile is needed.
///
/// # Examples
///
/// ```
/// use obbtile_core::sp::window::axis_starts;
///
/// assert_eq!(axis_starts(1000, 512, 384), vec![0, 384, 488]);
/// assert_eq!(axis_starts(300, 512, 384), vec![0]);
/// ```
pub fn axis_starts(extent: u32, size: u32, step: u32) -> Vec<u32> {
    let count = if extent <= size {
        1
    } else {
        ((extent - size) as f64 / step as f64 + 1.0).ceil() as u32
    };

    let mut starts: Vec<u32> = (0..count).map(|i| i * step).collect();

    if let Some(last) = starts.last_mut() {
        if count > 1 && *last + size > extent {
            *last = extent - size;
        }
    }

    starts
}

/// Generate sliding windows for an image
///
/// Windows from every (size, gap) pair are concatenated in pair order and
/// row-major within a pair. A window survives when the fraction of its
/// nominal area lying inside the image is at least `min_coverage`. When no
/// window survives, the windows closest to the best coverage are kept so
/// that every image yields at least one window.
///
/// # Arguments
///
/// * `width` - Image width
/// * `height` - Image height
/// * `sizes` - Window side lengths
/// * `gaps` - Overlap between neighbouring windows for each size
/// * `min_coverage` - Minimum image coverage ratio of a window
///
/// # Examples
///
/// ```
/// use obbtile_core::sp::generate_windows;
///
/// let windows = generate_windows(1000, 1000, &[512], &[0], 0.5).unwrap();
/// assert_eq!(windows.len(), 4);
///
/// let invalid = generate_windows(1000, 1000, &[256], &[256], 0.5);
/// assert!(invalid.is_err());
/// ```
pub fn generate_windows(
    width: u32,
    height: u32,
    sizes: &[u32],
    gaps: &[u32],
    min_coverage: f64,
) -> Result<Vec<Window>, TileError> {
    validate_pairs(sizes, gaps)?;

    let mut candidates: Vec<(Window, f64)> = Vec::new();

    for (&size, &gap) in sizes.iter().zip(gaps.iter()) {
        let step = size - gap;
        let x_starts = axis_starts(width, size, step);
        let y_starts = axis_starts(height, size, step);

        candidates.reserve(x_starts.len() * y_starts.len());

        for &y1 in y_starts.iter() {
            for &x1 in x_starts.iter() {
                let window = Window::new(x1, y1, x1 + size, y1 + size);
                let coverage = window.area_within(width, height) as f64 / window.area() as f64;
                candidates.push((window, coverage));
            }
        }
    }

    let windows: Vec<Window> = candidates
        .iter()
        .filter(|(_, coverage)| *coverage >= min_coverage)
        .map(|(window, _)| *window)
        .collect();

    if !windows.is_empty() || candidates.is_empty() {
        return Ok(windows);
    }

    let best = candidates
        .iter()
        .map(|(_, coverage)| *coverage)
        .fold(f64::MIN, f64::max);

    Ok(candidates
        .into_iter()
        .filter(|(_, coverage)| (coverage - best).abs() < COVERAGE_FALLBACK_EPS)
        .map(|(window, _)| window)
        .collect())
}
