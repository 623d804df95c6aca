// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use crate::constant::TRUNCATION_EPS;
use crate::cv::overlap::{OverlapMode, Quad, overlap_ratio, quad_from_coords};
use crate::im::Annotation;
use crate::sp::window::Window;

/// Objects assigned to a single window, still in image coordinates
pub type WindowAnnotation = Annotation;

/// Assign annotated objects to windows by intersection over foreground
///
/// An object joins a window when the fraction of its own area inside the
/// window reaches `iof_threshold`. Objects that are not fully contained
/// are flagged as truncated. The output holds one entry per window in
/// window order, including empty entries for windows without objects.
///
/// # Arguments
///
/// * `windows` - Crop windows of an image
/// * `annotation` - Objects of the same image
/// * `iof_threshold` - Minimum object coverage for assignment
///
/// # Examples
///
/// ```
/// use obbtile_core::im::Annotation;
/// use obbtile_core::sp::{Window, assign};
///
/// let annotation = Annotation::new(
///     vec![[10., 10., 20., 10., 20., 20., 10., 20.]],
///     vec!["plane".to_string()],
///     vec![0],
/// ).unwrap();
///
/// let windows = [Window::new(0, 0, 64, 64), Window::new(100, 100, 164, 164)];
/// let assigned = assign(&windows, &annotation, 0.7);
///
/// assert_eq!(assigned[0].len(), 1);
/// assert!(assigned[1].is_empty());
/// ```
pub fn assign(
    windows: &[Window],
    annotation: &Annotation,
    iof_threshold: f64,
) -> Vec<WindowAnnotation> {
    debug_assert_eq!(annotation.bboxes().len(), annotation.labels().len());
    debug_assert_eq!(annotation.bboxes().len(), annotation.difficulties().len());

    let objects: Vec<Quad<f64>> = annotation
        .bboxes()
        .iter()
        .map(quad_from_coords::<f64>)
        .collect();

    windows
        .iter()
        .map(|window| {
            let window_quad: Quad<f64> = window.to_quad();
            let mut assigned = WindowAnnotation::empty();

            for (index, object) in objects.iter().enumerate() {
                let iof = overlap_ratio(object, &window_quad, OverlapMode::IoF);

                if iof >= iof_threshold {
                    let truncated = (iof - 1.0).abs() > TRUNCATION_EPS;
                    assigned.push_from(annotation, index, truncated);
                }
            }

            assigned
        })
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::sp::window::generate_windows;

    fn single(bbox: [f64; 8]) -> Annotation {
        Annotation::new(vec![bbox], vec!["vehicle".to_string()], vec![1]).unwrap()
    }

    #[test]
    fn test_contained_object_not_truncated() {
        let annotation = single([10., 10., 30., 12., 28., 30., 8., 28.]);
        let assigned = assign(&[Window::new(0, 0, 100, 100)], &annotation, 0.7);

        assert_eq!(assigned[0].len(), 1);
        assert_eq!(assigned[0].truncated(), &[false]);
        assert_eq!(assigned[0].difficulties(), &[1]);
        assert_eq!(assigned[0].bboxes()[0], annotation.bboxes()[0]);
    }

    #[test]
    fn test_half_covered_object_threshold() {
        // Half of the object lies right of x = 100
        let annotation = single([90., 10., 110., 10., 110., 20., 90., 20.]);
        let windows = [Window::new(0, 0, 100, 100)];

        let excluded = assign(&windows, &annotation, 0.6);
        assert!(excluded[0].is_empty());

        let included = assign(&windows, &annotation, 0.4);
        assert_eq!(included[0].len(), 1);
        assert_eq!(included[0].truncated(), &[true]);
    }

    #[test]
    fn test_empty_annotation_keeps_windows() {
        let windows = [Window::new(0, 0, 10, 10), Window::new(5, 5, 15, 15)];
        let assigned = assign(&windows, &Annotation::empty(), 0.5);

        assert_eq!(assigned.len(), 2);
        assert!(assigned.iter().all(|a| a.is_empty()));
    }

    #[test]
    fn test_object_in_overlapping_windows() {
        let annotation = single([60., 60., 70., 60., 70., 70., 60., 70.]);
        let windows = [Window::new(0, 0, 100, 100), Window::new(50, 50, 150, 150)];

        let assigned = assign(&windows, &annotation, 0.7);
        assert_eq!(assigned[0].len(), 1);
        assert_eq!(assigned[1].len(), 1);
    }

    #[test]
    fn test_quadrant_tiling() {
        let annotation = single([100., 100., 200., 110., 190., 210., 90., 200.]);
        let windows = generate_windows(1000, 1000, &[512], &[0], 0.5).unwrap();
        let assigned = assign(&windows, &annotation, 0.5);

        assert_eq!(windows.len(), 4);
        assert_eq!(assigned.len(), 4);

        let (window, objects) = windows
            .iter()
            .zip(assigned.iter())
            .find(|(w, _)| w.x1 == 0 && w.y1 == 0)
            .unwrap();

        assert_eq!(objects.len(), 1);
        assert_eq!(objects.truncated(), &[false]);

        let local = objects.translated(window.x1 as f64, window.y1 as f64);
        assert!(local.bboxes()[0].iter().all(|&c| (0.0..512.0).contains(&c)));

        let others: usize = assigned.iter().map(|a| a.len()).sum();
        assert_eq!(others, 1);
    }
}
