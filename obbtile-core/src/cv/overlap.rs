// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::ops::Index;

use num_traits::Float;

use crate::cv::sign::{Sign, sig};

/// Maximum number of vertices a clipped triangle can accumulate
const MAX_VERTICES: usize = 16;

/// A 2D point in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T: Float> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// The origin used as the anchor of the triangle fan
    pub fn origin() -> Self {
        Self::new(T::zero(), T::zero())
    }

    /// Equality up to the clipping tolerance
    pub fn coincides(&self, other: &Point<T>) -> bool {
        sig(self.x - other.x) == Sign::Zero && sig(self.y - other.y) == Sign::Zero
    }
}

/// A quadrilateral given as four vertices in cyclic order
pub type Quad<T> = [Point<T>; 4];

/// Overlap ratio denominators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapMode {
    /// Intersection over union of both polygons
    IoU,
    /// Intersection over the area of the first (reference) polygon
    IoF,
}

/// Outcome of intersecting two lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineCross<T> {
    /// Both endpoints lie on the cutting line
    Colinear,
    /// The segment does not cross the line at a unique point
    Parallel,
    Point(Point<T>),
}

/// Convert flat `[x1, y1, ..., x4, y4]` coordinates into a quadrilateral
///
/// # Examples
///
/// ```
/// use obbtile_core::cv::overlap::quad_from_coords;
///
/// let quad = quad_from_coords(&[0., 0., 2., 0., 2., 1., 0., 1.]);
/// assert_eq!(quad[2].x, 2.);
/// assert_eq!(quad[2].y, 1.);
/// ```
pub fn quad_from_coords<T: Float>(coords: &[T; 8]) -> Quad<T> {
    [
        Point::new(coords[0], coords[1]),
        Point::new(coords[2], coords[3]),
        Point::new(coords[4], coords[5]),
        Point::new(coords[6], coords[7]),
    ]
}

/// Cross product of `a - o` and `b - o`
#[inline]
pub fn cross<T: Float>(o: &Point<T>, a: &Point<T>, b: &Point<T>) -> T {
    (a.x - o.x) * (b.y - o.y) - (b.x - o.x) * (a.y - o.y)
}

/// Intersect the line through `a` and `b` with the segment from `c` to `d`
pub fn line_cross<T: Float>(
    a: &Point<T>,
    b: &Point<T>,
    c: &Point<T>,
    d: &Point<T>,
) -> LineCross<T> {
    let s1 = cross(a, b, c);
    let s2 = cross(a, b, d);

    if sig(s1) == Sign::Zero && sig(s2) == Sign::Zero {
        return LineCross::Colinear;
    }

    if sig(s2 - s1) == Sign::Zero {
        return LineCross::Parallel;
    }

    LineCross::Point(Point::new(
        (c.x * s2 - d.x * s1) / (s2 - s1),
        (c.y * s2 - d.y * s1) / (s2 - s1),
    ))
}

/// Signed area of a polygon using the shoelace formula
///
/// Counter-clockwise vertex order (in a y-up frame) yields a positive area.
///
/// # Examples
///
/// ```
/// use obbtile_core::cv::overlap::{Point, signed_area};
///
/// let square = [
///     Point::new(0., 0.),
///     Point::new(2., 0.),
///     Point::new(2., 2.),
///     Point::new(0., 2.),
/// ];
///
/// assert_eq!(signed_area(&square), 4.);
/// ```
pub fn signed_area<T: Float>(points: &[Point<T>]) -> T {
    let n = points.len();
    if n < 3 {
        return T::zero();
    }

    let two = T::one() + T::one();
    let mut area = T::zero();
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        area = area + p.x * q.y - p.y * q.x;
    }

    area / two
}

/// Stack-allocated polygon produced while clipping triangles
#[derive(Debug, Clone, Copy)]
struct Clipped<T> {
    points: [Point<T>; MAX_VERTICES],
    len: usize,
}

impl<T: Float> Clipped<T> {
    fn empty() -> Self {
        Self {
            points: [Point::origin(); MAX_VERTICES],
            len: 0,
        }
    }

    fn triangle(a: Point<T>, b: Point<T>, c: Point<T>) -> Self {
        let mut polygon = Self::empty();
        polygon.push(a);
        polygon.push(b);
        polygon.push(c);
        polygon
    }

    fn push(&mut self, point: Point<T>) {
        debug_assert!(self.len < MAX_VERTICES, "clipped polygon overflow");
        if self.len < MAX_VERTICES {
            self.points[self.len] = point;
            self.len += 1;
        }
    }

    fn as_slice(&self) -> &[Point<T>] {
        &self.points[..self.len]
    }
}

impl<T> Index<usize> for Clipped<T> {
    type Output = Point<T>;

    fn index(&self, index: usize) -> &Point<T> {
        &self.points[index]
    }
}

/// Keep the part of `polygon` strictly left of the directed line `a -> b`
fn polygon_cut<T: Float>(polygon: &Clipped<T>, a: &Point<T>, b: &Point<T>) -> Clipped<T> {
    let n = polygon.len;
    let mut cut = Clipped::empty();

    for i in 0..n {
        let p = &polygon[i];
        let q = &polygon[(i + 1) % n];

        let side_p = sig(cross(a, b, p));
        let side_q = sig(cross(a, b, q));

        if side_p == Sign::Positive {
            cut.push(*p);
        }

        if side_p != side_q {
            if let LineCross::Point(point) = line_cross(a, b, p, q) {
                cut.push(point);
            }
        }
    }

    let mut deduped = Clipped::empty();
    for i in 0..cut.len {
        if i == 0 || !cut[i].coincides(&cut[i - 1]) {
            deduped.push(cut[i]);
        }
    }

    while deduped.len > 1 && deduped[deduped.len - 1].coincides(&deduped[0]) {
        deduped.len -= 1;
    }

    deduped
}

/// Signed intersection of two origin-anchored triangles `(o, a, b)` and `(o, c, d)`
///
/// The result is negative when the triangles have opposite orientations
/// and zero when either triangle is degenerate.
fn triangle_intersection<T: Float>(
    mut a: Point<T>,
    mut b: Point<T>,
    mut c: Point<T>,
    mut d: Point<T>,
) -> T {
    let o = Point::origin();
    let s1 = sig(cross(&o, &a, &b));
    let s2 = sig(cross(&o, &c, &d));

    if s1 == Sign::Zero || s2 == Sign::Zero {
        return T::zero();
    }

    if s1 == Sign::Negative {
        std::mem::swap(&mut a, &mut b);
    }

    if s2 == Sign::Negative {
        std::mem::swap(&mut c, &mut d);
    }

    let mut polygon = Clipped::triangle(o, a, b);
    polygon = polygon_cut(&polygon, &o, &c);
    polygon = polygon_cut(&polygon, &c, &d);
    polygon = polygon_cut(&polygon, &d, &o);

    let area = signed_area(polygon.as_slice()).abs();

    if s1.opposes(s2) { -area } else { area }
}

/// Reverse vertex order of a quadrilateral with negative signed area
fn counter_clockwise<T: Float>(quad: &Quad<T>) -> Quad<T> {
    let mut quad = *quad;
    if signed_area(&quad) < T::zero() {
        quad.reverse();
    }
    quad
}

/// Intersection area of two convex quadrilaterals
///
/// Vertex winding of either input is irrelevant. Each polygon is split
/// into a fan of triangles anchored at the origin and the signed
/// intersections of every triangle pair are summed.
///
/// # Arguments
///
/// * `quad_a` - First convex quadrilateral
/// * `quad_b` - Second convex quadrilateral
///
/// # Examples
///
/// ```
/// use obbtile_core::cv::overlap::{intersection_area, quad_from_coords};
///
/// let a = quad_from_coords(&[0., 0., 2., 0., 2., 2., 0., 2.]);
/// let b = quad_from_coords(&[1., 1., 3., 1., 3., 3., 1., 3.]);
///
/// assert!((intersection_area(&a, &b) - 1.0_f64).abs() < 1e-9);
/// ```
pub fn intersection_area<T: Float>(quad_a: &Quad<T>, quad_b: &Quad<T>) -> T {
    let quad_a = counter_clockwise(quad_a);
    let quad_b = counter_clockwise(quad_b);

    let mut area = T::zero();
    for i in 0..4 {
        let (a, b) = (quad_a[i], quad_a[(i + 1) % 4]);
        for j in 0..4 {
            let (c, d) = (quad_b[j], quad_b[(j + 1) % 4]);
            area = area + triangle_intersection(a, b, c, d);
        }
    }

    area
}

/// Overlap ratio between two convex quadrilaterals
///
/// With `OverlapMode::IoF` the denominator is the area of `quad_a`, so
/// pass the object first when asking how much of it a window covers.
/// A zero denominator yields `(intersection + 1) / (denominator + 1)`.
///
/// # Examples
///
/// ```
/// use obbtile_core::cv::overlap::{OverlapMode, overlap_ratio, quad_from_coords};
///
/// let object = quad_from_coords(&[0., 0., 2., 0., 2., 2., 0., 2.]);
/// let window = quad_from_coords(&[1., 0., 5., 0., 5., 5., 1., 5.]);
///
/// let iof: f64 = overlap_ratio(&object, &window, OverlapMode::IoF);
/// assert!((iof - 0.5).abs() < 1e-9);
/// ```
pub fn overlap_ratio<T: Float>(quad_a: &Quad<T>, quad_b: &Quad<T>, mode: OverlapMode) -> T {
    let intersection = intersection_area(quad_a, quad_b);

    let denominator = match mode {
        OverlapMode::IoU => {
            signed_area(quad_a).abs() + signed_area(quad_b).abs() - intersection
        }
        OverlapMode::IoF => signed_area(quad_a).abs(),
    };

    if denominator == T::zero() {
        (intersection + T::one()) / (denominator + T::one())
    } else {
        intersection / denominator
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Quad<f64> {
        quad_from_coords(&[x1, y1, x2, y1, x2, y2, x1, y2])
    }

    fn rotated(cx: f64, cy: f64, w: f64, h: f64, theta: f64) -> Quad<f64> {
        let (sin, cos) = theta.sin_cos();
        let corners = [(-w, -h), (w, -h), (w, h), (-w, h)];
        corners.map(|(dx, dy)| {
            Point::new(
                cx + 0.5 * (dx * cos - dy * sin),
                cy + 0.5 * (dx * sin + dy * cos),
            )
        })
    }

    #[test]
    fn test_signed_area_orientation() {
        let quad = rect(0., 0., 3., 2.);
        assert_eq!(signed_area(&quad), 6.);

        let mut reversed = quad;
        reversed.reverse();
        assert_eq!(signed_area(&reversed), -6.);
    }

    #[test]
    fn test_line_cross_outcomes() {
        let a = Point::new(0., 0.);
        let b = Point::new(1., 0.);

        let crossing = line_cross(&a, &b, &Point::new(0.5, -1.), &Point::new(0.5, 1.));
        assert_eq!(crossing, LineCross::Point(Point::new(0.5, 0.)));

        let colinear = line_cross(&a, &b, &Point::new(2., 0.), &Point::new(3., 0.));
        assert_eq!(colinear, LineCross::Colinear);

        let parallel = line_cross(&a, &b, &Point::new(0., 1.), &Point::new(5., 1.));
        assert_eq!(parallel, LineCross::Parallel);
    }

    #[test]
    fn test_self_iou_is_one() {
        let quads = [
            rect(10., 20., 50., 80.),
            rotated(100., 100., 40., 10., 0.3),
            rotated(512., 300., 80., 25., 1.2),
            rotated(3., 4., 2., 2., -0.7),
        ];

        for quad in quads.iter() {
            let iou = overlap_ratio(quad, quad, OverlapMode::IoU);
            assert!((iou - 1.).abs() < 1e-6, "{:?}: {}", quad, iou);
        }
    }

    #[test]
    fn test_intersection_symmetric() {
        let a = rotated(50., 50., 60., 20., 0.4);
        let b = rotated(60., 45., 30., 30., -0.9);

        let ab = intersection_area(&a, &b);
        let ba = intersection_area(&b, &a);

        assert!(ab > 0.);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_is_zero() {
        let a = rect(0., 0., 10., 10.);
        let b = rect(20., 20., 30., 30.);
        assert!(intersection_area(&a, &b).abs() < 1e-9);

        let c = rotated(100., 100., 10., 5., 0.8);
        assert!(intersection_area(&a, &c).abs() < 1e-9);
    }

    #[test]
    fn test_touching_edges_are_zero() {
        let a = rect(0., 0., 10., 10.);
        let b = rect(10., 0., 20., 10.);
        assert!(intersection_area(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_half_overlap() {
        let a = rect(0., 0., 2., 2.);
        let b = rect(1., 0., 3., 2.);

        let iou = overlap_ratio(&a, &b, OverlapMode::IoU);
        assert!((iou - 1. / 3.).abs() < 1e-9);

        let iof = overlap_ratio(&a, &b, OverlapMode::IoF);
        assert!((iof - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_winding_invariance() {
        let a = rotated(5., 5., 6., 3., 0.5);
        let mut a_reversed = a;
        a_reversed.reverse();
        let b = rect(4., 3., 12., 9.);

        let forward = intersection_area(&a, &b);
        let backward = intersection_area(&a_reversed, &b);

        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_contained_diamond() {
        let diamond = quad_from_coords(&[5., 1., 9., 5., 5., 9., 1., 5.]);
        let window = rect(0., 0., 10., 10.);

        let inter = intersection_area(&diamond, &window);
        assert!((inter - 32.).abs() < 1e-9);

        let iof = overlap_ratio(&diamond, &window, OverlapMode::IoF);
        assert!((iof - 1.).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_against_window_clip() {
        // A diamond centered on the window's right edge loses half its area
        let diamond = quad_from_coords(&[10., 6., 14., 10., 10., 14., 6., 10.]);
        let window = rect(0., 0., 10., 20.);

        let iof = overlap_ratio(&diamond, &window, OverlapMode::IoF);
        assert!((iof - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_window_at_origin() {
        let window = rect(0., 0., 512., 512.);
        let object = rect(100., 100., 200., 150.);

        let inter = intersection_area(&object, &window);
        assert!((inter - 5000.).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_reference_saturates() {
        let point = rect(5., 5., 5., 5.);
        let window = rect(0., 0., 10., 10.);

        let iof = overlap_ratio(&point, &window, OverlapMode::IoF);
        assert_eq!(iof, 1.);

        let iou = overlap_ratio(&point, &point, OverlapMode::IoU);
        assert_eq!(iou, 1.);
    }

    #[test]
    fn test_single_precision() {
        let a: Quad<f32> = quad_from_coords(&[0., 0., 4., 0., 4., 4., 0., 4.]);
        let b: Quad<f32> = quad_from_coords(&[2., 2., 6., 2., 6., 6., 2., 6.]);

        let inter = intersection_area(&a, &b);
        assert!((inter - 4.).abs() < 1e-4);

        let iou = overlap_ratio(&a, &b, OverlapMode::IoU);
        assert!((iou - 4. / 28.).abs() < 1e-4);
    }
}
