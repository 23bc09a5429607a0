//! Geometry kernel: distances, frames, and element hit-testing.
//!
//! All inputs are in world space. Element frames may carry negative width or
//! height (the drag direction); every test here is sign-agnostic.

use crate::shapes::{CanvasElement, ShapeKind};
use kurbo::{Point, Rect};

/// Euclidean distance from `p` to the segment `a`-`b`, with the projection
/// clamped to the segment.
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Minimum distance from `p` to a polyline. A single point degenerates to
/// point distance; an empty polyline is infinitely far.
pub fn distance_point_to_polyline(p: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|pair| distance_point_to_segment(p, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Axis-aligned bounding box of a point set.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut rect = Rect::from_points(*first, *first);
    for p in &points[1..] {
        rect = rect.union_pt(*p);
    }
    Some(rect)
}

/// Signed bounding parameters of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame spanning two drag points, keeping the drag direction in the sign.
    pub fn from_drag(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x - start.x, end.y - start.y)
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The far corner, `origin + size`.
    pub fn end(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Positive-size rectangle covering the frame.
    pub fn normalized(&self) -> Rect {
        Rect::from_points(self.origin(), self.end())
    }

    /// Inclusive containment, regardless of sign.
    pub fn contains(&self, p: Point) -> bool {
        rect_contains_inclusive(self.normalized(), p)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Inclusive point-in-rect test (kurbo's `contains` excludes the far edges).
pub fn rect_contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Apex, base-left, and base-right of a triangle inscribed in a frame.
pub fn triangle_vertices(frame: &Frame) -> [Point; 3] {
    [
        Point::new(frame.x + frame.width / 2.0, frame.y),
        Point::new(frame.x, frame.y + frame.height),
        Point::new(frame.x + frame.width, frame.y + frame.height),
    ]
}

/// Corners of a square frame in drawing order.
pub fn rect_corners(frame: &Frame) -> [Point; 4] {
    [
        Point::new(frame.x, frame.y),
        Point::new(frame.x + frame.width, frame.y),
        Point::new(frame.x + frame.width, frame.y + frame.height),
        Point::new(frame.x, frame.y + frame.height),
    ]
}

/// Center and radius of a circle built from a frame. The radius follows the
/// width only.
pub fn circle_params(frame: &Frame) -> (Point, f64) {
    (frame.center(), frame.width.abs() / 2.0)
}

fn closed_ring_distance(p: Point, vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| distance_point_to_segment(p, vertices[i], vertices[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Is the cursor on the element's outline, within `tolerance`?
///
/// Text has no outline and uses its bounding box instead.
pub fn is_on_border(cursor: Point, element: &CanvasElement, tolerance: f64) -> bool {
    match element {
        CanvasElement::Shape(shape) => {
            let frame = shape.frame();
            match shape.kind {
                ShapeKind::Line | ShapeKind::ArrowedLine => {
                    distance_point_to_segment(cursor, frame.origin(), frame.end()) <= tolerance
                }
                ShapeKind::Square => closed_ring_distance(cursor, &rect_corners(&frame)) <= tolerance,
                ShapeKind::Triangle => {
                    closed_ring_distance(cursor, &triangle_vertices(&frame)) <= tolerance
                }
                ShapeKind::Circle => {
                    let (center, radius) = circle_params(&frame);
                    (cursor.distance(center) - radius).abs() <= tolerance
                }
            }
        }
        CanvasElement::Text(text) => text.frame().contains(cursor),
        CanvasElement::Freehand(stroke) => {
            distance_point_to_polyline(cursor, &stroke.points) <= tolerance
        }
    }
}

/// Looser containment used by click-to-select.
///
/// Line-like elements and freehand strokes have no interior and fall back to
/// the border test.
pub fn is_inside(cursor: Point, element: &CanvasElement, tolerance: f64) -> bool {
    match element {
        CanvasElement::Shape(shape) => {
            let frame = shape.frame();
            match shape.kind {
                ShapeKind::Square | ShapeKind::Triangle => frame.contains(cursor),
                ShapeKind::Circle => {
                    let (center, radius) = circle_params(&frame);
                    cursor.distance(center) <= radius
                }
                ShapeKind::Line | ShapeKind::ArrowedLine => {
                    is_on_border(cursor, element, tolerance)
                }
            }
        }
        CanvasElement::Text(text) => text.frame().contains(cursor),
        CanvasElement::Freehand(_) => is_on_border(cursor, element, tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rough::RoughStyle;
    use crate::shapes::{FreehandElement, ShapeElement, StrokeOptions, TextElement, TextOptions};

    fn shape(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> CanvasElement {
        CanvasElement::Shape(ShapeElement::new(kind, Frame::new(x, y, w, h), &RoughStyle::default()))
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_point_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        // Clamped past the end.
        assert!((distance_point_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        // Zero-length segment.
        assert!((distance_point_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyline_distance() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert!((distance_point_to_polyline(Point::new(12.0, 5.0), &pts) - 2.0).abs() < 1e-12);
        assert!(distance_point_to_polyline(Point::ZERO, &[]).is_infinite());
    }

    #[test]
    fn test_bounding_box() {
        let pts = [Point::new(3.0, -1.0), Point::new(-2.0, 4.0), Point::new(1.0, 1.0)];
        let rect = bounding_box(&pts).unwrap();
        assert_eq!(rect, Rect::new(-2.0, -1.0, 3.0, 4.0));
        assert!(bounding_box(&[]).is_none());
    }

    #[test]
    fn test_frame_negative_size() {
        let frame = Frame::new(100.0, 100.0, -50.0, -20.0);
        assert_eq!(frame.normalized(), Rect::new(50.0, 80.0, 100.0, 100.0));
        assert!(frame.contains(Point::new(75.0, 90.0)));
        assert!(frame.contains(Point::new(50.0, 80.0)));
        assert!(!frame.contains(Point::new(101.0, 90.0)));
    }

    #[test]
    fn test_center_is_inside() {
        let frames = [(0.0, 0.0, 100.0, 60.0), (10.0, 10.0, -40.0, -80.0), (5.0, -5.0, 30.0, -30.0)];
        for (x, y, w, h) in frames {
            let frame = Frame::new(x, y, w, h);
            for kind in [ShapeKind::Square, ShapeKind::Circle, ShapeKind::Triangle] {
                let element = shape(kind, x, y, w, h);
                assert!(is_inside(frame.center(), &element, 7.0), "{kind:?} {frame:?}");
            }
            let text = CanvasElement::Text(TextElement::new(frame, "hi".into(), TextOptions::default()));
            assert!(is_inside(frame.center(), &text, 7.0));
        }
    }

    #[test]
    fn test_square_border() {
        let square = shape(ShapeKind::Square, 0.0, 0.0, 100.0, 100.0);
        assert!(is_on_border(Point::new(50.0, 0.0), &square, 7.0));
        assert!(is_on_border(Point::new(104.0, 50.0), &square, 7.0));
        assert!(!is_on_border(Point::new(50.0, 50.0), &square, 7.0));
        assert!(is_inside(Point::new(50.0, 50.0), &square, 7.0));
    }

    #[test]
    fn test_circle_border_and_inside() {
        let circle = shape(ShapeKind::Circle, 25.0, 25.0, 50.0, 50.0);
        assert!(is_on_border(Point::new(75.0, 50.0), &circle, 7.0));
        assert!(!is_on_border(Point::new(50.0, 50.0), &circle, 7.0));
        assert!(is_inside(Point::new(50.0, 50.0), &circle, 7.0));
        assert!(!is_inside(Point::new(90.0, 50.0), &circle, 7.0));
    }

    #[test]
    fn test_triangle_border() {
        let tri = shape(ShapeKind::Triangle, 0.0, 0.0, 100.0, 100.0);
        // Base edge.
        assert!(is_on_border(Point::new(50.0, 103.0), &tri, 7.0));
        // Apex.
        assert!(is_on_border(Point::new(50.0, 0.0), &tri, 7.0));
        assert!(!is_on_border(Point::new(50.0, 60.0), &tri, 7.0));
    }

    #[test]
    fn test_line_has_no_interior() {
        let line = shape(ShapeKind::Line, 0.0, 0.0, 100.0, 0.0);
        assert!(is_inside(Point::new(50.0, 5.0), &line, 7.0));
        assert!(!is_inside(Point::new(50.0, 20.0), &line, 7.0));
        let arrow = shape(ShapeKind::ArrowedLine, 0.0, 0.0, 100.0, 100.0);
        assert!(is_on_border(Point::new(50.0, 50.0), &arrow, 7.0));
    }

    #[test]
    fn test_freehand_border() {
        let stroke = CanvasElement::Freehand(FreehandElement::new(
            vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(20.0, 20.0)],
            StrokeOptions::default(),
        ));
        assert!(is_on_border(Point::new(10.0, 4.0), &stroke, 7.0));
        assert!(is_on_border(Point::new(25.0, 10.0), &stroke, 7.0));
        assert!(!is_inside(Point::new(5.0, 15.0), &stroke, 7.0));
    }
}
