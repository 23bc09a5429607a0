//! Hand-drawn primitive builder.
//!
//! Shapes are turned into sketchy stroke paths by a seeded generator, so the
//! same frame and style always produce the same primitives. Every shape yields
//! a non-empty ordered list of primitives; an arrow is a shaft plus two wings.

use crate::geometry::{Frame, circle_params, rect_corners, triangle_vertices};
use crate::shapes::ShapeKind;
use kurbo::{BezPath, PathEl, Point, Shape as _};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Fixed style configuration for the primitive builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoughStyle {
    /// Generator seed. Shared by every element so rebuilt primitives match.
    pub seed: u32,
    /// 0 = clean, 1 = slight wobble, 2 = very sketchy.
    pub roughness: f64,
    /// How far line midpoints bow away from the straight path.
    pub bowing: f64,
    pub stroke_width: f64,
    /// Maximum random displacement of a vertex or control point.
    pub max_randomness_offset: f64,
    /// Keep path vertices exactly where the geometry puts them.
    pub preserve_vertices: bool,
    pub stroke_color: SerializableColor,
    pub arrow_head_length: f64,
    /// Half-angle between the shaft and each arrow wing, in radians.
    pub arrow_head_spread: f64,
}

impl Default for RoughStyle {
    fn default() -> Self {
        Self {
            seed: 1,
            roughness: 1.0,
            bowing: 1.5,
            stroke_width: 1.5,
            max_randomness_offset: 1.0,
            preserve_vertices: true,
            stroke_color: SerializableColor::black(),
            arrow_head_length: 20.0,
            arrow_head_spread: std::f64::consts::FRAC_PI_6,
        }
    }
}

impl RoughStyle {
    /// Style used to preview elements about to be erased.
    pub fn deletion(&self) -> Self {
        Self {
            stroke_color: SerializableColor::new(0, 0, 0, 77),
            stroke_width: 2.0,
            ..self.clone()
        }
    }
}

/// One hand-drawn stroke outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub path: BezPath,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
}

impl Primitive {
    /// Final point of the path, if any.
    pub fn end_point(&self) -> Option<Point> {
        self.path.elements().iter().rev().find_map(|el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(*p),
            PathEl::QuadTo(_, p) => Some(*p),
            PathEl::CurveTo(_, _, p) => Some(*p),
            PathEl::ClosePath => None,
        })
    }
}

/// Non-empty ordered list of primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitives(Vec<Primitive>);

impl Primitives {
    fn single(primitive: Primitive) -> Self {
        Self(vec![primitive])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: every builder yields at least one primitive.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &Primitive {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Primitive] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Primitives {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Simple seeded random number generator (xorshift32).
struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [-1, 1]
    fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Random offset scaled by amount
    fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }
}

fn wobble(p: Point, amount: f64, rng: &mut SimpleRng) -> Point {
    Point::new(p.x + rng.offset(amount), p.y + rng.offset(amount))
}

/// Apply the hand-drawn effect to a clean path.
///
/// Lines become bowed quadratics. Vertices are displaced only when
/// `preserve_vertices` is off; curve control points always wobble.
fn sketch(path: &BezPath, style: &RoughStyle, stroke_index: u32) -> BezPath {
    if style.roughness <= 0.0 {
        return path.clone();
    }

    let jitter = style.max_randomness_offset * style.roughness;
    let vertex_jitter = if style.preserve_vertices { 0.0 } else { jitter };
    let mut rng = SimpleRng::new(style.seed.wrapping_add(stroke_index.wrapping_mul(99991)));
    let mut result = BezPath::new();
    let mut last_point = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(wobble(p, vertex_jitter, &mut rng));
                last_point = p;
            }
            PathEl::LineTo(p) => {
                let d = p - last_point;
                let len = d.hypot();
                let bow = rng.offset(style.bowing * style.roughness * len / 200.0);
                let perp = if len > 1e-3 {
                    kurbo::Vec2::new(-d.y / len, d.x / len)
                } else {
                    kurbo::Vec2::ZERO
                };
                let control = last_point.midpoint(p) + perp * bow;
                result.quad_to(control, wobble(p, vertex_jitter, &mut rng));
                last_point = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(wobble(p1, jitter * 0.7, &mut rng), wobble(p2, vertex_jitter, &mut rng));
                last_point = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    wobble(p1, jitter * 0.5, &mut rng),
                    wobble(p2, jitter * 0.5, &mut rng),
                    wobble(p3, vertex_jitter, &mut rng),
                );
                last_point = p3;
            }
            PathEl::ClosePath => result.close_path(),
        }
    }

    result
}

/// Double-stroke a clean path into one primitive.
fn rough_primitive(clean: &BezPath, style: &RoughStyle) -> Primitive {
    let mut path = sketch(clean, style, 0);
    path.extend(sketch(clean, style, 1).elements().iter().copied());
    Primitive {
        path,
        stroke_color: style.stroke_color,
        stroke_width: style.stroke_width,
    }
}

fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        if closed {
            path.line_to(*first);
        }
    }
    path
}

/// Wing start points of an arrow head ending at `end`.
pub fn arrow_wings(start: Point, end: Point, style: &RoughStyle) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let len = style.arrow_head_length;
    let spread = style.arrow_head_spread;
    [
        Point::new(end.x - len * (angle - spread).cos(), end.y - len * (angle - spread).sin()),
        Point::new(end.x - len * (angle + spread).cos(), end.y - len * (angle + spread).sin()),
    ]
}

/// Build the hand-drawn primitives for a shape.
///
/// Pure and deterministic: identical inputs give identical paths.
pub fn build_primitives(kind: ShapeKind, frame: &Frame, style: &RoughStyle) -> Primitives {
    match kind {
        ShapeKind::Square => Primitives::single(rough_primitive(&polyline(&rect_corners(frame), true), style)),
        ShapeKind::Triangle => {
            Primitives::single(rough_primitive(&polyline(&triangle_vertices(frame), true), style))
        }
        ShapeKind::Circle => {
            let (center, radius) = circle_params(frame);
            let clean = kurbo::Circle::new(center, radius).to_path(0.1);
            Primitives::single(rough_primitive(&clean, style))
        }
        ShapeKind::Line => {
            Primitives::single(rough_primitive(&polyline(&[frame.origin(), frame.end()], false), style))
        }
        ShapeKind::ArrowedLine => {
            let (start, end) = (frame.origin(), frame.end());
            let [wing1, wing2] = arrow_wings(start, end, style);
            Primitives(vec![
                rough_primitive(&polyline(&[start, end], false), style),
                rough_primitive(&polyline(&[wing1, end], false), style),
                rough_primitive(&polyline(&[wing2, end], false), style),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
        Frame::new(x, y, w, h)
    }

    #[test]
    fn test_deterministic() {
        let style = RoughStyle::default();
        for kind in [
            ShapeKind::Square,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Line,
            ShapeKind::ArrowedLine,
        ] {
            let a = build_primitives(kind, &frame(10.0, 20.0, 130.0, -45.0), &style);
            let b = build_primitives(kind, &frame(10.0, 20.0, 130.0, -45.0), &style);
            assert_eq!(a, b, "{kind:?}");
        }
    }

    #[test]
    fn test_arrow_decomposition() {
        let style = RoughStyle::default();
        let prims = build_primitives(ShapeKind::ArrowedLine, &frame(0.0, 0.0, 100.0, 0.0), &style);
        assert_eq!(prims.len(), 3);
        for wing in &prims.as_slice()[1..] {
            let end = wing.end_point().unwrap();
            assert!((end.x - 100.0).abs() < 1e-12 && end.y.abs() < 1e-12, "{end:?}");
        }
    }

    #[test]
    fn test_arrow_wing_geometry() {
        let style = RoughStyle::default();
        let [w1, w2] = arrow_wings(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &style);
        let half = std::f64::consts::FRAC_PI_6;
        assert!((w1.x - (100.0 - 20.0 * half.cos())).abs() < 1e-9);
        assert!((w1.y - 20.0 * half.sin()).abs() < 1e-9);
        assert!((w2.y + 20.0 * half.sin()).abs() < 1e-9);
        assert!((Point::new(100.0, 0.0).distance(w1) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_primitive_shapes() {
        let style = RoughStyle::default();
        for kind in [ShapeKind::Square, ShapeKind::Circle, ShapeKind::Triangle, ShapeKind::Line] {
            let prims = build_primitives(kind, &frame(0.0, 0.0, 50.0, 50.0), &style);
            assert_eq!(prims.len(), 1);
            assert!(!prims.is_empty());
        }
        // Degenerate frames still yield a primitive.
        assert!(!build_primitives(ShapeKind::Square, &frame(5.0, 5.0, 0.0, 0.0), &style).is_empty());
    }

    #[test]
    fn test_preserved_vertices() {
        let style = RoughStyle::default();
        let prims = build_primitives(ShapeKind::Line, &frame(5.0, 5.0, 40.0, 30.0), &style);
        let first = prims.first();
        assert_eq!(first.path.elements()[0], PathEl::MoveTo(Point::new(5.0, 5.0)));
        assert_eq!(first.end_point(), Some(Point::new(45.0, 35.0)));
    }

    #[test]
    fn test_deletion_style() {
        let style = RoughStyle::default();
        let deletion = style.deletion();
        assert_eq!(deletion.seed, style.seed);
        assert_eq!(deletion.stroke_color, SerializableColor::new(0, 0, 0, 77));
        assert!((deletion.stroke_width - 2.0).abs() < f64::EPSILON);
        let normal = build_primitives(ShapeKind::Square, &frame(0.0, 0.0, 10.0, 10.0), &style);
        let faded = build_primitives(ShapeKind::Square, &frame(0.0, 0.0, 10.0, 10.0), &deletion);
        assert_eq!(normal.first().path, faded.first().path);
    }

    #[test]
    fn test_zero_roughness_is_clean() {
        let style = RoughStyle {
            roughness: 0.0,
            ..RoughStyle::default()
        };
        let prims = build_primitives(ShapeKind::Line, &frame(0.0, 0.0, 10.0, 0.0), &style);
        let els = prims.first().path.elements().to_vec();
        assert_eq!(
            els,
            vec![
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 0.0)),
            ]
        );
    }
}
