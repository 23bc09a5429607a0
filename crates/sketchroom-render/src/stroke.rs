//! Freehand stroke outline sampler.
//!
//! Turns the raw pointer samples of a pencil stroke into a closed outline
//! polygon whose width varies with simulated pressure, then into a smooth
//! fillable path.

use kurbo::{BezPath, Point, Vec2};
use sketchroom_core::shapes::StrokeOptions;

/// How quickly simulated pressure follows pointer speed.
const RATE_OF_PRESSURE_CHANGE: f64 = 0.275;
/// Vertices of the polygon drawn for a single-point stroke.
const DOT_SEGMENTS: usize = 16;

/// Outline polygon of a stroke through `points`: the left side in input
/// order followed by the right side reversed.
///
/// `streamline` pulls each sample toward the previous one, `smoothing` sets
/// the minimum spacing between kept samples, and `thinning` controls how
/// much fast movement (low simulated pressure) narrows the stroke.
pub fn stroke_outline(points: &[Point], options: &StrokeOptions) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let size = options.size;
    if size <= 0.0 {
        return Vec::new();
    }

    let samples = resample(first, &points[1..], options);
    if samples.len() == 1 {
        return dot(first, size / 2.0);
    }

    let mut left = Vec::with_capacity(samples.len());
    let mut right = Vec::with_capacity(samples.len());
    let mut pressure = 0.5;
    for (i, &p) in samples.iter().enumerate() {
        if i > 0 {
            let speed = (p.distance(samples[i - 1]) / size).min(1.0);
            pressure += (1.0 - speed - pressure) * speed * RATE_OF_PRESSURE_CHANGE;
            pressure = pressure.clamp(0.0, 1.0);
        }
        let radius = (size * (0.5 - options.thinning * (0.5 - pressure))).max(0.01);

        let before = samples[i.saturating_sub(1)];
        let after = samples[(i + 1).min(samples.len() - 1)];
        let normal = perpendicular(after - before);
        left.push(p + normal * radius);
        right.push(p - normal * radius);
    }

    left.extend(right.into_iter().rev());
    left
}

fn resample(first: Point, rest: &[Point], options: &StrokeOptions) -> Vec<Point> {
    let t = 0.15 + (1.0 - options.streamline.clamp(0.0, 1.0)) * 0.85;
    let min_spacing = options.size * options.smoothing.clamp(0.0, 1.0) * 0.25;

    let mut samples = vec![first];
    let mut cursor = first;
    for (i, &p) in rest.iter().enumerate() {
        cursor = cursor.lerp(p, t);
        let last = samples[samples.len() - 1];
        let distance = cursor.distance(last);
        let is_final = i + 1 == rest.len();
        if distance > 0.0 && (distance >= min_spacing || is_final) {
            samples.push(cursor);
        }
    }
    samples
}

/// Unit normal of `direction`; horizontal strokes get a vertical normal.
fn perpendicular(direction: Vec2) -> Vec2 {
    let length = direction.hypot();
    if length == 0.0 {
        return Vec2::new(0.0, 1.0);
    }
    Vec2::new(-direction.y / length, direction.x / length)
}

fn dot(center: Point, radius: f64) -> Vec<Point> {
    (0..DOT_SEGMENTS)
        .map(|i| {
            let angle = i as f64 / DOT_SEGMENTS as f64 * std::f64::consts::TAU;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

/// Smooth closed path through an outline polygon.
///
/// Starts with a quadratic from the first point through the second to the
/// midpoint of the second and third, then continues with smooth quadratics
/// (control point reflected from the previous one) to the midpoint of each
/// following pair. Outlines with fewer than four points give an empty path.
pub fn outline_path(outline: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if outline.len() < 4 {
        return path;
    }

    let (a, b, c) = (outline[0], outline[1], outline[2]);
    let mut current = b.midpoint(c);
    let mut control = b;
    path.move_to(a);
    path.quad_to(control, current);
    for pair in outline[2..].windows(2) {
        let target = pair[0].midpoint(pair[1]);
        control = current + (current - control);
        path.quad_to(control, target);
        current = target;
    }
    path.close_path();
    path
}
