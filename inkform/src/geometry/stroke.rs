//! Whole-stroke measures and manipulations: straightness, closure, overshoot,
//! Chaikin smoothing, Douglas–Peucker simplification and size normalization.

use crate::model::Point;

use super::bounds::bounds;
use super::math::{distance, path_length, perpendicular_distance};
use super::tolerance::{
    CLOSURE_MIN_POINTS, CLOSURE_RELATIVE_GAP, OVERSHOOT_MIN_POINTS, OVERSHOOT_TAIL_START,
};

/// Chord length over path length, in [0, 1]. Zero for degenerate strokes.
pub fn straightness(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let path = path_length(points);
    if path == 0.0 {
        return 0.0;
    }
    distance(points[0], points[points.len() - 1]) / path
}

/// Start-end gap of a stroke; zero when empty.
pub fn closure_distance(points: &[Point]) -> f64 {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => distance(*a, *b),
        _ => 0.0,
    }
}

/// A stroke is closed when its start-end gap is within `threshold`, or below
/// 20% of its larger bounding dimension.
pub fn is_closed(points: &[Point], threshold: f64) -> bool {
    if points.len() < CLOSURE_MIN_POINTS {
        return false;
    }
    let gap = closure_distance(points);
    if gap <= threshold {
        return true;
    }
    let b = bounds(points);
    let size = b.width().max(b.height());
    let relative = if size > 0.0 { gap / size } else { 1.0 };
    relative < CLOSURE_RELATIVE_GAP
}

/// True when the tail (last 30%) of the stroke passes within `threshold` of its start.
pub fn has_overshoot(points: &[Point], threshold: f64) -> bool {
    if points.len() < OVERSHOOT_MIN_POINTS {
        return false;
    }
    let start = points[0];
    let tail = (points.len() as f64 * OVERSHOOT_TAIL_START).floor() as usize;
    points[tail..].iter().any(|p| distance(*p, start) < threshold)
}

/// Chaikin corner cutting. Endpoints are pinned to the original stroke.
pub fn smooth(points: &[Point], iterations: u32) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut cur = points.to_vec();
    for _ in 0..iterations {
        let mut next = Vec::with_capacity(cur.len() * 2 + 2);
        next.push(cur[0]);
        for w in cur.windows(2) {
            let (p1, p2) = (w[0], w[1]);
            next.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            next.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }
        next.push(cur[cur.len() - 1]);
        cur = next;
    }
    let last = cur.len() - 1;
    cur[0] = points[0];
    cur[last] = points[points.len() - 1];
    cur
}

/// Douglas–Peucker simplification with a perpendicular-distance tolerance.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    douglas_peucker(points, tolerance)
}

fn douglas_peucker(pts: &[Point], tol: f64) -> Vec<Point> {
    if pts.len() < 3 {
        return pts.to_vec();
    }
    let start = pts[0];
    let end = pts[pts.len() - 1];
    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, p) in pts.iter().enumerate().take(pts.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, start, end);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }
    if max_dist > tol {
        let mut left = douglas_peucker(&pts[..=max_index], tol);
        let right = douglas_peucker(&pts[max_index..], tol);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![start, end]
    }
}

/// Scale about the bounding-box center so the larger dimension equals `target_size`.
pub fn normalize(points: &[Point], target_size: f64) -> Vec<Point> {
    let b = bounds(points);
    let max_dim = b.width().max(b.height());
    if points.is_empty() || max_dim == 0.0 {
        return points.to_vec();
    }
    let scale = target_size / max_dim;
    let c = b.center();
    points
        .iter()
        .map(|p| Point::new((p.x - c.x) * scale + c.x, (p.y - c.y) * scale + c.y))
        .collect()
}
