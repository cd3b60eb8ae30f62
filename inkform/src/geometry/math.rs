use crate::model::Point;

use super::tolerance::clamp01;

#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Squared distance from `p` to segment `a-b` and the clamped projection parameter.
pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let t = if vv > 0.0 { clamp01((wx*vx + wy*vy) / vv) } else { 0.0 };
    let dx = p.x - (a.x + t * vx); let dy = p.y - (a.y + t * vy);
    (dx*dx + dy*dy, t)
}

/// Distance from `p` to the segment `a-b` (point distance when the segment is degenerate).
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    seg_distance_sq(p, a, b).0.sqrt()
}

pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

#[inline]
pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Index of the point farthest from `from`; first index wins ties.
pub fn farthest_from(points: &[Point], from: Point) -> usize {
    let mut best = 0usize;
    let mut best_d = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let d = distance(*p, from);
        if d > best_d { best_d = d; best = i; }
    }
    best
}

/// Index of the point farthest from segment `a-b`; first index wins ties.
pub fn farthest_from_segment(points: &[Point], a: Point, b: Point) -> usize {
    let mut best = 0usize;
    let mut best_d = 0.0f64;
    for (i, p) in points.iter().enumerate() {
        let d = perpendicular_distance(*p, a, b);
        if d > best_d { best_d = d; best = i; }
    }
    best
}
