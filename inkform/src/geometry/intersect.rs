// Exact intersections between idealized primitives: segments, circles and
// polygon boundaries (closed edge loops decomposed into segments).

use crate::model::{Point, ShapeDef};

use super::tolerance::{approx_eq, near_zero, EPS_DET, EPS_ROOT};

/// Parametric segment-segment intersection. Parallel or coincident segments
/// (|det| below tolerance) report no intersection.
pub fn segment_segment(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let (x1, y1, x2, y2) = (a0.x, a0.y, a1.x, a1.y);
    let (x3, y3, x4, y4) = (b0.x, b0.y, b1.x, b1.y);
    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if near_zero(denom, EPS_DET) {
        return None;
    }
    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1)))
    } else {
        None
    }
}

/// Segment-circle intersection: 0, 1 or 2 points ordered along the segment.
pub fn segment_circle(start: Point, end: Point, center: Point, radius: f64) -> Vec<Point> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let fx = start.x - center.x;
    let fy = start.y - center.y;
    let a = dx * dx + dy * dy;
    if a == 0.0 {
        return Vec::new();
    }
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    let t1 = (-b - sq) / (2.0 * a);
    let t2 = (-b + sq) / (2.0 * a);
    let mut out = Vec::with_capacity(2);
    let in_seg = |t: f64| (0.0..=1.0).contains(&t);
    if in_seg(t1) {
        out.push(Point::new(start.x + t1 * dx, start.y + t1 * dy));
    }
    if in_seg(t2) && !approx_eq(t1, t2, EPS_ROOT) {
        out.push(Point::new(start.x + t2 * dx, start.y + t2 * dy));
    }
    out
}

pub fn circle_circle(c1: Point, r1: f64, c2: Point, r2: f64) -> Vec<Point> {
    let dx = c2.x - c1.x;
    let dy = c2.y - c1.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d > r1 + r2 || d < (r1 - r2).abs() {
        return Vec::new();
    }
    // coincident circles: infinitely many points, report none
    if d < EPS_ROOT && approx_eq(r1, r2, EPS_ROOT) {
        return Vec::new();
    }
    if d == 0.0 {
        return Vec::new();
    }
    // signed distance from c1 to the radical line
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    if approx_eq(d, r1 + r2, EPS_ROOT) || approx_eq(d, (r1 - r2).abs(), EPS_ROOT) {
        return vec![Point::new(c1.x + (a / d) * dx, c1.y + (a / d) * dy)];
    }
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let px = c1.x + (a / d) * dx;
    let py = c1.y + (a / d) * dy;
    vec![
        Point::new(px + (h / d) * dy, py - (h / d) * dx),
        Point::new(px - (h / d) * dy, py + (h / d) * dx),
    ]
}

fn polygon_edges(vertices: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Intersection points between two shape definitions. Freeform shapes never intersect.
pub fn intersect(a: &ShapeDef, b: &ShapeDef) -> Vec<Point> {
    use ShapeDef::*;
    match (a, b) {
        (Freeform, _) | (_, Freeform) => Vec::new(),
        (Circle { center: c1, radius: r1 }, Circle { center: c2, radius: r2 }) => {
            circle_circle(*c1, *r1, *c2, *r2)
        }
        (Segment { start: s1, end: e1 }, Segment { start: s2, end: e2 }) => {
            segment_segment(*s1, *e1, *s2, *e2).into_iter().collect()
        }
        (Segment { start, end }, Circle { center, radius }) => {
            segment_circle(*start, *end, *center, *radius)
        }
        (Segment { start, end }, Polygon { vertices }) => polygon_edges(vertices)
            .filter_map(|(v1, v2)| segment_segment(*start, *end, v1, v2))
            .collect(),
        (Polygon { vertices: va }, Polygon { vertices: vb }) => {
            let mut out = Vec::new();
            for (a1, a2) in polygon_edges(va) {
                for (b1, b2) in polygon_edges(vb) {
                    if let Some(p) = segment_segment(a1, a2, b1, b2) {
                        out.push(p);
                    }
                }
            }
            out
        }
        (Circle { center, radius }, Polygon { vertices }) => polygon_edges(vertices)
            .flat_map(|(v1, v2)| segment_circle(v1, v2, *center, *radius))
            .collect(),
        (Circle { .. }, Segment { .. })
        | (Polygon { .. }, Segment { .. })
        | (Polygon { .. }, Circle { .. }) => intersect(b, a),
    }
}
