//! Idealized geometry for accepted built-in shapes, the geometric `Shape`
//! definitions used by the intersection kernel, and the stroke clean-up
//! pipeline run on stroke completion.

use std::f64::consts::TAU;

use crate::config::RefinementSettings;
use crate::geometry::bounds::bounds;
use crate::geometry::corners::count_corners;
use crate::geometry::math::{farthest_from, farthest_from_segment};
use crate::geometry::stroke::{normalize, simplify, smooth};
use crate::geometry::tolerance::CIRCLE_SEGMENTS;
use crate::model::{Bounds, CornerPoint, Fingerprint, Point, RefinedGeometry, Shape, ShapeDef, ShapeType};

/// Refines a stroke accepted as `accepted`. Types without a refinement and
/// empty strokes give `None`. Corner data comes from `fp` when given.
pub fn refine(points: &[Point], accepted: &str, fp: Option<&Fingerprint>) -> Option<RefinedGeometry> {
    if points.is_empty() {
        return None;
    }
    let shape = ShapeType::parse(accepted)?;
    match shape {
        ShapeType::Circle => Some(RefinedGeometry::Polyline(refine_circle(&bounds(points)))),
        ShapeType::Line => Some(RefinedGeometry::Polyline(vec![points[0], points[points.len() - 1]])),
        ShapeType::Rectangle => Some(RefinedGeometry::Segments(refine_rectangle(points, &corners_of(points, fp)))),
        ShapeType::Triangle => Some(RefinedGeometry::Segments(refine_triangle(points, &corners_of(points, fp)))),
        ShapeType::Arc => None,
    }
}

fn corners_of(points: &[Point], fp: Option<&Fingerprint>) -> Vec<CornerPoint> {
    let corners = match fp {
        Some(fp) => fp.corner_data.clone(),
        None => count_corners(points).corners,
    };
    corners.into_iter().filter(|c| c.index < points.len()).collect()
}

/// Indices of the `k` corners with the smallest angles, in stroke order.
fn sharpest_indices(corners: &[CornerPoint], k: usize) -> Vec<usize> {
    let mut by_angle: Vec<&CornerPoint> = corners.iter().collect();
    by_angle.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    let mut idx: Vec<usize> = by_angle.into_iter().take(k).map(|c| c.index).collect();
    idx.sort_unstable();
    idx
}

fn closed_loop(vertices: &[Point]) -> Vec<[Point; 2]> {
    let n = vertices.len();
    (0..n).map(|i| [vertices[i], vertices[(i + 1) % n]]).collect()
}

fn refine_circle(b: &Bounds) -> Vec<Point> {
    let c = b.center();
    let r = (b.width() / 2.0 + b.height() / 2.0) / 2.0;
    (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let a = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
            Point::new(c.x + a.cos() * r, c.y + a.sin() * r)
        })
        .collect()
}

fn refine_rectangle(points: &[Point], corners: &[CornerPoint]) -> Vec<[Point; 2]> {
    if corners.len() < 3 {
        return closed_loop(&bounds(points).corners());
    }
    let mut idx = sharpest_indices(corners, 4);
    if idx.len() == 3 {
        let extra = if idx.contains(&0) { points.len() - 1 } else { 0 };
        idx.push(extra);
        idx.sort_unstable();
    }
    let vertices: Vec<Point> = idx.iter().map(|&i| points[i]).collect();
    closed_loop(&vertices)
}

fn refine_triangle(points: &[Point], corners: &[CornerPoint]) -> Vec<[Point; 2]> {
    let last = points.len() - 1;
    let mut idx = if corners.len() >= 2 { sharpest_indices(corners, 3) } else { Vec::new() };
    if idx.is_empty() && corners.len() == 1 {
        let c = corners[0].index;
        idx = vec![0, c, farthest_from(points, points[c])];
        idx.sort_unstable();
    }
    match idx.len() {
        0 => {
            // farthest-point triangle
            let p1 = points[0];
            let p2 = points[farthest_from(points, p1)];
            let p3 = points[farthest_from_segment(points, p1, p2)];
            vec![[p1, p2], [p2, p3], [p3, p1]]
        }
        2 => {
            let extra = if !idx.contains(&0) {
                0
            } else if !idx.contains(&last) {
                last
            } else {
                points.len() / 2
            };
            idx.push(extra);
            idx.sort_unstable();
            closed_loop(&idx.iter().map(|&i| points[i]).collect::<Vec<_>>())
        }
        _ => closed_loop(&idx.iter().map(|&i| points[i]).collect::<Vec<_>>()),
    }
}

/// Geometric definition of an accepted stroke for intersection tests.
pub fn build_shape(
    points: &[Point],
    accepted: &str,
    refined: Option<&RefinedGeometry>,
    b: &Bounds,
    fp: Option<&Fingerprint>,
) -> Shape {
    let shape = ShapeType::parse(accepted);
    let definition = match shape {
        Some(ShapeType::Line) => {
            let stroke = match refined {
                Some(RefinedGeometry::Polyline(pts)) if !pts.is_empty() => pts.as_slice(),
                _ => points,
            };
            match (stroke.first(), stroke.last()) {
                (Some(s), Some(e)) => ShapeDef::Segment { start: *s, end: *e },
                _ => ShapeDef::Freeform,
            }
        }
        Some(ShapeType::Circle) => ShapeDef::Circle {
            center: b.center(),
            radius: (b.width() / 2.0 + b.height() / 2.0) / 2.0,
        },
        Some(ShapeType::Rectangle) | Some(ShapeType::Triangle) => ShapeDef::Polygon {
            vertices: polygon_vertices(refined, b, fp),
        },
        Some(ShapeType::Arc) | None => ShapeDef::Freeform,
    };
    Shape {
        kind: accepted.to_string(),
        label: shape.map_or_else(|| accepted.to_string(), |s| s.label().to_string()),
        bounds: *b,
        definition,
    }
}

fn polygon_vertices(refined: Option<&RefinedGeometry>, b: &Bounds, fp: Option<&Fingerprint>) -> Vec<Point> {
    if let Some(RefinedGeometry::Segments(segs)) = refined {
        let mut out: Vec<Point> = Vec::with_capacity(segs.len());
        for p in segs.iter().flatten() {
            if !out.contains(p) {
                out.push(*p);
            }
        }
        return out;
    }
    match fp {
        Some(fp) if !fp.corner_data.is_empty() => fp.corner_data.iter().map(|c| c.point()).collect(),
        _ => b.corners().to_vec(),
    }
}

/// Smooth, simplify and normalize a raw stroke per `settings`; `None` when disabled.
pub fn apply_refinement(points: &[Point], settings: &RefinementSettings) -> Option<Vec<Point>> {
    if !settings.enabled {
        return None;
    }
    let mut out = points.to_vec();
    if settings.smooth > 0 {
        out = smooth(&out, settings.smooth);
    }
    if settings.simplify > 0.0 {
        out = simplify(&out, settings.simplify);
    }
    if settings.normalize {
        out = normalize(&out, settings.normalize_size);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point { Point::new(x, y) }

    fn corner(index: usize, angle: f64, pts: &[Point]) -> CornerPoint {
        CornerPoint { index, angle, x: pts[index].x, y: pts[index].y }
    }

    #[test]
    fn unknown_types_and_empty_strokes_are_not_refined() {
        assert!(refine(&[], "circle", None).is_none());
        assert!(refine(&[p(0.0, 0.0)], "arc", None).is_none());
        assert!(refine(&[p(0.0, 0.0)], "my-star", None).is_none());
    }

    #[test]
    fn line_keeps_endpoints() {
        let pts = vec![p(0.0, 0.0), p(5.0, 2.0), p(10.0, 0.0)];
        assert_eq!(refine(&pts, "line", None), Some(RefinedGeometry::Polyline(vec![p(0.0, 0.0), p(10.0, 0.0)])));
    }

    #[test]
    fn circle_is_closed_sampled_polyline() {
        let pts = vec![p(0.0, 0.0), p(100.0, 0.0), p(100.0, 60.0)];
        let Some(RefinedGeometry::Polyline(c)) = refine(&pts, "circle", None) else { panic!() };
        assert_eq!(c.len(), 61);
        assert!((c[0].x - 90.0).abs() < 1e-9 && (c[0].y - 30.0).abs() < 1e-9);
        assert!((c[60].x - c[0].x).abs() < 1e-9 && (c[60].y - c[0].y).abs() < 1e-9);
    }

    #[test]
    fn rectangle_without_corners_uses_bbox() {
        let pts = vec![p(0.0, 0.0), p(10.0, 5.0), p(20.0, 30.0)];
        let Some(RefinedGeometry::Segments(s)) = refine(&pts, "rectangle", None) else { panic!() };
        assert_eq!(s.len(), 4);
        assert_eq!(s[0], [p(0.0, 0.0), p(20.0, 0.0)]);
        assert_eq!(s[3], [p(0.0, 30.0), p(0.0, 0.0)]);
    }

    #[test]
    fn rectangle_with_three_corners_adds_start() {
        let pts: Vec<Point> = (0..100).map(|i| p(i as f64, (i % 7) as f64)).collect();
        let corners = vec![corner(20, 1.5, &pts), corner(50, 1.6, &pts), corner(80, 1.4, &pts)];
        let segs = refine_rectangle(&pts, &corners);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0][0], pts[0]);
        assert_eq!(segs[1][0], pts[20]);
        assert_eq!(segs[3][1], pts[0]);
    }

    #[test]
    fn rectangle_with_three_corners_from_start_adds_end() {
        let pts: Vec<Point> = (0..100).map(|i| p(i as f64, (i % 7) as f64)).collect();
        let corners = vec![corner(0, 1.5, &pts), corner(50, 1.6, &pts), corner(80, 1.4, &pts)];
        let segs = refine_rectangle(&pts, &corners);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[2], [pts[80], pts[99]]);
        assert_eq!(segs[3], [pts[99], pts[0]]);
    }

    #[test]
    fn triangle_keeps_three_sharpest() {
        let pts: Vec<Point> = (0..100).map(|i| p(i as f64, 0.0)).collect();
        let corners = vec![
            corner(10, 1.2, &pts),
            corner(40, 2.0, &pts),
            corner(60, 1.1, &pts),
            corner(90, 2.1, &pts),
        ];
        let segs = refine_triangle(&pts, &corners);
        assert_eq!(segs, vec![[pts[10], pts[40]], [pts[40], pts[60]], [pts[60], pts[10]]]);
    }

    #[test]
    fn triangle_with_two_corners_fills_from_start_then_end() {
        let pts: Vec<Point> = (0..50).map(|i| p(i as f64, (i * i) as f64)).collect();
        let segs = refine_triangle(&pts, &[corner(10, 1.2, &pts), corner(30, 1.3, &pts)]);
        assert_eq!(segs[0][0], pts[0]);
        let segs = refine_triangle(&pts, &[corner(0, 1.2, &pts), corner(30, 1.3, &pts)]);
        assert_eq!(segs[2][0], pts[49]);
        let segs = refine_triangle(&pts, &[corner(0, 1.2, &pts), corner(49, 1.3, &pts)]);
        assert_eq!(segs[1][0], pts[25]);
    }

    #[test]
    fn triangle_with_no_corners_uses_farthest_points() {
        let pts = vec![p(0.0, 0.0), p(4.0, 1.0), p(10.0, 0.0), p(5.0, 8.0), p(1.0, 1.0)];
        let segs = refine_triangle(&pts, &[]);
        assert_eq!(segs, vec![[p(0.0, 0.0), p(10.0, 0.0)], [p(10.0, 0.0), p(5.0, 8.0)], [p(5.0, 8.0), p(0.0, 0.0)]]);
    }

    #[test]
    fn polygon_shape_dedupes_segment_endpoints() {
        let segs = closed_loop(&[p(0.0, 0.0), p(10.0, 0.0), p(5.0, 8.0)]);
        let refined = RefinedGeometry::Segments(segs);
        let b = Bounds { min_x: 0.0, max_x: 10.0, min_y: 0.0, max_y: 8.0 };
        let shape = build_shape(&[], "triangle", Some(&refined), &b, None);
        assert_eq!(shape.label, "Triangle");
        assert_eq!(shape.definition, ShapeDef::Polygon { vertices: vec![p(0.0, 0.0), p(10.0, 0.0), p(5.0, 8.0)] });
    }

    #[test]
    fn user_primitive_shape_is_freeform() {
        let b = Bounds::default();
        let shape = build_shape(&[p(1.0, 1.0)], "my-star", None, &b, None);
        assert_eq!(shape.definition, ShapeDef::Freeform);
        assert_eq!(shape.label, "my-star");
    }

    #[test]
    fn disabled_pipeline_yields_nothing() {
        let s = RefinementSettings { enabled: false, ..Default::default() };
        assert!(apply_refinement(&[p(0.0, 0.0)], &s).is_none());
        let on = RefinementSettings { smooth: 0, simplify: 0.0, ..Default::default() };
        assert_eq!(apply_refinement(&[p(0.0, 0.0), p(1.0, 1.0)], &on), Some(vec![p(0.0, 0.0), p(1.0, 1.0)]));
    }
}
