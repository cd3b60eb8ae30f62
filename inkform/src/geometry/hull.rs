use std::cmp::Ordering;

use crate::model::Point;

use super::math::{cross, distance};

/// Graham scan. Returns hull vertices counter-clockwise starting at the lowest
/// (then leftmost) point. Inputs with fewer than three points come back unchanged.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut pivot_idx = 0;
    for (i, p) in points.iter().enumerate().skip(1) {
        let pv = points[pivot_idx];
        if p.y < pv.y || (p.y == pv.y && p.x < pv.x) {
            pivot_idx = i;
        }
    }
    let pivot = points[pivot_idx];
    let mut sorted: Vec<Point> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pivot_idx)
        .map(|(_, p)| *p)
        .collect();
    sorted.sort_by(|a, b| {
        let aa = (a.y - pivot.y).atan2(a.x - pivot.x);
        let ab = (b.y - pivot.y).atan2(b.x - pivot.x);
        aa.partial_cmp(&ab)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                distance(pivot, *a)
                    .partial_cmp(&distance(pivot, *b))
                    .unwrap_or(Ordering::Equal)
            })
    });

    let mut hull = vec![pivot, sorted[0]];
    for p in sorted.into_iter().skip(1) {
        while hull.len() > 1 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_with_interior_points() {
        let pts = vec![
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 0.0),
            Point::new(3.0, 7.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(
            hull,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn hull_is_counter_clockwise() {
        let pts: Vec<Point> = (0..12)
            .map(|i| {
                let a = i as f64 / 12.0 * std::f64::consts::TAU;
                Point::new(a.cos() * 10.0, a.sin() * 10.0)
            })
            .collect();
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 12);
        for i in 0..hull.len() {
            let o = hull[i];
            let a = hull[(i + 1) % hull.len()];
            let b = hull[(i + 2) % hull.len()];
            assert!(cross(o, a, b) > 0.0);
        }
    }

    #[test]
    fn tiny_inputs_pass_through() {
        let pts = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        assert_eq!(convex_hull(&pts), pts);
    }
}
