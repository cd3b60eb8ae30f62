use crate::model::{Bounds, Point};

/// Axis-aligned bounds of a stroke. An empty stroke yields the zero box.
pub fn bounds(points: &[Point]) -> Bounds {
    if points.is_empty() {
        return Bounds::default();
    }
    let mut b = Bounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for p in points {
        if p.x < b.min_x { b.min_x = p.x; }
        if p.x > b.max_x { b.max_x = p.x; }
        if p.y < b.min_y { b.min_y = p.y; }
        if p.y > b.max_y { b.max_y = p.y; }
    }
    b
}

/// Boxes overlap unless separated on an axis; shared edges count as overlap.
pub fn overlap(a: &Bounds, b: &Bounds) -> bool {
    !(a.max_x < b.min_x || b.max_x < a.min_x || a.max_y < b.min_y || b.max_y < a.min_y)
}

/// Inclusive containment of `inner` in `outer`.
pub fn contain(outer: &Bounds, inner: &Bounds) -> bool {
    inner.min_x >= outer.min_x
        && inner.max_x <= outer.max_x
        && inner.min_y >= outer.min_y
        && inner.max_y <= outer.max_y
}

/// Gap between two boxes: per-axis separation combined euclidean, 0 when overlapping.
pub fn box_distance(a: &Bounds, b: &Bounds) -> f64 {
    let horiz = if b.min_x > a.max_x { b.min_x - a.max_x } else { a.min_x - b.max_x }.max(0.0);
    let vert = if b.min_y > a.max_y { b.min_y - a.max_y } else { a.min_y - b.max_y }.max(0.0);
    (horiz * horiz + vert * vert).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Bounds {
        Bounds { min_x, max_x, min_y, max_y }
    }

    #[test]
    fn empty_stroke_has_zero_bounds() {
        assert_eq!(bounds(&[]), Bounds::default());
    }

    #[test]
    fn bounds_reduce_min_max() {
        let b = bounds(&[Point::new(3.0, -1.0), Point::new(-2.0, 4.0), Point::new(1.0, 1.0)]);
        assert_eq!(b, bx(-2.0, 3.0, -1.0, 4.0));
    }

    #[test]
    fn touching_edges_overlap() {
        assert!(overlap(&bx(0.0, 10.0, 0.0, 10.0), &bx(10.0, 20.0, 0.0, 10.0)));
        assert!(!overlap(&bx(0.0, 10.0, 0.0, 10.0), &bx(10.5, 20.0, 0.0, 10.0)));
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = bx(0.0, 100.0, 0.0, 100.0);
        assert!(contain(&outer, &outer));
        assert!(contain(&outer, &bx(10.0, 20.0, 10.0, 20.0)));
        assert!(!contain(&outer, &bx(90.0, 110.0, 10.0, 20.0)));
    }

    #[test]
    fn box_distance_combines_axes() {
        assert_eq!(box_distance(&bx(0.0, 10.0, 0.0, 10.0), &bx(5.0, 15.0, 5.0, 15.0)), 0.0);
        assert_eq!(box_distance(&bx(0.0, 10.0, 0.0, 10.0), &bx(13.0, 20.0, 0.0, 10.0)), 3.0);
        let d = box_distance(&bx(0.0, 10.0, 0.0, 10.0), &bx(13.0, 20.0, 14.0, 20.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
