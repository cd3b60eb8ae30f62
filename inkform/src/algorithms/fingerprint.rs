use crate::config::EngineConfig;
use crate::geometry::bounds::bounds;
use crate::geometry::corners::{analyze_corner_angles, count_corners_with};
use crate::geometry::stroke::{closure_distance, is_closed, straightness};
use crate::model::{CornerPoint, Fingerprint, Point};

pub fn extract_fingerprint(points: &[Point]) -> Fingerprint {
    extract_fingerprint_with(points, &EngineConfig::default())
}

/// Total: degenerate strokes produce zero-valued fields, never an error.
pub fn extract_fingerprint_with(points: &[Point], config: &EngineConfig) -> Fingerprint {
    let b = bounds(points);
    let (w, h) = (b.width(), b.height());
    let cd = count_corners_with(points, &config.corners);
    let angle_analysis = analyze_corner_angles(&cd.angles);
    Fingerprint {
        aspect_ratio: if h == 0.0 { 1.0 } else { w / h },
        straightness: straightness(points),
        is_closed: is_closed(points, config.closure_threshold),
        closure_distance: closure_distance(points),
        bounds: b,
        size: w.max(h),
        corners: cd.count,
        tip: sharpest(&cd.corners).map(|c| c.point()),
        corner_angles: cd.angles,
        corner_data: cd.corners,
        angle_analysis,
        point_count: points.len(),
    }
}

/// Corner with the smallest recorded angle; the earliest wins ties.
pub fn sharpest(corners: &[CornerPoint]) -> Option<&CornerPoint> {
    let mut best: Option<&CornerPoint> = None;
    for c in corners {
        match best {
            Some(b) if c.angle >= b.angle => {}
            _ => best = Some(c),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stroke_is_all_zero() {
        let fp = extract_fingerprint(&[]);
        assert_eq!(fp.point_count, 0);
        assert_eq!(fp.size, 0.0);
        assert_eq!(fp.aspect_ratio, 1.0);
        assert_eq!(fp.closure_distance, 0.0);
        assert_eq!(fp.corners, 0);
        assert!(!fp.is_closed);
        assert!(fp.tip.is_none());
    }

    #[test]
    fn horizontal_line_keeps_unit_aspect() {
        let pts: Vec<Point> = (0..20).map(|i| Point::new(i as f64 * 5.0, 0.0)).collect();
        let fp = extract_fingerprint(&pts);
        assert_eq!(fp.aspect_ratio, 1.0);
        assert_eq!(fp.size, 95.0);
        assert!((fp.straightness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tip_prefers_sharpest_then_first() {
        let c = |index, angle| CornerPoint { index, angle, x: index as f64, y: 0.0 };
        let corners = [c(4, 2.0), c(40, 1.1), c(80, 1.1), c(120, 1.9)];
        assert_eq!(sharpest(&corners).map(|c| c.index), Some(40));
        assert_eq!(sharpest(&corners[2..]).map(|c| c.index), Some(80));
        assert!(sharpest(&[]).is_none());
    }
}
