use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

use serde::{Deserialize, Serialize};

use crate::model::{AngleAnalysis, CornerData, CornerPoint, Point};

use super::tolerance::{clamp, CORNER_ANGLE, CORNER_MERGE_GAP, CORNER_MIN_POINTS, CORNER_STRIDE, CORNER_WINDOW};

/// Corner detection parameters. Defaults are the recognizer's fixed values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerParams {
    pub min_points: usize,
    pub window: usize,
    pub stride: usize,
    pub angle_threshold: f64,
    pub merge_gap: usize,
}

impl Default for CornerParams {
    fn default() -> Self {
        CornerParams {
            min_points: CORNER_MIN_POINTS,
            window: CORNER_WINDOW,
            stride: CORNER_STRIDE,
            angle_threshold: CORNER_ANGLE,
            merge_gap: CORNER_MERGE_GAP,
        }
    }
}

pub fn count_corners(points: &[Point]) -> CornerData {
    count_corners_with(points, &CornerParams::default())
}

/// Sampled turn-angle corner detector.
///
/// Every `stride` points (starting at `window`) the direction coming into the
/// sample over `window` points is compared with the direction leaving it. Turns
/// sharper than `angle_threshold` are candidates; a candidate within
/// `merge_gap` indices of the last kept corner replaces it only if it turns more.
pub fn count_corners_with(points: &[Point], params: &CornerParams) -> CornerData {
    let w = params.window;
    if points.len() < params.min_points || points.len() < 2 * w + 1 {
        return CornerData::default();
    }
    let mut kept: Vec<(usize, f64)> = Vec::new();
    let mut i = w;
    while i < points.len() - w {
        if let Some(angle) = turn_angle(points[i - w], points[i], points[i + w]) {
            if angle > params.angle_threshold {
                match kept.last_mut() {
                    Some(last) if i - last.0 <= params.merge_gap => {
                        if angle > last.1 {
                            *last = (i, angle);
                        }
                    }
                    _ => kept.push((i, angle)),
                }
            }
        }
        i += params.stride.max(1);
    }
    let corners: Vec<CornerPoint> = kept
        .iter()
        .map(|&(index, angle)| CornerPoint { index, angle, x: points[index].x, y: points[index].y })
        .collect();
    CornerData {
        count: corners.len(),
        angles: corners.iter().map(|c| c.angle).collect(),
        corners,
    }
}

// Angle between (b - a) and (c - b); None when either vector is degenerate.
fn turn_angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (ax, ay) = (c.x - b.x, c.y - b.y);
    let mag_b = (bx * bx + by * by).sqrt();
    let mag_a = (ax * ax + ay * ay).sqrt();
    if mag_b == 0.0 || mag_a == 0.0 {
        return None;
    }
    let cos = (bx * ax + by * ay) / (mag_b * mag_a);
    Some(clamp(cos, -1.0, 1.0).acos())
}

pub fn analyze_corner_angles(angles: &[f64]) -> AngleAnalysis {
    if angles.is_empty() {
        return AngleAnalysis::default();
    }
    let n = angles.len() as f64;
    let avg_angle = angles.iter().sum::<f64>() / n;
    let variance = angles.iter().map(|a| (a - avg_angle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let consistency = if angles.len() > 1 {
        (1.0 - std_dev / FRAC_PI_4).max(0.0)
    } else {
        1.0
    };
    let rectangle_likeness = angles
        .iter()
        .map(|a| (1.0 - (a - FRAC_PI_2).abs() / FRAC_PI_4).max(0.0))
        .sum::<f64>()
        / n;
    let triangle_likeness = angles
        .iter()
        .map(|a| ((a - FRAC_PI_2).abs() / FRAC_PI_6).min(1.0))
        .sum::<f64>()
        / n;
    AngleAnalysis { avg_angle, variance, consistency, rectangle_likeness, triangle_likeness }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polyline(waypoints: &[(f64, f64)], steps: usize) -> Vec<Point> {
        let mut out = vec![Point::new(waypoints[0].0, waypoints[0].1)];
        for w in waypoints.windows(2) {
            for s in 1..=steps {
                let t = s as f64 / steps as f64;
                out.push(Point::new(w[0].0 + (w[1].0 - w[0].0) * t, w[0].1 + (w[1].1 - w[0].1) * t));
            }
        }
        out
    }

    #[test]
    fn short_strokes_have_no_corners() {
        let pts = polyline(&[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)], 7);
        assert_eq!(pts.len(), 15);
        assert_eq!(count_corners(&pts[..14]).count, 0);
    }

    #[test]
    fn right_angle_is_detected_once() {
        let pts = polyline(&[(0.0, 0.0), (200.0, 0.0), (200.0, 200.0)], 40);
        let cd = count_corners(&pts);
        assert_eq!(cd.count, 1);
        assert_eq!(cd.corners[0].index, 40);
        assert!((cd.angles[0] - FRAC_PI_2).abs() < 1e-9);
        assert_eq!(cd.corners[0].point(), Point::new(200.0, 0.0));
    }

    #[test]
    fn straight_stroke_has_no_corners() {
        let pts = polyline(&[(0.0, 0.0), (300.0, 10.0)], 60);
        assert_eq!(count_corners(&pts).count, 0);
    }

    #[test]
    fn coincident_points_are_skipped() {
        let pts = vec![Point::new(1.0, 1.0); 40];
        assert_eq!(count_corners(&pts), CornerData::default());
    }

    #[test]
    fn angle_analysis_of_right_angles() {
        let a = analyze_corner_angles(&[FRAC_PI_2; 4]);
        assert!((a.rectangle_likeness - 1.0).abs() < 1e-12);
        assert_eq!(a.triangle_likeness, 0.0);
        assert!((a.consistency - 1.0).abs() < 1e-12);
        assert_eq!(analyze_corner_angles(&[]), AngleAnalysis::default());
    }
}
