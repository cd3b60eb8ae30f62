//! Rule-based primitive classification and similarity against saved user
//! primitives.

use tracing::debug;

use crate::algorithms::fingerprint::extract_fingerprint_with;
use crate::config::EngineConfig;
use crate::geometry::stroke::has_overshoot;
use crate::geometry::tolerance::safe_div;
use crate::library::Library;
use crate::model::{Fingerprint, Point, RecognitionResult, ShapeType, StrokeAnalysis};

struct Traits {
    closed: bool,
    overshoot: bool,
    straightness: f64,
    aspect: f64,
    corners: usize,
}

// Each rule fires independently; order here is the tie order after sorting.
const RULES: [(ShapeType, u32); 5] = [
    (ShapeType::Line, 90),
    (ShapeType::Arc, 70),
    (ShapeType::Triangle, 85),
    (ShapeType::Rectangle, 80),
    (ShapeType::Circle, 80),
];

fn fires(shape: ShapeType, t: &Traits) -> bool {
    match shape {
        ShapeType::Line => t.straightness > 0.65 && !t.closed && !t.overshoot && t.corners <= 2,
        ShapeType::Arc => !t.closed && !t.overshoot && t.corners <= 1 && t.straightness < 0.6,
        ShapeType::Triangle => {
            t.closed && (2..=3).contains(&t.corners) && (0.3..=3.0).contains(&t.aspect)
        }
        ShapeType::Rectangle => {
            t.closed && (3..=4).contains(&t.corners) && t.aspect > 0.3 && t.aspect < 3.0
        }
        ShapeType::Circle => {
            (t.closed || t.overshoot)
                && t.corners <= 1
                && t.straightness < 0.5
                && (0.3..=3.0).contains(&t.aspect)
        }
    }
}

pub fn classify(fp: &Fingerprint, points: &[Point]) -> Vec<RecognitionResult> {
    classify_with(fp, points, &EngineConfig::default())
}

/// Every matching rule contributes one fixed-score result, highest first.
pub fn classify_with(fp: &Fingerprint, points: &[Point], config: &EngineConfig) -> Vec<RecognitionResult> {
    let traits = Traits {
        closed: fp.is_closed,
        overshoot: has_overshoot(points, config.overshoot_threshold),
        straightness: fp.straightness,
        aspect: fp.aspect_ratio,
        corners: fp.corners,
    };
    let mut results: Vec<RecognitionResult> = RULES
        .iter()
        .filter(|(shape, _)| fires(*shape, &traits))
        .map(|&(shape, score)| RecognitionResult::builtin(shape, score))
        .collect();
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Weighted geometric similarity of two strokes in [0, 1].
///
/// Straightness 0.3 (vetoes to 0 past a 0.5 difference), orientation-free
/// aspect 0.25, corner count 0.2, closure 0.15, relative size 0.1.
pub fn primitive_similarity(a: &Fingerprint, b: &Fingerprint) -> f64 {
    let straight_diff = (a.straightness - b.straightness).abs();
    if straight_diff > 0.5 {
        return 0.0;
    }
    let folded = |ar: f64| ar.min(1.0 / ar);
    let aspect_diff = (folded(a.aspect_ratio) - folded(b.aspect_ratio)).abs();
    let corner_diff = (a.corners as f64 - b.corners as f64).abs();
    let size_diff = safe_div((a.size - b.size).abs(), a.size.max(b.size), 0.0);

    let total = (1.0 - straight_diff).max(0.0) * 0.3
        + (1.0 - aspect_diff * 2.0).max(0.0) * 0.25
        + (1.0 - corner_diff / 4.0).max(0.0) * 0.2
        + if a.is_closed == b.is_closed { 0.15 } else { 0.0 }
        + (1.0 - size_diff).max(0.0) * 0.1;
    total / (0.3 + 0.25 + 0.2 + 0.15 + 0.1)
}

/// Saved user primitives resembling `fp` at or above `threshold`, best first.
pub fn suggest_user_primitives(fp: &Fingerprint, library: &Library, threshold: f64) -> Vec<RecognitionResult> {
    let mut out: Vec<RecognitionResult> = library
        .user_primitives()
        .filter_map(|(key, item, data)| {
            let sim = primitive_similarity(fp, &data.fingerprint);
            (sim >= threshold).then(|| RecognitionResult {
                kind: key.to_string(),
                label: item.label.clone(),
                score: (sim * 100.0).round() as u32,
                confidence: sim,
                user_primitive: true,
            })
        })
        .collect();
    out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    out
}

/// Fingerprint plus the merged, ranked candidates from the rules and the library.
pub fn analyze(points: &[Point], library: &Library, config: &EngineConfig) -> StrokeAnalysis {
    let fingerprint = extract_fingerprint_with(points, config);
    let mut results = classify_with(&fingerprint, points, config);
    results.extend(suggest_user_primitives(&fingerprint, library, config.primitive_threshold));
    results.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(
        points = points.len(),
        corners = fingerprint.corners,
        straightness = fingerprint.straightness,
        closed = fingerprint.is_closed,
        winner = results.first().map(|r| r.kind.as_str()).unwrap_or("none"),
        "stroke analyzed"
    );
    StrokeAnalysis { fingerprint, results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fingerprint::extract_fingerprint;

    fn arc(n: usize, r: f64, sweep: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = sweep * i as f64 / (n - 1) as f64;
                Point::new(100.0 + r * a.cos(), 100.0 + r * a.sin())
            })
            .collect()
    }

    #[test]
    fn straight_stroke_is_a_line() {
        let pts: Vec<Point> = (0..30).map(|i| Point::new(i as f64 * 5.0, i as f64 * 1.5)).collect();
        let fp = extract_fingerprint(&pts);
        let r = classify(&fp, &pts);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].kind, "line");
        assert_eq!(r[0].score, 90);
        assert!((r[0].confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn three_quarter_circle_is_arc_only() {
        let pts = arc(40, 80.0, 1.5 * std::f64::consts::PI);
        let fp = extract_fingerprint(&pts);
        let r = classify(&fp, &pts);
        assert_eq!(r.iter().map(|r| r.kind.as_str()).collect::<Vec<_>>(), vec!["arc"]);
    }

    #[test]
    fn elongated_loop_is_unrecognized() {
        let corners = [(0.0, 0.0), (300.0, 0.0), (300.0, 20.0), (0.0, 20.0), (0.0, 0.0)];
        let mut pts = vec![Point::new(0.0, 0.0)];
        for w in corners.windows(2) {
            let (a, b) = (Point::from(w[0]), Point::from(w[1]));
            let steps = (crate::geometry::math::distance(a, b) / 5.0) as usize;
            for s in 1..=steps {
                let t = s as f64 / steps as f64;
                pts.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        let fp = extract_fingerprint(&pts);
        assert!(fp.is_closed);
        assert!(fp.aspect_ratio > 3.0);
        assert!(classify(&fp, &pts).is_empty());
    }

    #[test]
    fn similarity_is_one_for_identical() {
        let fp = extract_fingerprint(&arc(40, 80.0, 1.5 * std::f64::consts::PI));
        assert!((primitive_similarity(&fp, &fp) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn similarity_vetoes_straightness_gap() {
        let line: Vec<Point> = (0..30).map(|i| Point::new(i as f64 * 5.0, 0.0)).collect();
        let loop_ = arc(60, 40.0, std::f64::consts::TAU);
        let a = extract_fingerprint(&line);
        let b = extract_fingerprint(&loop_);
        assert_eq!(primitive_similarity(&a, &b), 0.0);
    }

    #[test]
    fn zero_size_strokes_compare_equal_in_size() {
        let p = vec![Point::new(1.0, 1.0); 3];
        let fp = extract_fingerprint(&p);
        let s = primitive_similarity(&fp, &fp);
        assert!(s.is_finite());
    }
}
