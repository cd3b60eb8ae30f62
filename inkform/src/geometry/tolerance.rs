// Centralized tolerances and recognition constants

pub const EPS_DET: f64 = 1e-4;            // parallel segment guard (segment-segment determinant)
pub const EPS_ROOT: f64 = 1e-4;           // coincident quadratic roots / tangent circles
pub const EPS_LEN: f64 = 1e-9;            // zero-length vector threshold

// Closure and overshoot (canvas px)
pub const CLOSURE_THRESHOLD: f64 = 50.0;
pub const CLOSURE_RELATIVE_GAP: f64 = 0.20;
pub const CLOSURE_MIN_POINTS: usize = 5;
pub const OVERSHOOT_THRESHOLD: f64 = 50.0;
pub const OVERSHOOT_MIN_POINTS: usize = 10;
pub const OVERSHOOT_TAIL_START: f64 = 0.7;

// Corner detection
pub const CORNER_MIN_POINTS: usize = 15;
pub const CORNER_WINDOW: usize = 8;
pub const CORNER_STRIDE: usize = 4;
pub const CORNER_ANGLE: f64 = std::f64::consts::FRAC_PI_3;
pub const CORNER_MERGE_GAP: usize = 20;

// Refinement
pub const CIRCLE_SEGMENTS: usize = 60;
pub const NORMALIZE_SIZE: f64 = 200.0;

// Spatial relationships
pub const GRAPH_PROXIMITY: f64 = 50.0;
pub const COMPOSITION_PROXIMITY: f64 = 35.0;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn clamp01(x: f64) -> f64 { clamp(x, 0.0, 1.0) }
#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_LEN { fallback } else { num / den }
}
