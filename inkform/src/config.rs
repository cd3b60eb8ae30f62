//! Engine configuration.
//!
//! Every tunable used by recognition and matching lives here and is passed
//! explicitly into each call. Defaults reproduce the recognizer's calibrated
//! values; all fields are `#[serde(default)]` so partial JSON documents load.

use serde::{Deserialize, Serialize};

use crate::geometry::corners::CornerParams;
use crate::geometry::tolerance::{
    CLOSURE_THRESHOLD, COMPOSITION_PROXIMITY, GRAPH_PROXIMITY, NORMALIZE_SIZE, OVERSHOOT_THRESHOLD,
};

/// Stroke clean-up applied on stroke completion, before analysis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementSettings {
    pub enabled: bool,
    /// Chaikin iterations; 0 disables smoothing.
    pub smooth: u32,
    /// Douglas–Peucker tolerance in px; 0 disables simplification.
    pub simplify: f64,
    pub normalize: bool,
    pub normalize_size: f64,
}

impl Default for RefinementSettings {
    fn default() -> Self {
        RefinementSettings {
            enabled: true,
            smooth: 2,
            simplify: 2.0,
            normalize: false,
            normalize_size: NORMALIZE_SIZE,
        }
    }
}

/// Bounds the combinatorial subset search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    pub max_combinations: usize,
    pub stop_on_first: bool,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget { max_combinations: 1000, stop_on_first: true }
    }
}

/// Relationship-count tolerance for compositions saved with fuzzy relationships.
/// Index = absolute count difference; differences past the table score 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyTolerance {
    pub off_by_one: f64,
    pub off_by_two: f64,
}

impl Default for FuzzyTolerance {
    fn default() -> Self {
        FuzzyTolerance { off_by_one: 0.7, off_by_two: 0.4 }
    }
}

impl FuzzyTolerance {
    pub fn score(&self, diff: usize) -> f64 {
        match diff {
            0 => 1.0,
            1 => self.off_by_one,
            2 => self.off_by_two,
            _ => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub closure_threshold: f64,
    pub overshoot_threshold: f64,
    pub corners: CornerParams,
    /// Touching distance when building a canvas-wide spatial graph.
    pub graph_proximity: f64,
    /// Clustering and subset-search distance used for composition detection.
    pub composition_proximity: f64,
    pub match_threshold: f64,
    /// Minimum similarity for a saved user primitive to be suggested.
    pub primitive_threshold: f64,
    pub fuzzy: FuzzyTolerance,
    pub search: SearchBudget,
    pub refinement: RefinementSettings,
    /// Emit per-step trace events (cluster contents, every tested combination).
    pub verbose: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            closure_threshold: CLOSURE_THRESHOLD,
            overshoot_threshold: OVERSHOOT_THRESHOLD,
            corners: CornerParams::default(),
            graph_proximity: GRAPH_PROXIMITY,
            composition_proximity: COMPOSITION_PROXIMITY,
            match_threshold: 0.8,
            primitive_threshold: 0.8,
            fuzzy: FuzzyTolerance::default(),
            search: SearchBudget::default(),
            refinement: RefinementSettings::default(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"match_threshold":0.9,"search":{"max_combinations":10}}"#).unwrap();
        assert_eq!(cfg.match_threshold, 0.9);
        assert_eq!(cfg.search.max_combinations, 10);
        assert!(cfg.search.stop_on_first);
        assert_eq!(cfg.composition_proximity, 35.0);
        assert_eq!(cfg.refinement, RefinementSettings::default());
    }

    #[test]
    fn fuzzy_table() {
        let f = FuzzyTolerance::default();
        assert_eq!([f.score(0), f.score(1), f.score(2), f.score(3), f.score(9)], [1.0, 0.7, 0.4, 0.0, 0.0]);
    }
}
