pub mod config;
pub mod error;
pub mod library;
pub mod model;
pub mod sketch;
pub mod geometry {
    pub mod bounds;
    pub mod corners;
    pub mod hull;
    pub mod intersect;
    pub mod math;
    pub mod stroke;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod classify;
    pub mod composition;
    pub mod detect;
    pub mod fingerprint;
    pub mod refine;
    pub mod spatial;
    pub mod subset;
}
mod json;

pub use algorithms::classify::{analyze, classify, classify_with, primitive_similarity, suggest_user_primitives};
pub use algorithms::composition::{fingerprint_composition, match_fingerprints, FingerprintMatch};
pub use algorithms::detect::match_compositions;
pub use algorithms::fingerprint::{extract_fingerprint, extract_fingerprint_with};
pub use algorithms::refine::{build_shape, refine};
pub use algorithms::spatial::{build_spatial_graph, cluster};
pub use algorithms::subset::{find_subset_match, SubsetMatch, SubsetSearch};
pub use config::{EngineConfig, FuzzyTolerance, RefinementSettings, SearchBudget};
pub use error::{LibraryError, LibraryResult, SketchError};
pub use geometry::intersect::intersect;
pub use library::{Library, LibraryItem, LibraryItemKind};
pub use model::*;
pub use sketch::Sketch;
