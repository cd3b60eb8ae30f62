//! Composition fingerprints: an order-invariant summary of a set of canvas
//! components (canonical type sequence, type and relationship histograms,
//! topology hash) and the tolerant matcher that compares a candidate against a
//! saved composition.

use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::algorithms::classify::primitive_similarity;
use crate::config::EngineConfig;
use crate::model::{Component, CompositionFingerprint, Relationship, RelationshipHistogram, SpatialGraph};

pub const ART: &str = "art";

/// `art` and the synthetic `art<N>` labels of pending strokes share one bucket.
pub fn normalize_kind(kind: &str) -> &str {
    match kind.strip_prefix(ART) {
        Some(rest) if rest.bytes().all(|b| b.is_ascii_digit()) => ART,
        _ => kind,
    }
}

/// Components ordered by normalized kind, then box `min_x`, then `min_y`;
/// the handle breaks exact ties.
pub fn canonicalize<C: Borrow<Component>>(components: &[C]) -> Vec<&Component> {
    let mut out: Vec<&Component> = components.iter().map(|c| c.borrow()).collect();
    out.sort_by(|a, b| {
        normalize_kind(&a.kind)
            .cmp(normalize_kind(&b.kind))
            .then_with(|| a.bounds.min_x.total_cmp(&b.bounds.min_x))
            .then_with(|| a.bounds.min_y.total_cmp(&b.bounds.min_y))
            .then_with(|| a.index.cmp(&b.index))
    });
    out
}

pub fn topology_hash(types: &[String], rels: &RelationshipHistogram) -> String {
    let mut hash = types.join("+");
    let parts: Vec<String> = rels
        .entries()
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(k, n)| format!("{n}{k}"))
        .collect();
    if !parts.is_empty() {
        hash.push('-');
        hash.push_str(&parts.join("-"));
    }
    hash
}

pub fn fingerprint_composition<C: Borrow<Component>>(components: &[C], graph: &SpatialGraph) -> CompositionFingerprint {
    let canonical = canonicalize(components);
    let component_types: Vec<String> = canonical.iter().map(|c| normalize_kind(&c.kind).to_string()).collect();
    let mut type_histogram: BTreeMap<String, usize> = BTreeMap::new();
    for t in &component_types {
        *type_histogram.entry(t.clone()).or_insert(0) += 1;
    }
    let relationship_histogram = RelationshipHistogram {
        touching: graph.count(Relationship::Touching),
        intersecting: graph.count(Relationship::Intersecting),
        containment: graph.containment.len(),
    };
    CompositionFingerprint {
        topology_hash: topology_hash(&component_types, &relationship_histogram),
        component_count: components.len(),
        canonical_order: canonical.iter().map(|c| c.index).collect(),
        component_types,
        type_histogram,
        relationship_histogram,
        fuzzy_relationships: false,
    }
}

/// Fingerprint of a lone component; no relationships.
pub fn single_fingerprint(component: &Component) -> CompositionFingerprint {
    let kind = normalize_kind(&component.kind).to_string();
    CompositionFingerprint {
        component_types: vec![kind.clone()],
        component_count: 1,
        type_histogram: BTreeMap::from([(kind.clone(), 1)]),
        relationship_histogram: RelationshipHistogram::default(),
        topology_hash: kind,
        canonical_order: vec![component.index],
        fuzzy_relationships: false,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerprintMatch {
    pub matches: bool,
    pub score: f64,
    pub type_score: f64,
    pub relationship_score: f64,
}

impl FingerprintMatch {
    fn reject(type_score: f64) -> Self {
        FingerprintMatch { matches: false, score: 0.0, type_score, relationship_score: 0.0 }
    }
}

/// Scores `candidate` against a saved `target`.
///
/// Counts and type sequences must agree exactly. Type score is the share of
/// components whose type counts agree; the `art` bucket instead needs the
/// mean pairwise geometric similarity of the art strokes (canonical order) to
/// reach `threshold` when both component lists are supplied. Relationships
/// compare per kind, tolerantly when the target was saved fuzzy.
pub fn match_fingerprints(
    candidate: &CompositionFingerprint,
    target: &CompositionFingerprint,
    threshold: f64,
    candidate_components: Option<&[Component]>,
    target_components: Option<&[Component]>,
    config: &EngineConfig,
) -> FingerprintMatch {
    if candidate.component_count != target.component_count
        || candidate.type_signature() != target.type_signature()
    {
        return FingerprintMatch::default();
    }

    let kinds: BTreeSet<&String> = candidate.type_histogram.keys().chain(target.type_histogram.keys()).collect();
    let mut matched = 0usize;
    let mut total = 0usize;
    for kind in kinds {
        let n1 = candidate.type_histogram.get(kind).copied().unwrap_or(0);
        let n2 = target.type_histogram.get(kind).copied().unwrap_or(0);
        let agrees = match (kind.as_str(), candidate_components, target_components) {
            (ART, Some(cc), Some(tc)) => art_similarity(cc, tc).is_some_and(|s| {
                if config.verbose {
                    trace!(similarity = s, "art geometric similarity");
                }
                s >= threshold
            }),
            _ => n1 == n2,
        };
        if agrees {
            matched += n1;
        }
        total += n1.max(n2);
    }
    let type_score = if total > 0 { matched as f64 / total as f64 } else { 1.0 };

    let c = candidate.relationship_histogram.entries();
    let t = target.relationship_histogram.entries();
    if target.fuzzy_relationships && target.relationship_histogram.any() && !candidate.relationship_histogram.any() {
        return FingerprintMatch::reject(type_score);
    }
    let per_kind = c.iter().zip(t.iter()).map(|((_, a), (_, b))| {
        if target.fuzzy_relationships {
            config.fuzzy.score(a.abs_diff(*b))
        } else if a == b {
            1.0
        } else {
            0.0
        }
    });
    let relationship_score = per_kind.sum::<f64>() / c.len() as f64;

    let score = type_score * relationship_score;
    FingerprintMatch { matches: score >= threshold, score, type_score, relationship_score }
}

// Mean similarity of art strokes paired in canonical order; None when the
// art counts differ or there are none.
fn art_similarity(a: &[Component], b: &[Component]) -> Option<f64> {
    fn arts(cs: &[Component]) -> Vec<&Component> {
        canonicalize(cs).into_iter().filter(|c| normalize_kind(&c.kind) == ART).collect()
    }
    let (xa, xb) = (arts(a), arts(b));
    if xa.len() != xb.len() || xa.is_empty() {
        return None;
    }
    let sum: f64 = xa.iter().zip(&xb).map(|(p, q)| primitive_similarity(&p.fingerprint, &q.fingerprint)).sum();
    Some(sum / xa.len() as f64)
}
