//! Bounded search for a subset of a spatial cluster that matches a saved
//! composition.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use crate::algorithms::composition::{
    fingerprint_composition, match_fingerprints, normalize_kind, single_fingerprint, FingerprintMatch,
};
use crate::algorithms::spatial::build_spatial_graph;
use crate::config::{EngineConfig, SearchBudget};
use crate::geometry::bounds::box_distance;
use crate::model::{Component, CompositionFingerprint};

#[derive(Clone, Debug, PartialEq)]
pub struct SubsetMatch {
    /// Handles of the matched components, in the order they were chosen.
    pub components: Vec<usize>,
    pub score: f64,
    pub detail: FingerprintMatch,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubsetSearch {
    pub matched: Option<SubsetMatch>,
    /// Complete subsets that were fingerprinted and scored.
    pub combinations_tested: usize,
    /// Components placed during enumeration, partial subsets included. Never
    /// exceeds `SearchBudget::max_combinations`.
    pub nodes_visited: usize,
}

/// Looks for components of `cluster` matching `target`.
///
/// Single-component targets test each component directly. Otherwise the
/// required types are filled one at a time by depth-first enumeration; each
/// added component must lie within the composition proximity of a component
/// already chosen, and components of one type are taken in cluster order so
/// every set is enumerated once. A branch is abandoned as soon as some still
/// required type cannot be reached from the chosen set. Every placed
/// component counts against `budget.max_combinations`.
pub fn find_subset_match(
    cluster: &[Component],
    target: &CompositionFingerprint,
    target_components: Option<&[Component]>,
    budget: &SearchBudget,
    config: &EngineConfig,
) -> SubsetSearch {
    let mut search = Search {
        cluster,
        target,
        target_components,
        budget,
        config,
        tested: 0,
        visited: 0,
        best: None,
        by_kind: BTreeMap::new(),
        adjacency: Vec::new(),
    };
    if cluster.len() < target.component_count || target.component_count == 0 {
        return SubsetSearch::default();
    }

    if target.component_count == 1 {
        search.singles();
        return search.finish();
    }

    for (pos, c) in cluster.iter().enumerate() {
        search.by_kind.entry(normalize_kind(&c.kind)).or_default().push(pos);
    }
    let mut need: BTreeMap<&str, usize> = BTreeMap::new();
    for t in &target.component_types {
        *need.entry(t.as_str()).or_insert(0) += 1;
    }
    for (kind, n) in &need {
        let have = search.by_kind.get(*kind).map_or(0, |v| v.len());
        if have < *n {
            if config.verbose {
                trace!(kind, need = n, have, "missing required type");
            }
            return SubsetSearch::default();
        }
    }

    search.adjacency = (0..cluster.len())
        .map(|i| {
            (0..cluster.len())
                .filter(|&j| j != i && box_distance(&cluster[i].bounds, &cluster[j].bounds) < config.composition_proximity)
                .collect()
        })
        .collect();
    let mut chosen = Vec::with_capacity(target.component_count);
    search.extend(&mut chosen, &target.component_types);
    search.finish()
}

struct Search<'a> {
    cluster: &'a [Component],
    target: &'a CompositionFingerprint,
    target_components: Option<&'a [Component]>,
    budget: &'a SearchBudget,
    config: &'a EngineConfig,
    tested: usize,
    visited: usize,
    best: Option<SubsetMatch>,
    by_kind: BTreeMap<&'a str, Vec<usize>>,
    /// Ascending positions within the composition proximity of each position.
    adjacency: Vec<Vec<usize>>,
}

impl<'a> Search<'a> {
    fn exhausted(&self) -> bool {
        self.visited >= self.budget.max_combinations || (self.budget.stop_on_first && self.best.is_some())
    }

    fn singles(&mut self) {
        let target = self.target;
        let want = target.component_types.first().map(String::as_str);
        for c in self.cluster {
            if self.exhausted() {
                break;
            }
            if Some(normalize_kind(&c.kind)) != want {
                continue;
            }
            self.visited += 1;
            self.tested += 1;
            let fp = single_fingerprint(c);
            let r = self.score(&fp, std::slice::from_ref(c));
            self.record(vec![c.index], r);
        }
    }

    fn extend(&mut self, chosen: &mut Vec<usize>, remaining: &'a [String]) {
        let Some((next, rest)) = remaining.split_first() else {
            self.test(chosen);
            return;
        };
        if self.exhausted() {
            return;
        }
        if !chosen.is_empty() && !self.reachable(chosen, remaining) {
            return;
        }
        // a run of one type is picked in ascending cluster order
        let floor = match chosen.last() {
            Some(&last) if normalize_kind(&self.cluster[last].kind) == next.as_str() => Some(last),
            _ => None,
        };
        let candidates = self.by_kind.get(next.as_str()).cloned().unwrap_or_default();
        for pos in candidates {
            if self.exhausted() {
                break;
            }
            if floor.is_some_and(|f| pos <= f) || chosen.contains(&pos) || !self.near_chosen(chosen, pos) {
                continue;
            }
            self.visited += 1;
            chosen.push(pos);
            self.extend(chosen, rest);
            chosen.pop();
        }
    }

    fn near_chosen(&self, chosen: &[usize], pos: usize) -> bool {
        chosen.is_empty() || chosen.iter().any(|&c| self.adjacency[c].binary_search(&pos).is_ok())
    }

    /// Whether each type in `remaining` still has enough unused components
    /// within `remaining.len()` proximity hops of `chosen`, stepping only
    /// through components of the remaining types.
    fn reachable(&self, chosen: &[usize], remaining: &[String]) -> bool {
        let mut need: BTreeMap<&str, usize> = BTreeMap::new();
        for t in remaining {
            *need.entry(t.as_str()).or_insert(0) += 1;
        }
        let mut depth = vec![usize::MAX; self.cluster.len()];
        let mut queue = VecDeque::new();
        for &c in chosen {
            depth[c] = 0;
            queue.push_back(c);
        }
        let mut found: BTreeMap<&str, usize> = BTreeMap::new();
        while let Some(p) = queue.pop_front() {
            if depth[p] >= remaining.len() {
                continue;
            }
            for &q in &self.adjacency[p] {
                if depth[q] != usize::MAX {
                    continue;
                }
                let kind = normalize_kind(&self.cluster[q].kind);
                if !need.contains_key(kind) {
                    continue;
                }
                depth[q] = depth[p] + 1;
                *found.entry(kind).or_insert(0) += 1;
                queue.push_back(q);
            }
        }
        let ok = need.iter().all(|(kind, n)| found.get(kind).copied().unwrap_or(0) >= *n);
        if !ok && self.config.verbose {
            trace!(chosen = chosen.len(), remaining = remaining.len(), "branch cut: required type out of reach");
        }
        ok
    }

    fn test(&mut self, chosen: &[usize]) {
        self.tested += 1;
        let subset: Vec<Component> = chosen.iter().map(|&p| self.cluster[p].clone()).collect();
        let graph = build_spatial_graph(&subset, self.config.composition_proximity);
        let fp = fingerprint_composition(&subset, &graph);
        let r = self.score(&fp, &subset);
        if self.config.verbose {
            trace!(combination = self.tested, hash = %fp.topology_hash, score = r.score, matches = r.matches, "tested combination");
        }
        self.record(subset.iter().map(|c| c.index).collect(), r);
    }

    fn score(&self, fp: &CompositionFingerprint, subset: &[Component]) -> FingerprintMatch {
        match_fingerprints(fp, self.target, self.config.match_threshold, Some(subset), self.target_components, self.config)
    }

    fn record(&mut self, components: Vec<usize>, r: FingerprintMatch) {
        if !r.matches {
            return;
        }
        let better = self.best.as_ref().map_or(true, |b| r.score > b.score);
        if better {
            self.best = Some(SubsetMatch { components, score: r.score, detail: r });
        }
    }

    fn finish(self) -> SubsetSearch {
        SubsetSearch { matched: self.best, combinations_tested: self.tested, nodes_visited: self.visited }
    }
}
