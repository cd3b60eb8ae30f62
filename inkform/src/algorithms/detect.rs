use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::algorithms::composition::normalize_kind;
use crate::algorithms::spatial::cluster;
use crate::algorithms::subset::find_subset_match;
use crate::config::EngineConfig;
use crate::library::Library;
use crate::model::{Component, CompositionMatch};

/// Gives every component its matching kind. Pending components (empty
/// `recognized_as`) are named `art0`, `art1`, ... in canvas order.
pub fn label_components(components: &[Component], library: &Library) -> Vec<Component> {
    let mut art = 0usize;
    components
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if c.recognized_as.is_empty() {
                c.recognized_as = format!("art{art}");
                art += 1;
            }
            c.kind = normalize_kind(&library.resolve_kind(&c.recognized_as)).to_string();
            c
        })
        .collect()
}

/// Canvas-wide composition detection.
///
/// Components are clustered by proximity; inside each cluster the library's
/// compositions are tried largest first and each claims its components, so
/// later (smaller) compositions only see what is left. First match wins.
pub fn match_compositions(components: &[Component], library: &Library, config: &EngineConfig) -> Vec<CompositionMatch> {
    let labeled = label_components(components, library);
    if labeled.is_empty() {
        return Vec::new();
    }
    let clusters = cluster(&labeled, config.composition_proximity);
    let compositions = library.compositions();
    debug!(components = labeled.len(), clusters = clusters.len(), compositions = compositions.len(), "matching compositions");

    let mut out = Vec::new();
    for (cluster_index, members) in clusters.iter().enumerate() {
        if config.verbose {
            let names: Vec<&str> = members.iter().map(|&p| labeled[p].recognized_as.as_str()).collect();
            trace!(cluster = cluster_index, ?names, "cluster");
        }
        let mut used: BTreeSet<usize> = BTreeSet::new();
        for (key, item) in &compositions {
            let Some(data) = &item.composition else { continue };
            let pool: Vec<Component> = members
                .iter()
                .map(|&p| &labeled[p])
                .filter(|c| !used.contains(&c.index))
                .cloned()
                .collect();
            let search = find_subset_match(&pool, &data.fingerprint, Some(&data.components), &config.search, config);
            if config.verbose {
                trace!(key, tested = search.combinations_tested, found = search.matched.is_some(), "subset search");
            }
            let Some(m) = search.matched else { continue };
            used.extend(m.components.iter().copied());
            out.push(CompositionMatch {
                library_key: key.to_string(),
                label: item.label.clone(),
                score: m.score,
                matched_component_indices: m.components,
                cluster_index,
                component_count: data.fingerprint.component_count,
                type_score: m.detail.type_score,
                relationship_score: m.detail.relationship_score,
            });
        }
    }
    debug!(matches = out.len(), "composition matching done");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::fingerprint::extract_fingerprint;
    use crate::model::Point;

    fn pending(index: usize, x: f64) -> Component {
        let stroke = vec![Point::new(x, 0.0), Point::new(x + 10.0, 10.0)];
        let fingerprint = extract_fingerprint(&stroke);
        Component {
            index,
            bounds: fingerprint.bounds,
            fingerprint,
            stroke,
            refined_stroke: None,
            recognized_as: String::new(),
            kind: String::new(),
            refined: None,
            shape: None,
        }
    }

    #[test]
    fn pending_strokes_become_art() {
        let mut accepted = pending(1, 50.0);
        accepted.recognized_as = "circle".into();
        let labeled = label_components(&[pending(0, 0.0), accepted, pending(2, 90.0)], &Library::new());
        let names: Vec<(&str, &str)> = labeled.iter().map(|c| (c.recognized_as.as_str(), c.kind.as_str())).collect();
        assert_eq!(names, vec![("art0", "art"), ("circle", "circle"), ("art1", "art")]);
    }

    #[test]
    fn empty_canvas_or_library_matches_nothing() {
        assert!(match_compositions(&[], &Library::new(), &EngineConfig::default()).is_empty());
        let comps = vec![pending(0, 0.0), pending(1, 15.0)];
        assert!(match_compositions(&comps, &Library::new(), &EngineConfig::default()).is_empty());
    }
}
