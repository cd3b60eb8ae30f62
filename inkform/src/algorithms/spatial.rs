use crate::geometry::bounds::{box_distance, contain, overlap};
use crate::geometry::intersect::intersect;
use crate::model::{Component, Connection, Containment, Relationship, SpatialGraph};

/// Pairwise relationships between components. Indices in the result are
/// positions in `components`. Each pair yields at most one relationship, tested
/// in order: containment (neither is a line), intersecting (boxes overlap),
/// touching (box gap below `proximity`).
pub fn build_spatial_graph(components: &[Component], proximity: f64) -> SpatialGraph {
    let mut g = SpatialGraph::default();
    for i in 0..components.len() {
        for j in (i + 1)..components.len() {
            let (a, b) = (&components[i], &components[j]);
            if !a.is_line() && !b.is_line() {
                if contain(&a.bounds, &b.bounds) {
                    g.containment.push(Containment { outer: i, inner: j });
                    continue;
                }
                if contain(&b.bounds, &a.bounds) {
                    g.containment.push(Containment { outer: j, inner: i });
                    continue;
                }
            }
            if overlap(&a.bounds, &b.bounds) {
                let intersection_points = match (&a.shape, &b.shape) {
                    (Some(sa), Some(sb)) => {
                        let pts = intersect(&sa.definition, &sb.definition);
                        (!pts.is_empty()).then_some(pts)
                    }
                    _ => None,
                };
                g.connections.push(Connection {
                    a: i,
                    b: j,
                    relationship: Relationship::Intersecting,
                    distance: 0.0,
                    intersection_points,
                });
                continue;
            }
            let d = box_distance(&a.bounds, &b.bounds);
            if d < proximity {
                g.connections.push(Connection {
                    a: i,
                    b: j,
                    relationship: Relationship::Touching,
                    distance: d,
                    intersection_points: None,
                });
            }
        }
    }
    g
}

/// Greedy proximity clustering: positions in `components` grouped so that every
/// member is within `threshold` (box distance) of some other member of its group.
pub fn cluster(components: &[Component], threshold: f64) -> Vec<Vec<usize>> {
    let n = components.len();
    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();
    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];
        let mut changed = true;
        while changed {
            changed = false;
            for other in 0..n {
                if assigned[other] {
                    continue;
                }
                let near = members
                    .iter()
                    .any(|&m| box_distance(&components[m].bounds, &components[other].bounds) < threshold);
                if near {
                    members.push(other);
                    assigned[other] = true;
                    changed = true;
                }
            }
        }
        clusters.push(members);
    }
    clusters
}
