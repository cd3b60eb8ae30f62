use inkform::{analyze, build_spatial_graph, extract_fingerprint, fingerprint_composition, Bounds, Component, EngineConfig, Library, Point};
use proptest::prelude::*;

const KINDS: [&str; 5] = ["circle", "line", "triangle", "rectangle", "art"];

fn component(index: usize, kind: usize, x: i16, y: i16, w: u8, h: u8) -> Component {
    let (min_x, min_y) = (x as f64, y as f64);
    let (max_x, max_y) = (min_x + w as f64, min_y + h as f64);
    let stroke = vec![Point::new(min_x, min_y), Point::new(max_x, max_y)];
    let kind = if KINDS[kind] == "art" { format!("art{index}") } else { KINDS[kind].to_string() };
    Component {
        index,
        fingerprint: extract_fingerprint(&stroke),
        bounds: Bounds { min_x, max_x, min_y, max_y },
        stroke,
        refined_stroke: None,
        recognized_as: kind.clone(),
        kind,
        refined: None,
        shape: None,
    }
}

fn components() -> impl Strategy<Value = Vec<Component>> {
    prop::collection::vec((0usize..KINDS.len(), -200i16..200, -200i16..200, 1u8..120, 1u8..120), 1..7).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (k, x, y, w, h))| component(i, k, x, y, w, h))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn composition_fingerprint_ignores_input_order(
        (original, shuffled) in components().prop_flat_map(|c| (Just(c.clone()), Just(c).prop_shuffle()))
    ) {
        let a = fingerprint_composition(&original, &build_spatial_graph(&original, 35.0));
        let b = fingerprint_composition(&shuffled, &build_spatial_graph(&shuffled, 35.0));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn analysis_repeats_exactly(pts in prop::collection::vec((-500i16..500, -500i16..500), 0..80)) {
        let pts: Vec<Point> = pts.into_iter().map(|(x, y)| Point::new(x as f64, y as f64)).collect();
        let lib = Library::new();
        let cfg = EngineConfig::default();
        let first = analyze(&pts, &lib, &cfg);
        let second = analyze(&pts, &lib, &cfg);
        prop_assert_eq!(first, second);
    }
}
