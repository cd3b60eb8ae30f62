use inkform::algorithms::composition::fingerprint_composition;
use inkform::algorithms::spatial::build_spatial_graph;
use inkform::{extract_fingerprint, find_subset_match, Bounds, Component, EngineConfig, Point, SearchBudget};
use std::time::Instant;

fn circle_component(index: usize, cx: f64, cy: f64, r: f64) -> Component {
    let stroke: Vec<Point> = (0..48)
        .map(|i| {
            let a = i as f64 / 48.0 * std::f64::consts::TAU;
            Point::new(cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    let fingerprint = extract_fingerprint(&stroke);
    Component {
        index,
        bounds: Bounds { min_x: cx - r, max_x: cx + r, min_y: cy - r, max_y: cy + r },
        fingerprint,
        stroke,
        refined_stroke: None,
        recognized_as: "circle".into(),
        kind: "circle".into(),
        refined: None,
        shape: None,
    }
}

// Dense row of small circles: every triple is in range, none nests.
fn build_cluster(n: usize) -> Vec<Component> {
    (0..n).map(|i| circle_component(i, i as f64 * 12.0, (i % 3) as f64 * 12.0, 5.0)).collect()
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut components = 200usize;
    let mut runs = 50usize;
    let mut budget = SearchBudget::default().max_combinations;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--components=") { if let Ok(v)=val.parse() { components=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--budget=") { if let Ok(v)=val.parse() { budget=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let cfg = EngineConfig::default();
    let search = SearchBudget { max_combinations: budget, stop_on_first: false };
    let cluster = build_cluster(components);
    // Target: a large circle containing two small ones, which the row never forms.
    let saved = vec![circle_component(0, 0.0, 0.0, 100.0), circle_component(1, -30.0, 0.0, 10.0), circle_component(2, 30.0, 0.0, 10.0)];
    let graph = build_spatial_graph(&saved, cfg.graph_proximity);
    let mut target = fingerprint_composition(&saved, &graph);
    target.fuzzy_relationships = true;

    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let start_all = Instant::now();
    let mut tested = 0usize;
    let mut visited = 0usize;
    let mut found = 0usize;
    for _ in 0..runs {
        let t0 = Instant::now();
        let r = find_subset_match(&cluster, &target, Some(&saved[..]), &search, &cfg);
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
        tested = tested.max(r.combinations_tested);
        visited = visited.max(r.nodes_visited);
        if r.matched.is_some() { found += 1; }
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("components={} runs={} budget={} visited={} tested={} found={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}", components, runs, budget, visited, tested, found, dur_all, med, p90, p99);
    if visited > budget { eprintln!("FAIL: visited {} nodes > budget {}", visited, budget); std::process::exit(1); }
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
