//! Canvas session: components addressed by position, the active library and
//! the composition matches that follow every edit.

use tracing::{debug, info};

use crate::algorithms::classify::analyze;
use crate::algorithms::composition::fingerprint_composition;
use crate::algorithms::detect::{label_components, match_compositions};
use crate::algorithms::fingerprint::extract_fingerprint_with;
use crate::algorithms::refine::{apply_refinement, build_shape, refine};
use crate::algorithms::spatial::build_spatial_graph;
use crate::config::EngineConfig;
use crate::error::{LibraryError, LibraryResult, SketchError};
use crate::geometry::bounds::bounds;
use crate::library::{CompositionData, Library, LibraryItem, LibraryItemKind, PrimitiveData, Semantics};
use crate::model::{Component, CompositionMatch, Point, RecognitionResult, ShapeType, SpatialGraph};

#[derive(Clone, Debug)]
pub struct Sketch {
    config: EngineConfig,
    library: Library,
    components: Vec<Component>,
    selected: Option<usize>,
    suggestions: Vec<RecognitionResult>,
    matches: Vec<CompositionMatch>,
}

impl Default for Sketch {
    fn default() -> Self {
        Sketch::new()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Sketch::with_config(EngineConfig::default(), Library::new())
    }

    pub fn with_config(config: EngineConfig, library: Library) -> Self {
        Sketch {
            config,
            library,
            components: Vec::new(),
            selected: None,
            suggestions: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Replaces the library (e.g. after loading a saved document).
    pub fn set_library(&mut self, library: Library) -> &[CompositionMatch] {
        self.library = library;
        self.recompute()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Ranked suggestions for the selected stroke.
    pub fn suggestions(&self) -> &[RecognitionResult] {
        &self.suggestions
    }

    pub fn composition_matches(&self) -> &[CompositionMatch] {
        &self.matches
    }

    /// Completes a stroke: refines, analyzes and appends it as a pending
    /// component, which becomes the selection. Empty strokes are ignored.
    pub fn add_stroke(&mut self, points: Vec<Point>) -> &[CompositionMatch] {
        if points.is_empty() {
            return &self.matches;
        }
        let refined_stroke = apply_refinement(&points, &self.config.refinement);
        let analysis = analyze(refined_stroke.as_deref().unwrap_or(&points), &self.library, &self.config);
        let index = self.components.len();
        debug!(
            index,
            points = points.len(),
            best = analysis.results.first().map(|r| r.kind.as_str()),
            "stroke added"
        );
        self.components.push(Component {
            index,
            bounds: bounds(&points),
            stroke: points,
            refined_stroke,
            recognized_as: String::new(),
            kind: String::new(),
            fingerprint: analysis.fingerprint,
            refined: None,
            shape: None,
        });
        self.selected = Some(index);
        self.suggestions = analysis.results;
        self.recompute()
    }

    /// Accepts `kind` for the selected stroke. Built-in shapes are refined and
    /// get a geometric definition; user primitives keep the raw stroke.
    pub fn accept_suggestion(&mut self, kind: &str) -> Result<&[CompositionMatch], SketchError> {
        let index = self.selected.ok_or(SketchError::NoSelection)?;
        let component = self
            .components
            .get_mut(index)
            .ok_or(SketchError::InvalidComponent { index })?;
        self.library.bump_usage(kind);

        let user_primitive = matches!(
            self.library.get(kind).map(|item| item.kind),
            Some(LibraryItemKind::UserPrimitive)
        );
        component.recognized_as = kind.to_string();
        component.kind = self.library.resolve_kind(kind);
        component.refined = None;
        component.shape = None;
        match ShapeType::parse(kind) {
            Some(ShapeType::Arc) | None => {}
            Some(_) if user_primitive => {}
            Some(_) => {
                let analyzed = component.refined_stroke.as_deref().unwrap_or(&component.stroke);
                let refined = refine(analyzed, kind, Some(&component.fingerprint));
                component.shape = Some(build_shape(
                    &component.stroke,
                    kind,
                    refined.as_ref(),
                    &component.bounds,
                    Some(&component.fingerprint),
                ));
                component.refined = refined;
            }
        }
        debug!(index, kind, "suggestion accepted");
        self.selected = None;
        self.suggestions.clear();
        Ok(self.recompute())
    }

    /// Dismisses the suggestions; the stroke stays on the canvas unlabeled.
    pub fn reject_suggestion(&mut self) -> Result<&[CompositionMatch], SketchError> {
        if self.selected.take().is_none() {
            return Err(SketchError::NoSelection);
        }
        self.suggestions.clear();
        Ok(&self.matches)
    }

    /// Removes a component; later components shift down one position.
    pub fn remove_component(&mut self, index: usize) -> Result<&[CompositionMatch], SketchError> {
        if index >= self.components.len() {
            return Err(SketchError::InvalidComponent { index });
        }
        self.components.remove(index);
        for (i, c) in self.components.iter_mut().enumerate().skip(index) {
            c.index = i;
        }
        self.selected = match self.selected {
            Some(s) if s == index => {
                self.suggestions.clear();
                None
            }
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        Ok(self.recompute())
    }

    pub fn clear(&mut self) {
        self.components.clear();
        self.selected = None;
        self.suggestions.clear();
        self.matches.clear();
    }

    /// Relationships between the current components at the graph proximity.
    pub fn spatial_graph(&self) -> SpatialGraph {
        let labeled = label_components(&self.components, &self.library);
        build_spatial_graph(&labeled, self.config.graph_proximity)
    }

    /// Saves the canvas under `name` and returns the derived key.
    ///
    /// A canvas with exactly one accepted stroke becomes a user primitive;
    /// anything else becomes a composition of every component, with pending
    /// strokes accepted as `artN`.
    pub fn save_to_library(&mut self, name: &str) -> LibraryResult<String> {
        self.save_to_library_at(name, now_millis())
    }

    /// [`Sketch::save_to_library`] with an explicit creation timestamp.
    pub fn save_to_library_at(&mut self, name: &str, created: Option<u64>) -> LibraryResult<String> {
        let key = Library::derive_key(name)?;
        if self.components.is_empty() {
            return Err(LibraryError::NothingToSave);
        }
        if self.library.contains(&key) {
            return Err(LibraryError::NameExists { key });
        }

        let accepted: Vec<usize> = self
            .components
            .iter()
            .filter(|c| !c.recognized_as.is_empty())
            .map(|c| c.index)
            .collect();
        if let &[index] = accepted.as_slice() {
            self.save_primitive(&key, name, index, created)?;
        } else {
            self.save_composition(&key, name, created)?;
        }
        info!(key = %key, "saved to library");
        self.recompute();
        Ok(key)
    }

    fn save_primitive(&mut self, key: &str, name: &str, index: usize, created: Option<u64>) -> LibraryResult<()> {
        let c = &self.components[index];
        let item = LibraryItem {
            kind: LibraryItemKind::UserPrimitive,
            label: name.to_string(),
            shape_type: None,
            usage_count: 1,
            created,
            primitive: Some(PrimitiveData {
                strokes: vec![c.stroke.clone()],
                fingerprint: extract_fingerprint_with(&c.stroke, &self.config),
                based_on: ShapeType::parse(&c.recognized_as),
            }),
            composition: None,
        };
        self.library.insert(key, item)?;
        let c = &mut self.components[index];
        c.recognized_as = key.to_string();
        c.kind = LibraryItemKind::UserPrimitive.as_str().to_string();
        Ok(())
    }

    fn save_composition(&mut self, key: &str, name: &str, created: Option<u64>) -> LibraryResult<()> {
        let mut saved = label_components(&self.components, &self.library);
        for c in saved.iter_mut() {
            c.fingerprint = extract_fingerprint_with(&c.stroke, &self.config);
        }
        let graph = build_spatial_graph(&saved, self.config.graph_proximity);
        let mut fingerprint = fingerprint_composition(&saved, &graph);
        fingerprint.fuzzy_relationships = true;
        let relationships = graph
            .connections
            .iter()
            .map(|conn| {
                format!(
                    "{} {} {}",
                    saved[conn.a].recognized_as,
                    conn.relationship.as_str(),
                    saved[conn.b].recognized_as
                )
            })
            .collect();
        let semantics = Semantics {
            name: name.to_string(),
            component_types: saved.iter().map(|c| c.kind.clone()).collect(),
            relationships,
        };
        let item = LibraryItem {
            kind: LibraryItemKind::Composition,
            label: name.to_string(),
            shape_type: None,
            usage_count: 1,
            created,
            primitive: None,
            composition: Some(CompositionData { components: saved.clone(), fingerprint, spatial_graph: graph, semantics }),
        };
        self.library.insert(key, item)?;
        for (c, s) in self.components.iter_mut().zip(saved) {
            c.recognized_as = s.recognized_as;
            c.kind = s.kind;
        }
        Ok(())
    }

    pub fn delete_from_library(&mut self, key: &str) -> LibraryResult<LibraryItem> {
        let item = self.library.remove(key)?;
        info!(key, "deleted from library");
        self.recompute();
        Ok(item)
    }

    fn recompute(&mut self) -> &[CompositionMatch] {
        self.matches = match_compositions(&self.components, &self.library, &self.config);
        &self.matches
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> Option<u64> {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis() as u64)
}

// No system clock on wasm32-unknown-unknown; bindings pass their own.
#[cfg(target_arch = "wasm32")]
fn now_millis() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_config() -> EngineConfig {
        let mut cfg = EngineConfig::default();
        cfg.refinement.enabled = false;
        cfg
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        (0..=20)
            .map(|i| {
                let t = i as f64 / 20.0;
                Point::new(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t)
            })
            .collect()
    }

    #[test]
    fn add_selects_and_suggests() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        assert_eq!(s.selected(), Some(0));
        assert_eq!(s.suggestions()[0].kind, "line");
        assert!(s.add_stroke(Vec::new()).is_empty());
        assert_eq!(s.components().len(), 1);
    }

    #[test]
    fn accept_line_builds_segment() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.accept_suggestion("line").unwrap();
        let c = &s.components()[0];
        assert_eq!(c.recognized_as, "line");
        assert!(c.shape.is_some());
        assert_eq!(s.selected(), None);
        assert_eq!(s.accept_suggestion("line").unwrap_err(), SketchError::NoSelection);
    }

    #[test]
    fn reject_keeps_stroke_pending() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.reject_suggestion().unwrap();
        assert!(s.components()[0].recognized_as.is_empty());
        assert!(s.suggestions().is_empty());
        assert_eq!(s.reject_suggestion().unwrap_err(), SketchError::NoSelection);
    }

    #[test]
    fn remove_reindexes() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.add_stroke(line(0.0, 100.0, 100.0, 100.0));
        s.add_stroke(line(0.0, 200.0, 100.0, 200.0));
        s.remove_component(0).unwrap();
        let idx: Vec<usize> = s.components().iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![0, 1]);
        assert_eq!(s.selected(), Some(1));
        assert_eq!(s.remove_component(5).unwrap_err(), SketchError::InvalidComponent { index: 5 });
    }

    #[test]
    fn save_rules() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        assert!(matches!(s.save_to_library("thing"), Err(LibraryError::NothingToSave)));
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.accept_suggestion("line").unwrap();
        assert!(matches!(s.save_to_library("  "), Err(LibraryError::EmptyName)));
        let key = s.save_to_library_at("My Stick", Some(7)).unwrap();
        assert_eq!(key, "my-stick");
        let item = s.library().get("my-stick").unwrap();
        assert_eq!(item.kind, LibraryItemKind::UserPrimitive);
        assert_eq!(item.created, Some(7));
        assert_eq!(item.primitive.as_ref().unwrap().based_on, Some(ShapeType::Line));
        assert_eq!(s.components()[0].recognized_as, "my-stick");

        let before = s.library().clone();
        assert!(matches!(s.save_to_library("my stick"), Err(LibraryError::NameExists { .. })));
        assert_eq!(s.library(), &before);
    }

    #[test]
    fn save_composition_names_pending_art() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.add_stroke(line(0.0, 10.0, 100.0, 10.0));
        s.save_to_library_at("bars", None).unwrap();
        let names: Vec<&str> = s.components().iter().map(|c| c.recognized_as.as_str()).collect();
        assert_eq!(names, vec!["art0", "art1"]);
        let data = s.library().get("bars").unwrap().composition.as_ref().unwrap();
        assert_eq!(data.fingerprint.component_types, vec!["art", "art"]);
        assert!(data.fingerprint.fuzzy_relationships);
        assert_eq!(data.semantics.relationships, vec!["art0 touching art1"]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut s = Sketch::with_config(raw_config(), Library::new());
        s.add_stroke(line(0.0, 0.0, 100.0, 0.0));
        s.clear();
        assert!(s.components().is_empty());
        assert!(s.suggestions().is_empty());
        assert_eq!(s.selected(), None);
    }
}
