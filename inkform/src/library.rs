//! The shape library: built-in primitives, user-saved primitives and saved
//! compositions, keyed by a slug derived from the display name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LibraryError, LibraryResult};
use crate::model::{Component, CompositionFingerprint, Fingerprint, Point, ShapeType, SpatialGraph};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryItemKind {
    BuiltinPrimitive,
    UserPrimitive,
    BuiltinComposition,
    Composition,
}

impl LibraryItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LibraryItemKind::BuiltinPrimitive => "builtin-primitive",
            LibraryItemKind::UserPrimitive => "user-primitive",
            LibraryItemKind::BuiltinComposition => "builtin-composition",
            LibraryItemKind::Composition => "composition",
        }
    }

    pub fn is_builtin(self) -> bool {
        matches!(self, LibraryItemKind::BuiltinPrimitive | LibraryItemKind::BuiltinComposition)
    }

    pub fn is_composition(self) -> bool {
        matches!(self, LibraryItemKind::BuiltinComposition | LibraryItemKind::Composition)
    }
}

/// Human-readable summary of a saved composition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Semantics {
    pub name: String,
    pub component_types: Vec<String>,
    /// Entries read `"<a> <relationship> <b>"` using the components' names.
    pub relationships: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveData {
    pub strokes: Vec<Vec<Point>>,
    pub fingerprint: Fingerprint,
    #[serde(default)]
    pub based_on: Option<ShapeType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionData {
    pub components: Vec<Component>,
    pub fingerprint: CompositionFingerprint,
    pub spatial_graph: SpatialGraph,
    pub semantics: Semantics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub kind: LibraryItemKind,
    pub label: String,
    #[serde(default)]
    pub shape_type: Option<ShapeType>,
    #[serde(default)]
    pub usage_count: u32,
    /// Unix millis.
    #[serde(default)]
    pub created: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primitive: Option<PrimitiveData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionData>,
}

impl LibraryItem {
    pub fn builtin(shape: ShapeType) -> Self {
        LibraryItem {
            kind: LibraryItemKind::BuiltinPrimitive,
            label: shape.label().to_string(),
            shape_type: Some(shape),
            usage_count: 0,
            created: None,
            primitive: None,
            composition: None,
        }
    }

    /// Type a component referencing this item takes during matching: the
    /// built-in shape when there is one, else the item kind.
    pub fn match_kind(&self) -> &'static str {
        match self.shape_type {
            Some(t) => t.as_str(),
            None => self.kind.as_str(),
        }
    }

    pub fn composition_fingerprint(&self) -> Option<&CompositionFingerprint> {
        if !self.kind.is_composition() {
            return None;
        }
        self.composition.as_ref().map(|c| &c.fingerprint)
    }
}

pub const BUILTIN_SHAPES: [ShapeType; 3] = [ShapeType::Circle, ShapeType::Triangle, ShapeType::Rectangle];

#[derive(Clone, Debug, PartialEq)]
pub struct Library {
    items: BTreeMap<String, LibraryItem>,
}

impl Default for Library {
    fn default() -> Self {
        Library::new()
    }
}

impl Library {
    /// Library seeded with the built-in primitives.
    pub fn new() -> Self {
        let mut items = BTreeMap::new();
        for shape in BUILTIN_SHAPES {
            items.insert(shape.as_str().to_string(), LibraryItem::builtin(shape));
        }
        Library { items }
    }

    pub fn empty() -> Self {
        Library { items: BTreeMap::new() }
    }

    /// Lowercased name with whitespace runs collapsed to '-'.
    pub fn derive_key(name: &str) -> LibraryResult<String> {
        let key = name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase();
        if key.is_empty() {
            return Err(LibraryError::EmptyName);
        }
        Ok(key)
    }

    pub fn get(&self, key: &str) -> Option<&LibraryItem> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LibraryItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item; an existing key is rejected and the library left untouched.
    pub fn insert(&mut self, key: impl Into<String>, item: LibraryItem) -> LibraryResult<()> {
        let key = key.into();
        if self.items.contains_key(&key) {
            return Err(LibraryError::NameExists { key });
        }
        tracing::debug!(key = %key, kind = item.kind.as_str(), "library item added");
        self.items.insert(key, item);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> LibraryResult<LibraryItem> {
        match self.items.get(key) {
            None => Err(LibraryError::NotFound { key: key.to_string() }),
            Some(item) if item.kind.is_builtin() => {
                Err(LibraryError::BuiltinProtected { key: key.to_string() })
            }
            Some(_) => self
                .items
                .remove(key)
                .ok_or_else(|| LibraryError::NotFound { key: key.to_string() }),
        }
    }

    /// Increments the usage counter; false when the key is unknown.
    pub fn bump_usage(&mut self, key: &str) -> bool {
        match self.items.get_mut(key) {
            Some(item) => {
                item.usage_count = item.usage_count.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Saved compositions, most components first. Equal counts keep key order.
    pub fn compositions(&self) -> Vec<(&str, &LibraryItem)> {
        let mut out: Vec<(&str, &LibraryItem)> = self
            .iter()
            .filter(|(_, item)| item.composition_fingerprint().is_some())
            .collect();
        out.sort_by_key(|(_, item)| {
            std::cmp::Reverse(item.composition_fingerprint().map_or(0, |f| f.component_count))
        });
        out
    }

    pub fn user_primitives(&self) -> impl Iterator<Item = (&str, &LibraryItem, &PrimitiveData)> {
        self.iter().filter_map(|(k, item)| match (&item.kind, &item.primitive) {
            (LibraryItemKind::UserPrimitive, Some(p)) => Some((k, item, p)),
            _ => None,
        })
    }

    /// Type a canvas component named `recognized_as` takes during matching.
    pub fn resolve_kind(&self, recognized_as: &str) -> String {
        match self.items.get(recognized_as) {
            Some(item) => item.match_kind().to_string(),
            None => recognized_as.to_string(),
        }
    }

    pub fn to_json_value(&self) -> Value {
        crate::json::library_to_json(&self.items)
    }

    pub fn from_json_value(v: Value) -> LibraryResult<Library> {
        let items = crate::json::library_from_json(v)?;
        Ok(Library { items })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    pub fn from_json_str(s: &str) -> LibraryResult<Library> {
        let v: Value = serde_json::from_str(s)?;
        Library::from_json_value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_seeded() {
        let lib = Library::new();
        assert_eq!(lib.keys().collect::<Vec<_>>(), vec!["circle", "rectangle", "triangle"]);
        let circle = lib.get("circle").unwrap();
        assert_eq!(circle.kind, LibraryItemKind::BuiltinPrimitive);
        assert_eq!(circle.label, "Circle");
        assert_eq!(circle.usage_count, 0);
        assert_eq!(lib.resolve_kind("circle"), "circle");
        assert_eq!(lib.resolve_kind("line"), "line");
    }

    #[test]
    fn derive_key_slugifies() {
        assert_eq!(Library::derive_key("My  Arrow").unwrap(), "my-arrow");
        assert_eq!(Library::derive_key(" House\tTop ").unwrap(), "house-top");
        assert!(matches!(Library::derive_key("   "), Err(LibraryError::EmptyName)));
    }

    #[test]
    fn builtins_cannot_be_removed() {
        let mut lib = Library::new();
        assert!(matches!(lib.remove("circle"), Err(LibraryError::BuiltinProtected { .. })));
        assert!(matches!(lib.remove("nope"), Err(LibraryError::NotFound { .. })));
        assert_eq!(lib.len(), 3);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut lib = Library::new();
        let err = lib.insert("circle", LibraryItem::builtin(ShapeType::Triangle)).unwrap_err();
        assert!(matches!(err, LibraryError::NameExists { ref key } if key == "circle"));
        assert_eq!(lib.get("circle").unwrap().shape_type, Some(ShapeType::Circle));
    }

    #[test]
    fn bump_usage_counts() {
        let mut lib = Library::new();
        assert!(lib.bump_usage("triangle"));
        assert!(lib.bump_usage("triangle"));
        assert!(!lib.bump_usage("hexagon"));
        assert_eq!(lib.get("triangle").unwrap().usage_count, 2);
    }
}
