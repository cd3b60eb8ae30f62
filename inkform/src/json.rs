use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LibraryError, LibraryResult};
use crate::library::LibraryItem;

pub const LIBRARY_VERSION: u64 = 1;

pub fn library_to_json(items: &BTreeMap<String, LibraryItem>) -> Value {
    #[derive(Serialize)]
    struct ItemSer<'a> {
        key: &'a str,
        #[serde(flatten)]
        item: &'a LibraryItem,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u64,
        items: Vec<ItemSer<'a>>,
    }
    let doc = Doc {
        version: LIBRARY_VERSION,
        items: items.iter().map(|(key, item)| ItemSer { key, item }).collect(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Reads a `{version, items: [...]}` document. A missing version is read as 1;
/// later duplicates of a key replace earlier ones.
pub fn library_from_json(v: Value) -> LibraryResult<BTreeMap<String, LibraryItem>> {
    #[derive(Deserialize)]
    struct ItemDe {
        key: String,
        #[serde(flatten)]
        item: LibraryItem,
    }
    #[derive(Deserialize)]
    struct Doc {
        version: Option<u64>,
        #[serde(default)]
        items: Vec<ItemDe>,
    }
    let doc: Doc = serde_json::from_value(v)?;
    let version = doc.version.unwrap_or(LIBRARY_VERSION);
    if version != LIBRARY_VERSION {
        return Err(LibraryError::UnsupportedVersion(version));
    }
    Ok(doc.items.into_iter().map(|d| (d.key, d.item)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Library;

    #[test]
    fn document_shape() {
        let v = Library::new().to_json_value();
        assert_eq!(v["version"], 1);
        let items = v["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["key"], "circle");
        assert_eq!(items[0]["kind"], "builtin-primitive");
        assert_eq!(items[0]["shape_type"], "circle");
    }

    #[test]
    fn rejects_future_versions() {
        let v = serde_json::json!({"version": 9, "items": []});
        assert!(matches!(library_from_json(v), Err(LibraryError::UnsupportedVersion(9))));
    }

    #[test]
    fn malformed_is_json_error() {
        let v = serde_json::json!({"items": [{"key": "x"}]});
        assert!(matches!(library_from_json(v), Err(LibraryError::Json(_))));
    }
}
