//! Error types for the library store and sketch session.
//!
//! Recognition itself is total and never fails; only operations that mutate
//! caller-owned state can be rejected.

use thiserror::Error;

/// Library store error type
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A library item already uses the key derived from the requested name
    #[error("Name already exists: {key}")]
    NameExists {
        /// The derived key that collided.
        key: String,
    },

    /// The name derives an empty key
    #[error("Library names must contain a non-whitespace character")]
    EmptyName,

    /// Save requested with no strokes on the canvas
    #[error("Nothing to save: the canvas is empty")]
    NothingToSave,

    /// No item with this key
    #[error("Library item not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// Built-in items cannot be deleted
    #[error("Built-in library item cannot be deleted: {key}")]
    BuiltinProtected {
        /// The built-in key.
        key: String,
    },

    /// Malformed library document
    #[error("Invalid library JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Document version this build does not read
    #[error("Unsupported library version {0}")]
    UnsupportedVersion(u64),
}

/// Sketch session error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// No component with this index on the canvas
    #[error("Invalid component index {index}")]
    InvalidComponent {
        /// The requested index.
        index: usize,
    },

    /// An operation needed a selected stroke but none is selected
    #[error("No stroke is selected")]
    NoSelection,
}

impl LibraryError {
    /// Stable machine-readable code, used by bindings.
    pub fn code(&self) -> &'static str {
        match self {
            LibraryError::NameExists { .. } => "name_exists",
            LibraryError::EmptyName => "empty_name",
            LibraryError::NothingToSave => "nothing_to_save",
            LibraryError::NotFound { .. } => "not_found",
            LibraryError::BuiltinProtected { .. } => "builtin_protected",
            LibraryError::Json(_) => "invalid_json",
            LibraryError::UnsupportedVersion(_) => "unsupported_version",
        }
    }
}

impl SketchError {
    pub fn code(&self) -> &'static str {
        match self {
            SketchError::InvalidComponent { .. } => "invalid_component",
            SketchError::NoSelection => "no_selection",
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
