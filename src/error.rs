//! # Error Handling
//!
//! This module defines the centralized error type for `proto-forge`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure the cloner, the type registry, the prototype factory, and the
//! catalog loader can report.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries enough context (type
//!   names, field paths, prototype keys) to explain the failure without a
//!   debugger.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Copying a value whose type is not registered is deliberately *not* an
//! error: such values are passed through shallowly and stay shared between
//! the source graph and the clone. See [`crate::cloner`] for details.
//!
//! None of these errors are transient. The same input always produces the
//! same outcome, so callers should not retry.

use thiserror::Error;

/// Main error type for proto-forge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A prototype was requested under a key the factory does not know.
    #[error("Unknown prototype key '{key}' (available: {})", available.join(", "))]
    UnknownPrototypeKey {
        key: String,
        /// Keys that are registered with the factory, in catalog order
        available: Vec<String>,
    },

    /// An override names a field path that does not exist on the cloned
    /// prototype.
    #[error("Unknown override field '{path}': {message}")]
    UnknownOverrideField { path: String, message: String },

    /// A registered composite was reached again while still being traversed.
    #[error("Cyclic object graph detected: {cycle}")]
    CyclicGraphDetected { cycle: String },

    /// An intermediate node carries a tag outside the registry's range.
    ///
    /// This only happens when the intermediate form was corrupted or produced
    /// by a different registry.
    #[error("Unknown type tag {tag} (registry holds {registered} types)")]
    UnknownTypeTag { tag: usize, registered: usize },

    /// A type name was used that the registry does not contain.
    #[error("Unknown composite type '{name}'")]
    UnknownTypeName { name: String },

    /// The same type was registered twice.
    #[error("Type '{name}' is already registered")]
    DuplicateType { name: String },

    /// A composite declares a field whose name collides with the reserved
    /// markers of the intermediate form.
    #[error("Type '{type_name}' declares reserved field name '{field}'")]
    ReservedField { type_name: String, field: String },

    /// A field was assigned that the composite does not declare.
    #[error("Type '{type_name}' has no field '{field}'")]
    UnknownField { type_name: String, field: String },

    /// A field was assigned a value of the wrong kind.
    #[error("Field '{type_name}.{field}' expects {expected}, found {found}")]
    FieldType {
        type_name: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The intermediate form does not have the shape the cloner produced.
    #[error("Malformed intermediate form: {message}")]
    Intermediate { message: String },

    /// An error occurred while parsing a prototype catalog.
    ///
    /// Includes the specific parsing issue and optionally a hint about how
    /// to fix it.
    #[error("Catalog parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the catalog
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
