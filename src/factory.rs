//! # Prototype Factory
//!
//! A small, named catalog of pre-built object graphs ("prototypes") and a
//! uniform way to mint customized, independent instances from them.
//!
//! Prototypes hold blank (`null`) values at the fields meant to vary per
//! instance. [`PrototypeFactory::create`] deep-clones the prototype with the
//! factory's [`Cloner`] and then applies the caller's overrides to the clone.
//! The stored prototype is never handed out and never mutated, so every call
//! starts from the same baseline.
//!
//! ## Example
//!
//! ```
//! use proto_forge::cloner::Cloner;
//! use proto_forge::entities::{employee_registry, Address, Employee};
//! use proto_forge::factory::{Overrides, PrototypeFactory};
//! use proto_forge::value::Object;
//!
//! let prototype = Employee::new(
//!     None,
//!     Some(Object::new(Address::new(None, "123 East Dr", "London"))),
//! );
//! let factory = PrototypeFactory::new(Cloner::new(employee_registry().unwrap()))
//!     .with_prototype("main", prototype);
//!
//! let john = factory
//!     .create("main", Overrides::new().set("name", "John").set("address.suite", 4321))
//!     .unwrap();
//! assert_eq!(john.to_string(), "John works at Suite: 4321, 123 East Dr, London");
//! ```

use log::debug;

use crate::cloner::Cloner;
use crate::config::{self, Catalog};
use crate::error::{Error, Result};
use crate::path::{parse_path, PathSegment};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Ordered field-path assignments applied to a fresh clone
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    entries: Vec<(String, Value)>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment; later assignments to the same path win.
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((path.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(path, value)| (path.as_str(), value))
    }
}

impl<P: Into<String>, V: Into<Value>> FromIterator<(P, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(path, value)| (path.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Overrides {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Named prototypes plus the cloner used to copy them
#[derive(Debug)]
pub struct PrototypeFactory {
    cloner: Cloner,
    prototypes: Vec<(String, Value)>,
}

impl PrototypeFactory {
    pub fn new(cloner: Cloner) -> Self {
        Self {
            cloner,
            prototypes: Vec::new(),
        }
    }

    /// Builds a factory holding every prototype of a parsed catalog.
    ///
    /// # Errors
    ///
    /// Fails if a prototype names an unregistered type, a field its type
    /// does not declare, or a value of the wrong kind.
    pub fn from_catalog(cloner: Cloner, catalog: &Catalog) -> Result<Self> {
        let mut factory = Self::new(cloner);
        for (key, document) in &catalog.prototypes {
            let prototype = config::build_value(&factory.cloner, document)?;
            debug!("Loaded prototype '{}' ({})", key, prototype.kind());
            factory = factory.with_prototype(key.clone(), prototype);
        }
        Ok(factory)
    }

    /// Registers `prototype` under `key`, replacing any previous one.
    pub fn with_prototype(mut self, key: impl Into<String>, prototype: impl Into<Value>) -> Self {
        let key = key.into();
        let prototype = prototype.into();
        match self.prototypes.iter().position(|(existing, _)| *existing == key) {
            Some(idx) => self.prototypes[idx].1 = prototype,
            None => self.prototypes.push((key, prototype)),
        }
        self
    }

    /// Prototype keys in registration order.
    pub fn prototype_keys(&self) -> impl Iterator<Item = &str> {
        self.prototypes.iter().map(|(key, _)| key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.prototypes.iter().any(|(existing, _)| existing == key)
    }

    pub fn cloner(&self) -> &Cloner {
        &self.cloner
    }

    /// Clones the prototype stored under `key` and applies `overrides`.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownPrototypeKey` if no prototype is stored under `key`.
    /// - `Error::UnknownOverrideField` if an override path does not name an
    ///   existing field of the clone, or reaches into an unregistered
    ///   composite shared with the prototype.
    /// - `Error::FieldType` if an override value has the wrong kind.
    pub fn create(&self, key: &str, overrides: Overrides) -> Result<Value> {
        let prototype = self
            .prototypes
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, prototype)| prototype)
            .ok_or_else(|| Error::UnknownPrototypeKey {
                key: key.to_string(),
                available: self.prototype_keys().map(str::to_string).collect(),
            })?;

        debug!(
            "Creating instance of prototype '{}' with {} override(s)",
            key,
            overrides.len()
        );

        let mut instance = self.cloner.clone(prototype)?;
        for (path, value) in overrides {
            apply_override(self.cloner.registry(), &mut instance, &path, value)?;
        }
        Ok(instance)
    }
}

/// Assigns `value` at the field path `path` inside `target`.
///
/// Only composites whose type is in `registry` are written to. An
/// unregistered composite inside a clone is still shared with the graph it
/// was cloned from, so assigning through it would change that graph too.
///
/// # Errors
///
/// Returns `Error::UnknownOverrideField` if the path is empty or malformed,
/// if a segment names a field the composite does not declare, an index past
/// the end of a list, or tries to descend into a primitive or an unregistered
/// composite.
pub fn apply_override(
    registry: &TypeRegistry,
    target: &mut Value,
    path: &str,
    value: Value,
) -> Result<()> {
    let segments = parse_path(path)?;
    assign(registry, target, &segments, value, path)
}

fn assign(
    registry: &TypeRegistry,
    target: &mut Value,
    segments: &[PathSegment],
    value: Value,
    path: &str,
) -> Result<()> {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    match (head, target) {
        (PathSegment::Key(key), Value::Object(object)) => {
            if registry.tag_of_object(object).is_none() {
                return Err(Error::UnknownOverrideField {
                    path: path.to_string(),
                    message: format!(
                        "cannot override inside unregistered type '{}'",
                        object.type_name()
                    ),
                });
            }
            let mut child = object.field(key).ok_or_else(|| Error::UnknownOverrideField {
                path: path.to_string(),
                message: format!("{} has no field '{}'", object.type_name(), key),
            })?;
            assign(registry, &mut child, rest, value, path)?;
            object.set_field(key, child)
        }
        (PathSegment::Index(idx), Value::List(items)) => {
            let len = items.len();
            let slot = items
                .get_mut(*idx)
                .ok_or_else(|| Error::UnknownOverrideField {
                    path: path.to_string(),
                    message: format!("index {} is out of bounds for a list of {}", idx, len),
                })?;
            assign(registry, slot, rest, value, path)
        }
        (segment, other) => Err(Error::UnknownOverrideField {
            path: path.to_string(),
            message: format!("cannot look up {} in a {} value", segment, other.kind()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::{convert_field, unknown_field, Composite};
    use crate::entities::{employee_registry, Address, Employee};
    use crate::value::Object;
    use std::fmt;

    /// Deliberately left out of the employee registry
    #[derive(Default)]
    struct Badge {
        id: i64,
    }

    impl fmt::Display for Badge {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "badge#{}", self.id)
        }
    }

    impl Composite for Badge {
        fn type_name(&self) -> &'static str {
            "Badge"
        }

        fn field_names(&self) -> &'static [&'static str] {
            &["id"]
        }

        fn field(&self, name: &str) -> Option<Value> {
            (name == "id").then(|| Value::from(self.id))
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "id" => self.id = convert_field(self.type_name(), name, value)?,
                _ => return Err(unknown_field(self.type_name(), name)),
            }
            Ok(())
        }
    }

    fn factory() -> PrototypeFactory {
        let main = Employee::new(
            None,
            Some(Object::new(Address::new(None, "123 East Dr", "London"))),
        );
        PrototypeFactory::new(Cloner::new(employee_registry().unwrap()))
            .with_prototype("main", main)
            .with_prototype("team", vec![Value::from("lead"), Value::from("dev")])
    }

    #[test]
    fn test_create_applies_overrides() {
        let factory = factory();
        let john = factory
            .create(
                "main",
                Overrides::new().set("name", "John").set("address.suite", 4321),
            )
            .unwrap();
        assert_eq!(
            john.to_string(),
            "John works at Suite: 4321, 123 East Dr, London"
        );
    }

    #[test]
    fn test_create_unknown_key() {
        let factory = factory();
        let err = factory.create("unknown-key", Overrides::new()).unwrap_err();
        match err {
            Error::UnknownPrototypeKey { key, available } => {
                assert_eq!(key, "unknown-key");
                assert_eq!(available, vec!["main", "team"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_create_unknown_override_field() {
        let factory = factory();
        let err = factory
            .create("main", Overrides::new().set("address.floor", 3))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown override field 'address.floor': Address has no field 'floor'"
        );
    }

    #[test]
    fn test_create_override_through_primitive() {
        let factory = factory();
        let err = factory
            .create("main", Overrides::new().set("name.first", "John"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOverrideField { .. }));
        assert!(err.to_string().contains("in a null value"));
    }

    #[test]
    fn test_create_override_wrong_type() {
        let factory = factory();
        let err = factory
            .create("main", Overrides::new().set("address.suite", "upstairs"))
            .unwrap_err();
        assert!(matches!(err, Error::FieldType { .. }));
    }

    #[test]
    fn test_create_override_list_index() {
        let factory = factory();
        let team = factory
            .create("team", Overrides::new().set("[1]", "ops"))
            .unwrap();
        assert_eq!(team.to_string(), "[lead, ops]");

        let err = factory
            .create("team", Overrides::new().set("[2]", "qa"))
            .unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_create_rejects_paths_naming_no_field() {
        let factory = factory();
        for path in ["", "   ", "..", "address..suite", "name["] {
            let err = factory
                .create("main", Overrides::new().set(path, 7))
                .unwrap_err();
            assert!(
                matches!(err, Error::UnknownOverrideField { .. }),
                "path {:?} gave {}",
                path,
                err
            );
        }
        assert_eq!(
            factory.create("main", Overrides::new()).unwrap().to_string(),
            "null works at Suite: null, 123 East Dr, London"
        );
    }

    #[test]
    fn test_create_never_writes_through_unregistered_composite() {
        let badge = Object::new(Badge { id: 0 });
        let factory = factory().with_prototype("kit", vec![Value::Object(badge.clone())]);

        let err = factory
            .create("kit", Overrides::new().set("[0].id", 42))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown override field '[0].id': cannot override inside unregistered type 'Badge'"
        );

        assert_eq!(
            factory.create("kit", Overrides::new()).unwrap().to_string(),
            "[badge#0]"
        );
        assert_eq!(badge.to_string(), "badge#0");
    }

    #[test]
    fn test_create_replaces_unregistered_list_item() {
        let badge = Object::new(Badge { id: 0 });
        let factory = factory().with_prototype("kit", vec![Value::Object(badge)]);
        let kit = factory
            .create("kit", Overrides::new().set("[0]", "lanyard"))
            .unwrap();
        assert_eq!(kit.to_string(), "[lanyard]");
        assert_eq!(
            factory.create("kit", Overrides::new()).unwrap().to_string(),
            "[badge#0]"
        );
    }

    #[test]
    fn test_with_prototype_replaces_existing_key() {
        let factory = factory().with_prototype("team", Value::from("replaced"));
        assert_eq!(
            factory.prototype_keys().collect::<Vec<_>>(),
            vec!["main", "team"]
        );
        assert!(factory.contains("team"));
        assert!(!factory.contains("kit"));
        assert_eq!(
            factory.create("team", Overrides::new()).unwrap(),
            Value::from("replaced")
        );
    }

    #[test]
    fn test_overrides_from_iterator() {
        let overrides: Overrides = vec![
            ("name", Value::from("Jane")),
            ("address.suite", Value::from(222)),
        ]
        .into_iter()
        .collect();
        assert_eq!(overrides.len(), 2);
        let paths: Vec<&str> = overrides.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["name", "address.suite"]);
    }
}
