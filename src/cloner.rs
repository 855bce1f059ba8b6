//! # Type-Preserving Cloner
//!
//! Deep-copies an object graph so that every registered composite in the copy
//! is a fresh instance of its original concrete type. The copy shares no
//! mutable state with the source at any registered composite.
//!
//! ## Pipeline
//!
//! [`Cloner::clone`] runs three passes:
//!
//! 1. **Tag** ([`Cloner::mark`]): depth-first walk over each composite's own
//!    declared fields. Registered composites are recorded with their type tag
//!    and descended into. Lists are descended into element by element.
//! 2. **Flatten** ([`Cloner::flatten`]): turns the marked tree into a
//!    type-erased [`Intermediate`], a `serde_json::Value` tree in which each
//!    composite is a JSON object with its fields plus a `"$tag"` entry.
//! 3. **Reconstruct** ([`Cloner::reconstruct`]): for every tagged node, builds
//!    a default instance of the tagged type and assigns each field from the
//!    reconstructed child node. The tag entry itself is never assigned.
//!
//! ## Limitations
//!
//! - Composites whose type is **not registered** are not traversed. They are
//!   carried through the intermediate form as opaque handles and the clone
//!   refers to the very same instance as the source. Mutations through one
//!   graph are visible through the other.
//! - **Cyclic graphs** are rejected with `Error::CyclicGraphDetected`. A
//!   composite that is merely shared by two parents (without a cycle) is
//!   copied once per parent.

use log::{debug, trace, warn};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::registry::{Tag, TypeRegistry};
use crate::value::{Object, Value};

/// Reserved intermediate field holding a composite's type tag
pub const TAG_FIELD: &str = "$tag";

/// Reserved intermediate field referencing an opaque, shallow-copied object
pub const OPAQUE_FIELD: &str = "$opaque";

/// Output of the tag pass
#[derive(Debug)]
pub enum Marked {
    /// A primitive leaf, already in its interchange form
    Primitive(JsonValue),
    List(Vec<Marked>),
    /// A registered composite and its marked fields
    Tagged {
        tag: Tag,
        fields: Vec<(&'static str, Marked)>,
    },
    /// An unregistered composite, passed through by handle
    Opaque(Object),
}

/// Type-erased form of a graph: a JSON tree plus the opaque handles it
/// references by index
#[derive(Debug, Default)]
pub struct Intermediate {
    tree: JsonValue,
    opaque: Vec<Object>,
}

impl Intermediate {
    /// Wraps a tree that references no opaque handles.
    pub fn from_tree(tree: JsonValue) -> Self {
        Self {
            tree,
            opaque: Vec::new(),
        }
    }

    pub fn tree(&self) -> &JsonValue {
        &self.tree
    }

    /// Number of unregistered objects carried through by reference.
    pub fn opaque_count(&self) -> usize {
        self.opaque.len()
    }
}

/// Deep, type-preserving cloner bound to one registry
#[derive(Debug)]
pub struct Cloner {
    registry: TypeRegistry,
}

impl Cloner {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Produces an independent, type-preserving deep copy of `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::CyclicGraphDetected` if a registered composite is
    /// reachable from itself, and `Error::FieldType` if a composite rejects
    /// a reconstructed field value.
    pub fn clone(&self, root: &Value) -> Result<Value> {
        let marked = self.mark(root)?;
        let intermediate = self.flatten(marked);
        debug!(
            "Flattened graph ({} opaque object(s) passed through)",
            intermediate.opaque_count()
        );
        self.reconstruct(&intermediate)
    }

    /// Tag pass: records the type tag of every reachable registered
    /// composite.
    pub fn mark(&self, root: &Value) -> Result<Marked> {
        let mut path = Vec::new();
        self.mark_recursive(root, &mut path)
    }

    fn mark_recursive(
        &self,
        value: &Value,
        path: &mut Vec<(*const (), &'static str)>,
    ) -> Result<Marked> {
        let object = match value {
            Value::Null => return Ok(Marked::Primitive(JsonValue::Null)),
            Value::Bool(b) => return Ok(Marked::Primitive(JsonValue::Bool(*b))),
            Value::Number(n) => return Ok(Marked::Primitive(JsonValue::Number(n.clone()))),
            Value::String(s) => return Ok(Marked::Primitive(JsonValue::String(s.clone()))),
            Value::List(items) => {
                let marked = items
                    .iter()
                    .map(|item| self.mark_recursive(item, path))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Marked::List(marked));
            }
            Value::Object(object) => object,
        };

        let Some(tag) = self.registry.tag_of_object(object) else {
            warn!(
                "Type '{}' is not registered; sharing it between original and clone (shallow copy)",
                object.type_name()
            );
            return Ok(Marked::Opaque(object.clone()));
        };

        let addr = object.addr();
        if let Some(start) = path.iter().position(|(seen, _)| *seen == addr) {
            let mut cycle: Vec<&str> = path[start..].iter().map(|(_, name)| *name).collect();
            cycle.push(object.type_name());
            return Err(Error::CyclicGraphDetected {
                cycle: cycle.join(" -> "),
            });
        }

        let fields = object.borrow().fields();
        trace!("Tagging {} as {}", object.type_name(), tag);

        path.push((addr, object.type_name()));
        let marked = fields
            .iter()
            .map(|(name, field)| Ok((*name, self.mark_recursive(field, path)?)))
            .collect::<Result<Vec<_>>>();
        path.pop();

        Ok(Marked::Tagged {
            tag,
            fields: marked?,
        })
    }

    /// Flatten pass: converts a marked graph into its intermediate form.
    pub fn flatten(&self, marked: Marked) -> Intermediate {
        let mut opaque = Vec::new();
        let tree = flatten_recursive(marked, &mut opaque);
        Intermediate { tree, opaque }
    }

    /// Reconstruct pass: rebuilds a graph from its intermediate form.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTypeTag` or `Error::Intermediate` if the
    /// intermediate form was not produced by this cloner's registry, and
    /// `Error::FieldType`/`Error::UnknownField` if a composite rejects a
    /// field.
    pub fn reconstruct(&self, intermediate: &Intermediate) -> Result<Value> {
        self.reconstruct_recursive(&intermediate.tree, &intermediate.opaque)
    }

    fn reconstruct_recursive(&self, node: &JsonValue, opaque: &[Object]) -> Result<Value> {
        match node {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            JsonValue::Number(n) => Ok(Value::Number(n.clone())),
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.reconstruct_recursive(item, opaque))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            JsonValue::Object(map) => {
                if let Some(handle) = map.get(OPAQUE_FIELD) {
                    return resolve_opaque(handle, opaque);
                }

                let tag = read_tag(map)?;
                let descriptor = self.registry.type_at(tag)?;
                let instance = descriptor.instantiate();
                trace!("Reconstructing {} from tag {}", descriptor.name(), tag);

                for (name, child) in map {
                    if name == TAG_FIELD {
                        continue;
                    }
                    let value = self.reconstruct_recursive(child, opaque)?;
                    instance.set_field(name, value)?;
                }

                Ok(Value::Object(instance))
            }
        }
    }
}

fn flatten_recursive(marked: Marked, opaque: &mut Vec<Object>) -> JsonValue {
    match marked {
        Marked::Primitive(leaf) => leaf,
        Marked::List(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|item| flatten_recursive(item, opaque))
                .collect(),
        ),
        Marked::Tagged { tag, fields } => {
            let mut map = Map::new();
            for (name, field) in fields {
                map.insert(name.to_string(), flatten_recursive(field, opaque));
            }
            map.insert(TAG_FIELD.to_string(), JsonValue::from(tag));
            JsonValue::Object(map)
        }
        Marked::Opaque(object) => {
            let mut map = Map::new();
            map.insert(OPAQUE_FIELD.to_string(), JsonValue::from(opaque.len()));
            opaque.push(object);
            JsonValue::Object(map)
        }
    }
}

fn read_tag(map: &Map<String, JsonValue>) -> Result<Tag> {
    let raw = map.get(TAG_FIELD).ok_or_else(|| Error::Intermediate {
        message: format!("object node without '{}' field", TAG_FIELD),
    })?;
    raw.as_u64()
        .and_then(|tag| Tag::try_from(tag).ok())
        .ok_or_else(|| Error::Intermediate {
            message: format!("'{}' must be a non-negative integer, found {}", TAG_FIELD, raw),
        })
}

fn resolve_opaque(handle: &JsonValue, opaque: &[Object]) -> Result<Value> {
    handle
        .as_u64()
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| opaque.get(idx))
        .map(|object| Value::Object(object.clone()))
        .ok_or_else(|| Error::Intermediate {
            message: format!("dangling opaque handle {}", handle),
        })
}
