//! # Type Registry
//!
//! The registry is the single source of truth for which composite types get
//! deep-copied. It is an ordered, duplicate-free list of type descriptors; a
//! type's position in the list is its **type tag**.
//!
//! Each descriptor carries the type's name, its `TypeId` and a constructor
//! for a fresh default instance, so mapping a tag back to a concrete type is
//! a table lookup.
//!
//! ## Example
//!
//! ```
//! use proto_forge::entities::{Address, Employee};
//! use proto_forge::registry::TypeRegistry;
//! use proto_forge::value::{Object, Value};
//!
//! let registry = TypeRegistry::builder()
//!     .register::<Employee>()
//!     .register::<Address>()
//!     .build()
//!     .unwrap();
//!
//! let address = Value::from(Object::new(Address::default()));
//! assert_eq!(registry.tag_of(&address), Some(1));
//! assert_eq!(registry.type_at(1).unwrap().name(), "Address");
//! ```

use std::any::TypeId;

use log::debug;

use crate::composite::Composite;
use crate::error::{Error, Result};
use crate::value::{Object, Value};

/// Position of a type within its registry
pub type Tag = usize;

/// Prefix reserved for marker fields in the intermediate form
pub const RESERVED_PREFIX: char = '$';

/// Everything the cloner needs to know about one registered type
#[derive(Clone, Copy, Debug)]
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    construct: fn() -> Object,
}

impl TypeDescriptor {
    /// Describes `T`, taking its name from a default instance.
    pub fn of<T: Composite + Default>() -> Self {
        Self {
            name: T::default().type_name(),
            type_id: TypeId::of::<T>(),
            construct: construct::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// A fresh, default instance of the type.
    pub fn instantiate(&self) -> Object {
        (self.construct)()
    }
}

fn construct<T: Composite + Default>() -> Object {
    Object::new(T::default())
}

/// Ordered, immutable set of composite types eligible for deep cloning
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Tag of the value's runtime type, `None` for primitives, lists and
    /// composites whose type is not registered.
    pub fn tag_of(&self, value: &Value) -> Option<Tag> {
        value.as_object().and_then(|object| self.tag_of_object(object))
    }

    pub fn tag_of_object(&self, object: &Object) -> Option<Tag> {
        let type_id = (*object.borrow()).as_any().type_id();
        self.types.iter().position(|ty| ty.type_id == type_id)
    }

    /// Descriptor registered under `tag`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownTypeTag` if `tag` is out of range, which only
    /// happens for an intermediate form that was corrupted or produced by a
    /// different registry.
    pub fn type_at(&self, tag: Tag) -> Result<&TypeDescriptor> {
        self.types.get(tag).ok_or(Error::UnknownTypeTag {
            tag,
            registered: self.types.len(),
        })
    }

    pub fn tag_by_name(&self, name: &str) -> Option<Tag> {
        self.types.iter().position(|ty| ty.name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }
}

/// Collects descriptors and validates them into a [`TypeRegistry`]
#[derive(Default)]
pub struct TypeRegistryBuilder {
    types: Vec<TypeDescriptor>,
}

impl TypeRegistryBuilder {
    /// Appends `T`; its tag is the number of types registered before it.
    pub fn register<T: Composite + Default>(mut self) -> Self {
        self.types.push(TypeDescriptor::of::<T>());
        self
    }

    /// Validates the collected types.
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateType` if a type, or a type name, appears twice.
    /// - `Error::ReservedField` if a type declares a field starting with `$`.
    pub fn build(self) -> Result<TypeRegistry> {
        for (idx, ty) in self.types.iter().enumerate() {
            let duplicate = self.types[..idx]
                .iter()
                .any(|prev| prev.type_id == ty.type_id || prev.name == ty.name);
            if duplicate {
                return Err(Error::DuplicateType {
                    name: ty.name.to_string(),
                });
            }

            let sample = ty.instantiate();
            let field_names = sample.borrow().field_names();
            if let Some(field) = field_names
                .iter()
                .find(|field| field.starts_with(RESERVED_PREFIX))
            {
                return Err(Error::ReservedField {
                    type_name: ty.name.to_string(),
                    field: field.to_string(),
                });
            }
        }

        debug!(
            "Built type registry: [{}]",
            self.types
                .iter()
                .map(|ty| ty.name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(TypeRegistry { types: self.types })
    }
}
