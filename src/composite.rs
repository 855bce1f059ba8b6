//! # Composite Types
//!
//! A composite is a value with named fields that the cloner can take apart and
//! put back together. Implementors describe their own declared fields and
//! accept assignments to them; everything else (runtime type identity, the
//! fresh "empty" instance used during reconstruction) comes from the
//! [`crate::registry::TypeRegistry`].
//!
//! Behavior lives on the concrete type, so a clone that is rebuilt as the same
//! concrete type keeps its methods, not just its data.

use std::any::Any;
use std::fmt;

use crate::error::{Error, Result};
use crate::value::{FromValue, Value};

/// Access to the concrete type behind a `dyn Composite`.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value with named fields that can be deep-cloned.
///
/// Registering a type additionally requires `Default`: reconstruction starts
/// from a default instance and assigns every field with [`set_field`].
///
/// [`set_field`]: Composite::set_field
pub trait Composite: AsAny + fmt::Display + 'static {
    /// Name the type is registered and looked up under.
    fn type_name(&self) -> &'static str;

    /// The type's own declared fields, in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    /// Current value of a declared field, `None` if the field does not exist.
    fn field(&self, name: &str) -> Option<Value>;

    /// Assigns a declared field.
    ///
    /// Fails with [`Error::UnknownField`] for undeclared names and
    /// [`Error::FieldType`] when the value has the wrong kind.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    /// Snapshot of every declared field.
    fn fields(&self) -> Vec<(&'static str, Value)> {
        self.field_names()
            .iter()
            .filter_map(|name| self.field(name).map(|value| (*name, value)))
            .collect()
    }
}

/// Converts `value` into the field type `T`, reporting a [`Error::FieldType`]
/// against `type_name.field` on mismatch.
pub fn convert_field<T: FromValue>(type_name: &str, field: &str, value: Value) -> Result<T> {
    let found = value.kind();
    T::from_value(value).ok_or_else(|| Error::FieldType {
        type_name: type_name.to_string(),
        field: field.to_string(),
        expected: T::EXPECTED,
        found,
    })
}

/// The error for assigning a field a composite does not declare.
pub fn unknown_field(type_name: &str, field: &str) -> Error {
    Error::UnknownField {
        type_name: type_name.to_string(),
        field: field.to_string(),
    }
}
