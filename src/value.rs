//! # Object Graph Values
//!
//! This module defines the dynamic value model that the cloner walks.
//!
//! - **`Value`**: a primitive (`Null`, `Bool`, `Number`, `String`), a `List`
//!   of values, or an `Object` handle to a composite.
//! - **`Object`**: a shared, interior-mutable handle to a value implementing
//!   [`Composite`]. Cloning an `Object` (or a `Value` holding one) with
//!   [`Clone`] only copies the handle, so both copies refer to the same
//!   composite. Deep, type-preserving copies are produced by
//!   [`crate::cloner::Cloner::clone`].
//! - **`FromValue`**: conversion from a `Value` into the concrete field types
//!   composites store, used by `Composite::set_field` implementations.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::Number;

use crate::composite::Composite;
use crate::error::Result;

/// A node in an object graph
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The blank sentinel; also the value of unset optional fields
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An ordered sequence, copied element by element
    List(Vec<Value>),
    /// A composite, shared by handle
    Object(Object),
}

impl Value {
    /// A short name for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Primitives and lists compare by value; objects compare by identity.
///
/// Structural comparison of composites is done on the flattened form, see
/// [`crate::cloner::Cloner::flatten`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "{}", object),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

/// Non-finite floats have no numeric representation and become `Null`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Shared handle to a composite value
#[derive(Clone)]
pub struct Object(Rc<RefCell<dyn Composite>>);

impl Object {
    pub fn new<T: Composite>(composite: T) -> Self {
        Object(Rc::new(RefCell::new(composite)))
    }

    /// Borrows the composite.
    ///
    /// # Panics
    ///
    /// Panics if the composite is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, dyn Composite> {
        self.0.borrow()
    }

    /// Mutably borrows the composite.
    ///
    /// # Panics
    ///
    /// Panics if the composite is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, dyn Composite> {
        self.0.borrow_mut()
    }

    /// Whether both handles refer to the same composite.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Address of the shared composite, used to recognise revisits.
    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    pub fn type_name(&self) -> &'static str {
        self.borrow().type_name()
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.borrow().field(name)
    }

    pub fn set_field(&self, name: &str, value: Value) -> Result<()> {
        self.borrow_mut().set_field(name, value)
    }

    /// Runs `f` on the composite if it is a `T`.
    pub fn with<T: Composite, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let composite = self.borrow();
        (*composite).as_any().downcast_ref::<T>().map(f)
    }

    /// Runs `f` on the composite mutably if it is a `T`.
    pub fn with_mut<T: Composite, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut composite = self.borrow_mut();
        (*composite).as_any_mut().downcast_mut::<T>().map(f)
    }

    pub fn is<T: Composite>(&self) -> bool {
        (*self.borrow()).as_any().is::<T>()
    }
}

// Shallow on purpose: a full dump would recurse forever on cyclic graphs.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(composite) => write!(f, "Object({} @ {:p})", composite.type_name(), self.addr()),
            Err(_) => write!(f, "Object(<borrowed> @ {:p})", self.addr()),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &*self.borrow())
    }
}

/// Conversion from a dynamic [`Value`] into a concrete field type.
pub trait FromValue: Sized {
    /// Kind name reported when the conversion fails
    const EXPECTED: &'static str;

    /// Returns `None` when `value` is not of the expected kind.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for Object {
    const EXPECTED: &'static str = "object";

    fn from_value(value: Value) -> Option<Self> {
        value.into_object()
    }
}

impl FromValue for Vec<Value> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// `Null` converts to `None`; anything else must convert to `T`.
impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
