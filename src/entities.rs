//! # Employee Records
//!
//! Sample composite types for an office directory, and `EmployeeFactory`, a
//! typed front end over a [`PrototypeFactory`] holding one prototype per
//! office.
//!
//! Every office shares a street address and city; only the employee name and
//! the suite number vary, so those are left blank in the prototypes.

use std::fmt;

use crate::cloner::Cloner;
use crate::composite::{convert_field, unknown_field, Composite};
use crate::error::{Error, Result};
use crate::factory::{Overrides, PrototypeFactory};
use crate::registry::TypeRegistry;
use crate::value::{Object, Value};

/// Key of the main office prototype
pub const MAIN_OFFICE: &str = "main";

/// Key of the auxiliary office prototype
pub const AUX_OFFICE: &str = "aux";

/// Office address; `suite` is the per-employee part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    suite: Option<i64>,
    street_address: Option<String>,
    city: Option<String>,
}

impl Address {
    pub fn new(suite: Option<i64>, street_address: &str, city: &str) -> Self {
        Self {
            suite,
            street_address: Some(street_address.to_string()),
            city: Some(city.to_string()),
        }
    }

    pub fn suite(&self) -> Option<i64> {
        self.suite
    }

    pub fn street_address(&self) -> Option<&str> {
        self.street_address.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Suite: {}, {}, {}",
            Value::from(self.suite),
            Value::from(self.street_address.clone()),
            Value::from(self.city.clone())
        )
    }
}

impl Composite for Address {
    fn type_name(&self) -> &'static str {
        "Address"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["suite", "street_address", "city"]
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "suite" => Some(self.suite.into()),
            "street_address" => Some(self.street_address.clone().into()),
            "city" => Some(self.city.clone().into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "suite" => self.suite = convert_field(self.type_name(), name, value)?,
            "street_address" => self.street_address = convert_field(self.type_name(), name, value)?,
            "city" => self.city = convert_field(self.type_name(), name, value)?,
            _ => return Err(unknown_field(self.type_name(), name)),
        }
        Ok(())
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Value::Object(Object::new(address))
    }
}

/// An employee and the office they work at
#[derive(Debug, Clone, Default)]
pub struct Employee {
    name: Option<String>,
    address: Option<Object>,
}

impl Employee {
    pub fn new(name: Option<&str>, address: Option<Object>) -> Self {
        Self {
            name: name.map(str::to_string),
            address,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn address(&self) -> Option<&Object> {
        self.address.as_ref()
    }

    pub fn greet(&self) -> String {
        format!(
            "Hi, my name is {}, I work at {}",
            Value::from(self.name.clone()),
            Value::from(self.address.clone())
        )
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} works at {}",
            Value::from(self.name.clone()),
            Value::from(self.address.clone())
        )
    }
}

impl Composite for Employee {
    fn type_name(&self) -> &'static str {
        "Employee"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "address"]
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.clone().into()),
            "address" => Some(self.address.clone().into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "name" => self.name = convert_field(self.type_name(), name, value)?,
            "address" => self.address = convert_field(self.type_name(), name, value)?,
            _ => return Err(unknown_field(self.type_name(), name)),
        }
        Ok(())
    }
}

impl From<Employee> for Value {
    fn from(employee: Employee) -> Self {
        Value::Object(Object::new(employee))
    }
}

/// Registry of the employee record types, `Employee` first.
pub fn employee_registry() -> Result<TypeRegistry> {
    TypeRegistry::builder()
        .register::<Employee>()
        .register::<Address>()
        .build()
}

/// Typed factory for employees of the two offices
pub struct EmployeeFactory {
    prototypes: PrototypeFactory,
}

impl EmployeeFactory {
    pub fn new() -> Result<Self> {
        let main = Employee::new(
            None,
            Some(Object::new(Address::new(None, "123 East Dr", "London"))),
        );
        let aux = Employee::new(
            None,
            Some(Object::new(Address::new(None, "200 London Rd", "Oxford"))),
        );

        let prototypes = PrototypeFactory::new(Cloner::new(employee_registry()?))
            .with_prototype(MAIN_OFFICE, main)
            .with_prototype(AUX_OFFICE, aux);

        Ok(Self { prototypes })
    }

    pub fn new_main_office_employee(&self, name: &str, suite: i64) -> Result<Object> {
        self.new_employee(MAIN_OFFICE, name, suite)
    }

    pub fn new_aux_office_employee(&self, name: &str, suite: i64) -> Result<Object> {
        self.new_employee(AUX_OFFICE, name, suite)
    }

    pub fn prototypes(&self) -> &PrototypeFactory {
        &self.prototypes
    }

    fn new_employee(&self, office: &str, name: &str, suite: i64) -> Result<Object> {
        let overrides = Overrides::new()
            .set("name", name)
            .set("address.suite", suite);
        self.prototypes
            .create(office, overrides)?
            .into_object()
            .ok_or_else(|| Error::Intermediate {
                message: format!("prototype '{}' is not a composite", office),
            })
    }
}
