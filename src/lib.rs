//! # Proto Forge Library
//!
//! This library deep-copies graphs of typed composite objects while
//! preserving each node's concrete type, and builds a prototype factory on
//! top of that: a catalog of pre-built graphs from which customized,
//! fully independent instances are minted.
//!
//! ## Quick Example
//!
//! ```
//! use proto_forge::entities::EmployeeFactory;
//!
//! let factory = EmployeeFactory::new().unwrap();
//! let john = factory.new_main_office_employee("John", 4321).unwrap();
//! let jane = factory.new_aux_office_employee("Jane", 222).unwrap();
//!
//! assert_eq!(john.to_string(), "John works at Suite: 4321, 123 East Dr, London");
//! assert_eq!(jane.to_string(), "Jane works at Suite: 222, 200 London Rd, Oxford");
//! ```
//!
//! ## Core Concepts
//!
//! - **Values (`value`)**: the dynamic object model. Primitives, lists, and
//!   shared handles to composites.
//! - **Composites (`composite`)**: types with named fields that can be taken
//!   apart and rebuilt.
//! - **Type Registry (`registry`)**: the ordered set of composite types that
//!   get deep-copied; a type's position is its type tag.
//! - **Cloner (`cloner`)**: the tag, flatten, and reconstruct pipeline.
//! - **Prototype Factory (`factory`)**: named prototypes plus field-path
//!   overrides (`path`).
//! - **Catalog Configuration (`config`)**: YAML descriptions of prototypes.
//! - **Employee Records (`entities`)**: sample composites and a typed
//!   factory for them.
//!
//! ## Execution Flow
//!
//! A call to `PrototypeFactory::create` runs the following steps:
//!
//! 1.  **Lookup**: Find the prototype stored under the requested key.
//! 2.  **Tag**: Walk the prototype and record the tag of every registered
//!     composite.
//! 3.  **Flatten**: Convert the tagged graph into a type-erased JSON tree.
//! 4.  **Reconstruct**: Rebuild every tagged node as a fresh instance of its
//!     original type.
//! 5.  **Override**: Assign the caller's values at their field paths.

pub mod cloner;
pub mod composite;
pub mod config;
pub mod entities;
pub mod error;
pub mod factory;
pub mod path;
pub mod registry;
pub mod value;

#[cfg(test)]
mod cloner_proptest;
