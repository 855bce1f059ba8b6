//! # Prototype Catalog Configuration
//!
//! This module defines the YAML format used to describe a catalog of
//! prototypes and the logic for turning it into object graphs.
//!
//! ## Format
//!
//! ```yaml
//! prototypes:
//!   main:
//!     $type: Employee
//!     name: null
//!     address:
//!       $type: Address
//!       suite: null
//!       street_address: 123 East Dr
//!       city: London
//! ```
//!
//! - A mapping with a `$type` key is a composite of that registered type; its
//!   other keys are field names.
//! - Sequences become lists and scalars become primitives.
//! - `null` marks a blank field to be filled in per instance.
//!
//! Documents are translated into the cloner's intermediate form (type names
//! replaced by type tags) and rebuilt with [`Cloner::reconstruct`], so a
//! catalog entry goes through exactly the same field validation as a clone.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;

use crate::cloner::{Cloner, Intermediate, TAG_FIELD};
use crate::error::{Error, Result};
use crate::registry::{TypeRegistry, RESERVED_PREFIX};
use crate::value::Value;

/// Key naming a composite's type in catalog documents
pub const TYPE_KEY: &str = "$type";

/// Catalog used when no catalog file is given: the main and auxiliary
/// office employee prototypes.
pub const BUILTIN_CATALOG: &str = r#"
prototypes:
  main:
    $type: Employee
    name: null
    address:
      $type: Address
      suite: null
      street_address: 123 East Dr
      city: London
  aux:
    $type: Employee
    name: null
    address:
      $type: Address
      suite: null
      street_address: 200 London Rd
      city: Oxford
"#;

/// A parsed prototype catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Prototype documents by key
    #[serde(default)]
    pub prototypes: BTreeMap<String, YamlValue>,
}

/// Parses a catalog from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Catalog> {
    serde_yaml::from_str(yaml_content).map_err(Error::Yaml)
}

/// Parses a catalog from a YAML file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// The built-in employee catalog.
pub fn builtin() -> Result<Catalog> {
    parse(BUILTIN_CATALOG)
}

/// Builds an object graph from one catalog document.
pub fn build_value(cloner: &Cloner, document: &YamlValue) -> Result<Value> {
    let tree = to_intermediate(cloner.registry(), document)?;
    cloner.reconstruct(&Intermediate::from_tree(tree))
}

/// Translates a catalog document into the cloner's intermediate form.
pub fn to_intermediate(registry: &TypeRegistry, document: &YamlValue) -> Result<JsonValue> {
    match document {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        YamlValue::Number(n) => yaml_number(n).map(JsonValue::Number),
        YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
        YamlValue::Sequence(items) => items
            .iter()
            .map(|item| to_intermediate(registry, item))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        YamlValue::Mapping(mapping) => {
            let type_name = mapping
                .get(TYPE_KEY)
                .and_then(YamlValue::as_str)
                .ok_or_else(|| Error::ConfigParse {
                    message: format!("Mapping without a '{}' key", TYPE_KEY),
                    hint: Some(format!(
                        "Every mapping describes a composite; add '{}: <TypeName>'",
                        TYPE_KEY
                    )),
                })?;
            let tag = registry
                .tag_by_name(type_name)
                .ok_or_else(|| Error::UnknownTypeName {
                    name: type_name.to_string(),
                })?;

            let mut node = Map::new();
            for (key, child) in mapping {
                let key = key.as_str().ok_or_else(|| Error::ConfigParse {
                    message: format!("Field names must be strings, found {:?}", key),
                    hint: None,
                })?;
                if key == TYPE_KEY {
                    continue;
                }
                if key.starts_with(RESERVED_PREFIX) {
                    return Err(Error::ConfigParse {
                        message: format!("Field name '{}' is reserved", key),
                        hint: Some(format!(
                            "Only '{}' may start with '{}'",
                            TYPE_KEY, RESERVED_PREFIX
                        )),
                    });
                }
                node.insert(key.to_string(), to_intermediate(registry, child)?);
            }
            node.insert(TAG_FIELD.to_string(), JsonValue::from(tag));

            Ok(JsonValue::Object(node))
        }
        YamlValue::Tagged(tagged) => Err(Error::ConfigParse {
            message: format!("YAML tag '{}' is not supported", tagged.tag),
            hint: Some(format!("Use '{}' to name a composite type", TYPE_KEY)),
        }),
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Number> {
    if let Some(i) = n.as_i64() {
        Ok(i.into())
    } else if let Some(u) = n.as_u64() {
        Ok(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .ok_or_else(|| Error::ConfigParse {
                message: format!("Number {} has no finite representation", n),
                hint: None,
            })
    }
}
