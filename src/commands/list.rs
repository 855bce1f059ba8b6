//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which shows every prototype
//! of a catalog together with its blank baseline rendering.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use proto_forge::factory::{Overrides, PrototypeFactory};

use super::{catalog_label, load_factory};

/// List the prototypes of a catalog
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Prototype catalog file.
    ///
    /// Defaults to the built-in employee catalog.
    #[arg(short, long, value_name = "FILE", env = "PROTO_FORGE_CATALOG")]
    pub catalog: Option<PathBuf>,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs) -> Result<()> {
    let factory = load_factory(args.catalog.as_deref())?;

    println!("📋 Catalog: {}", catalog_label(args.catalog.as_deref()));
    for line in describe_prototypes(&factory)? {
        println!("{}", line);
    }
    Ok(())
}

/// One line per prototype: its key and the rendering of a fresh copy.
fn describe_prototypes(factory: &PrototypeFactory) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for key in factory.prototype_keys() {
        let baseline = factory.create(key, Overrides::new())?;
        lines.push(format!("  • {}: {}", key, baseline));
    }
    if lines.is_empty() {
        lines.push("  (no prototypes)".to_string());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_forge::cloner::Cloner;
    use proto_forge::entities::employee_registry;

    #[test]
    fn test_describe_builtin_prototypes() {
        let factory = load_factory(None).unwrap();
        let lines = describe_prototypes(&factory).unwrap();
        assert_eq!(
            lines,
            vec![
                "  • aux: null works at Suite: null, 200 London Rd, Oxford",
                "  • main: null works at Suite: null, 123 East Dr, London",
            ]
        );
    }

    #[test]
    fn test_describe_empty_catalog() {
        let factory = PrototypeFactory::new(Cloner::new(employee_registry().unwrap()));
        let lines = describe_prototypes(&factory).unwrap();
        assert_eq!(lines, vec!["  (no prototypes)"]);
    }
}
