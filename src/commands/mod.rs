//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `proto-forge` command-line tool. Each subcommand lives in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `proto_forge` library.

pub mod completions;
pub mod create;
pub mod list;

use anyhow::Result;
use log::info;
use std::path::Path;

use proto_forge::cloner::Cloner;
use proto_forge::config;
use proto_forge::entities::employee_registry;
use proto_forge::factory::PrototypeFactory;

/// Load the prototype factory for a catalog file, or the built-in employee
/// catalog when no file is given.
pub fn load_factory(catalog: Option<&Path>) -> Result<PrototypeFactory> {
    let parsed = match catalog {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            config::from_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load catalog from {}: {}", path.display(), e)
            })?
        }
        None => config::builtin()?,
    };

    let cloner = Cloner::new(employee_registry()?);
    let factory = PrototypeFactory::from_catalog(cloner, &parsed)
        .map_err(|e| anyhow::anyhow!("Invalid prototype catalog: {}", e))?;
    Ok(factory)
}

/// Human-readable name of the catalog source.
pub fn catalog_label(catalog: Option<&Path>) -> String {
    catalog
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in employee catalog".to_string())
}
