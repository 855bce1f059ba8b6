//! # Create Command Implementation
//!
//! This module implements the `create` subcommand, which clones a prototype
//! from the catalog, applies `--set PATH=VALUE` overrides, and prints the
//! resulting instance.
//!
//! Override values are parsed as YAML, so `4321` is a number, `null` blanks a
//! field, and anything that is not a YAML scalar keyword is a string.

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use ptree::TreeItem;
use serde_yaml::Value as YamlValue;
use std::borrow::Cow;
use std::path::PathBuf;

use proto_forge::cloner::Cloner;
use proto_forge::config;
use proto_forge::factory::Overrides;
use proto_forge::value::Value;

use super::load_factory;

/// How the created instance is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The instance's own rendering
    #[default]
    Text,
    /// The type-tagged intermediate form as JSON
    Json,
    /// The object graph as a tree
    Tree,
}

/// Create an instance from a prototype
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Key of the prototype to copy
    pub key: String,

    /// Override a field of the new instance, e.g. `--set address.suite=4321`.
    ///
    /// May be given multiple times; overrides are applied in order.
    #[arg(short, long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,

    /// Prototype catalog file.
    ///
    /// Defaults to the built-in employee catalog.
    /// Can also be set with the `PROTO_FORGE_CATALOG` environment variable.
    #[arg(short, long, value_name = "FILE", env = "PROTO_FORGE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Execute the `create` command.
pub fn execute(args: CreateArgs) -> Result<()> {
    let factory = load_factory(args.catalog.as_deref())?;

    let overrides = args
        .set
        .iter()
        .map(|raw| parse_assignment(factory.cloner(), raw))
        .collect::<Result<Overrides>>()?;

    let instance = factory
        .create(&args.key, overrides)
        .map_err(|e| anyhow!("Failed to create '{}': {}", args.key, e))?;

    println!("{}", render(factory.cloner(), &args.key, &instance, args.format)?);
    Ok(())
}

/// Split `PATH=VALUE` and parse the value.
fn parse_assignment(cloner: &Cloner, raw: &str) -> Result<(String, Value)> {
    let (path, raw_value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid override '{}': expected PATH=VALUE", raw))?;

    let document = if raw_value.trim().is_empty() {
        YamlValue::Null
    } else {
        serde_yaml::from_str(raw_value)
            .map_err(|e| anyhow!("Invalid value in override '{}': {}", raw, e))?
    };
    let value = config::build_value(cloner, &document)
        .map_err(|e| anyhow!("Invalid value in override '{}': {}", raw, e))?;

    Ok((path.trim().to_string(), value))
}

fn render(cloner: &Cloner, key: &str, instance: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(instance.to_string()),
        OutputFormat::Json => {
            let intermediate = cloner.flatten(cloner.mark(instance)?);
            Ok(serde_json::to_string_pretty(intermediate.tree())?)
        }
        OutputFormat::Tree => {
            let mut out = Vec::new();
            ptree::write_tree(&build_tree_node(key.to_string(), instance), &mut out)
                .map_err(|e| anyhow!("Failed to display tree: {}", e))?;
            Ok(String::from_utf8_lossy(&out).trim_end().to_string())
        }
    }
}

/// Build a tree node for a value and, recursively, its fields
fn build_tree_node(label: String, value: &Value) -> TreeNode {
    match value {
        Value::Object(object) => TreeNode {
            label: format!("{}: {}", label, object.type_name()),
            children: object
                .borrow()
                .fields()
                .iter()
                .map(|(name, field)| build_tree_node(name.to_string(), field))
                .collect(),
        },
        Value::List(items) => TreeNode {
            label: format!("{}: list of {}", label, items.len()),
            children: items
                .iter()
                .enumerate()
                .map(|(idx, item)| build_tree_node(format!("[{}]", idx), item))
                .collect(),
        },
        leaf => TreeNode {
            label: format!("{}: {}", label, leaf),
            children: vec![],
        },
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
