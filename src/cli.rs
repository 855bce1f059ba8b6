//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Proto Forge - Mint customized copies of prototype object graphs
#[derive(Parser, Debug)]
#[command(name = "proto-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an instance from a prototype
    Create(commands::create::CreateArgs),

    /// List the prototypes of a catalog
    List(commands::list::ListArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        // A logger may already be installed when embedded in tests.
        let _ = env_logger::Builder::from_env(env).try_init();

        match self.command {
            Commands::Create(args) => commands::create::execute(args),
            Commands::List(args) => commands::list::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
