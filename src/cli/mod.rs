//! Command-line interface for layered-conf
//!
//! Provides `get`, `keys`, `arrays`, `array`, `dump` and `sources` subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layered_conf::ConfigStore;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod dump;
mod query;
mod sources;

/// Inspect layered configuration merged from /etc, dot-files and ~/.config
#[derive(Parser)]
#[command(name = "layered-conf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Home directory for the user roots (defaults to $HOME)
    #[arg(long, global = true, value_name = "DIR", env = "LAYERED_CONF_HOME")]
    home: Option<PathBuf>,

    /// Directory used in place of /etc
    #[arg(long, global = true, value_name = "DIR", env = "LAYERED_CONF_SYSTEM_ROOT")]
    system_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value of a scalar key
    Get(query::GetArgs),

    /// List every scalar key
    Keys(query::IdArgs),

    /// List every array key
    Arrays(query::IdArgs),

    /// Print the values of an array key, one per line
    Array(query::ArrayArgs),

    /// Print the whole merged configuration
    Dump(dump::DumpArgs),

    /// Show search roots, parsed files and skipped entries
    Sources(query::IdArgs),
}

/// Root overrides shared by every subcommand.
pub struct LoadOptions {
    home: Option<PathBuf>,
    system_root: Option<PathBuf>,
}

impl LoadOptions {
    pub fn load(&self, id: &str) -> Result<ConfigStore> {
        let mut loader = ConfigStore::loader(id);
        if let Some(home) = &self.home {
            loader = loader.home(home);
        }
        if let Some(root) = &self.system_root {
            loader = loader.system_root(root);
        }
        loader.load().with_context(|| format!("Failed loading configuration for '{}'", id))
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let options = LoadOptions { home: cli.home, system_root: cli.system_root };

    match cli.command {
        Commands::Get(args) => query::run_get(&options, args),
        Commands::Keys(args) => query::run_keys(&options, args),
        Commands::Arrays(args) => query::run_arrays(&options, args),
        Commands::Array(args) => query::run_array(&options, args),
        Commands::Dump(args) => dump::run(&options, args),
        Commands::Sources(args) => sources::run(&options, args),
    }
}
