//! Dump command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use layered_conf::ConfigStore;

use super::LoadOptions;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum DumpFormat {
    /// `key=value` and `key[]=value` lines
    #[default]
    Text,
    /// `{"scalars": {...}, "arrays": {...}}`
    Json,
}

#[derive(Args)]
pub struct DumpArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,
}

pub fn run(options: &LoadOptions, args: DumpArgs) -> Result<()> {
    let store = options.load(&args.id)?;
    let output = match args.format {
        DumpFormat::Text => render_text(&store),
        DumpFormat::Json => serde_json::to_string_pretty(store.snapshot())
            .context("Failed serializing configuration")?,
    };
    println!("{}", output);
    Ok(())
}

/// Render every entry back in the file dialect, composite keys kept as-is.
fn render_text(store: &ConfigStore) -> String {
    let mut lines = Vec::new();
    for key in store.keys() {
        lines.push(format!("{}={}", key, store.get(key)));
    }
    for key in store.arrays() {
        for value in store.array(key) {
            lines.push(format!("{}[]={}", key, value));
        }
    }
    lines.join("\n")
}
