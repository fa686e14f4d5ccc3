//! Single-key and key-listing commands

use anyhow::Result;
use clap::Args;

use super::LoadOptions;

#[derive(Args)]
pub struct IdArgs {
    /// Application identifier (reads <ID>.conf and <ID>.conf.d/*.conf)
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Key to look up, `Topic/key` for keys inside a section
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Fail instead of printing an empty line when the key is absent
    #[arg(long)]
    pub require: bool,
}

#[derive(Args)]
pub struct ArrayArgs {
    #[arg(value_name = "ID")]
    pub id: String,

    /// Array key, without the trailing `[]`
    #[arg(value_name = "KEY")]
    pub key: String,
}

pub fn run_get(options: &LoadOptions, args: GetArgs) -> Result<()> {
    let store = options.load(&args.id)?;
    if args.require && !store.contains_key(&args.key) {
        anyhow::bail!("Key not found: {}", args.key);
    }
    println!("{}", store.get(&args.key));
    Ok(())
}

pub fn run_keys(options: &LoadOptions, args: IdArgs) -> Result<()> {
    let store = options.load(&args.id)?;
    for key in store.keys() {
        println!("{}", key);
    }
    Ok(())
}

pub fn run_arrays(options: &LoadOptions, args: IdArgs) -> Result<()> {
    let store = options.load(&args.id)?;
    for key in store.arrays() {
        println!("{}", key);
    }
    Ok(())
}

pub fn run_array(options: &LoadOptions, args: ArrayArgs) -> Result<()> {
    let store = options.load(&args.id)?;
    for value in store.array(&args.key) {
        println!("{}", value);
    }
    Ok(())
}
