//! layered-conf: inspect the merged configuration of an application
//!
//! Loads the same files an application using the library would see and
//! prints keys, values, arrays or the list of files that contributed.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
