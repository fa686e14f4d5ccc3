//! Sources command implementation

use anyhow::Result;

use super::query::IdArgs;
use super::LoadOptions;

pub fn run(options: &LoadOptions, args: IdArgs) -> Result<()> {
    let store = options.load(&args.id)?;

    println!("Search roots (lowest priority first):");
    for root in store.search_roots() {
        println!(
            "  {}: {} + {}/*.conf",
            root.kind,
            root.base_file(store.id()).display(),
            root.dropin_dir(store.id()).display()
        );
    }

    println!("Parsed files:");
    if store.sources().is_empty() {
        println!("  (none)");
    }
    for source in store.sources() {
        println!(
            "  {} [{}] ({} scalar(s), {} array entr(ies))",
            source.path.display(),
            source.root,
            source.scalars,
            source.arrays
        );
    }

    if !store.diagnostics().is_empty() {
        println!("Skipped:");
        for diagnostic in store.diagnostics() {
            println!("  {}", diagnostic);
        }
    }

    Ok(())
}
