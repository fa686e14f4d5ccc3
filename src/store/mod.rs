//! Merged, read-only view over every configuration file for one identifier
//!
//! Files are processed in a fixed order: `/etc`, then `~/.<id>.conf`, then
//! `~/.config`, each root's base file before its drop-in directory. Later
//! files override scalars and append to arrays.

use crate::domain::{Diagnostic, SearchRoot, SourceReport, Tables};
use crate::error::Result;

pub mod loader;

pub use loader::Loader;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub(crate) id: String,
    pub(crate) roots: Vec<SearchRoot>,
    pub(crate) tables: Tables,
    pub(crate) sources: Vec<SourceReport>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl ConfigStore {
    /// Load configuration for `id` using `/etc` and `$HOME`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Loader::new(id).load()
    }

    /// Start a load with custom roots or options.
    pub fn loader(id: impl Into<String>) -> Loader {
        Loader::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Scalar value for an exact key (`topic/key` inside sections).
    ///
    /// Returns `""` when the key is absent, so absence and an empty value
    /// look the same. Use [`ConfigStore::contains_key`] to tell them apart.
    pub fn get(&self, key: &str) -> &str {
        self.tables.scalars.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tables.scalars.contains_key(key)
    }

    /// All scalar keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.tables.scalars.keys().map(String::as_str).collect()
    }

    /// All array keys, sorted.
    pub fn arrays(&self) -> Vec<&str> {
        self.tables.arrays.keys().map(String::as_str).collect()
    }

    /// Values appended to `key`, in encounter order. Empty when absent.
    pub fn array(&self, key: &str) -> &[String] {
        self.tables.arrays.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct scalar keys.
    pub fn len(&self) -> usize {
        self.tables.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.scalars.is_empty()
    }

    /// Both tables, serializable as `{ "scalars": {..}, "arrays": {..} }`.
    pub fn snapshot(&self) -> &Tables {
        &self.tables
    }

    pub fn search_roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    /// Files that were read, in processing order.
    pub fn sources(&self) -> &[SourceReport] {
        &self.sources
    }

    /// Files, directories and lines that were skipped during the load.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
