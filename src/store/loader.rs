//! Search-root resolution and the load sequence

use crate::domain::{
    Diagnostic, DiagnosticKind, RootKind, SearchRoot, SourceOrigin, SourceReport, Tables,
};
use crate::error::{validate_identifier, ConfigError, Result};
use crate::parse::parse_file;
use crate::store::ConfigStore;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const HOME_VAR: &str = "HOME";
pub const DEFAULT_SYSTEM_ROOT: &str = "/etc";
const DROPIN_SUFFIX: &str = ".conf";

/// Builder for a [`ConfigStore`].
///
/// Defaults match a normal process: `/etc` as the system root, `$HOME` for the
/// two user roots, drop-in files parsed in file-name order.
#[derive(Debug, Clone)]
pub struct Loader {
    id: String,
    system_root: PathBuf,
    home: Option<PathBuf>,
    sorted_dropins: bool,
}

impl Loader {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system_root: PathBuf::from(DEFAULT_SYSTEM_ROOT),
            home: None,
            sorted_dropins: true,
        }
    }

    /// Use this directory instead of `$HOME`.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Use this directory instead of `/etc`.
    pub fn system_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.system_root = root.into();
        self
    }

    /// Parse drop-in files in file-name order (default) or in raw directory
    /// listing order.
    pub fn sorted_dropins(mut self, sorted: bool) -> Self {
        self.sorted_dropins = sorted;
        self
    }

    /// The three roots in processing order, lowest priority first.
    pub fn search_roots(&self) -> Result<Vec<SearchRoot>> {
        let home = match &self.home {
            Some(home) => home.clone(),
            None => resolve_home(std::env::var_os(HOME_VAR))?,
        };

        Ok(RootKind::ALL
            .iter()
            .map(|&kind| match kind {
                RootKind::System => SearchRoot::new(kind, self.system_root.clone()),
                RootKind::HomeDotfile => SearchRoot::new(kind, home.clone()),
                RootKind::HomeConfigDir => SearchRoot::new(kind, home.join(".config")),
            })
            .collect())
    }

    /// Run the full load. Fails only for an invalid identifier or an
    /// unresolvable home directory; missing files yield an empty store.
    pub fn load(self) -> Result<ConfigStore> {
        validate_identifier(&self.id)?;
        if self.id.contains('/') {
            tracing::warn!(
                "Identifier '{}' contains '/', files are looked up in subdirectories of each root",
                self.id
            );
        }
        let roots = self.search_roots()?;

        let mut tables = Tables::default();
        let mut sources = Vec::new();
        let mut diagnostics = Vec::new();

        for root in &roots {
            let files = candidate_files(root, &self.id, self.sorted_dropins, &mut diagnostics);
            for (path, origin) in files {
                if let Some(counts) = parse_file(&path, &mut tables, &mut diagnostics) {
                    sources.push(SourceReport {
                        path,
                        root: root.kind,
                        origin,
                        scalars: counts.scalars,
                        arrays: counts.arrays,
                    });
                }
            }
        }

        tracing::debug!(
            "Loaded '{}': {} file(s), {} scalar key(s), {} array key(s)",
            self.id,
            sources.len(),
            tables.scalars.len(),
            tables.arrays.len()
        );

        Ok(ConfigStore { id: self.id, roots, tables, sources, diagnostics })
    }
}

fn resolve_home(value: Option<OsString>) -> Result<PathBuf> {
    match value {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => Err(ConfigError::MissingEnvironment { var: HOME_VAR }),
    }
}

/// Base file first, then the `.conf` members of the drop-in directory.
fn candidate_files(
    root: &SearchRoot,
    id: &str,
    sorted: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(PathBuf, SourceOrigin)> {
    let mut files = vec![(root.base_file(id), SourceOrigin::Base)];

    let dropin = root.dropin_dir(id);
    if fs::metadata(&dropin).map(|m| m.is_dir()).unwrap_or(false) {
        let dropins = list_dropins(&dropin, sorted, diagnostics);
        files.extend(dropins.into_iter().map(|path| (path, SourceOrigin::DropIn)));
    }

    files
}

/// Direct entries of `dir` whose name ends in `.conf`. No recursion.
fn list_dropins(dir: &Path, sorted: bool, diagnostics: &mut Vec<Diagnostic>) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    if sorted {
        walker = walker.sort_by_file_name();
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_name().to_string_lossy().ends_with(DROPIN_SUFFIX) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                tracing::warn!("Failed listing drop-in directory {}: {}", path.display(), e);
                diagnostics.push(Diagnostic::file(
                    &path,
                    DiagnosticKind::UnreadableDropIn { reason: e.to_string() },
                ));
            }
        }
    }
    files
}
