//! Core types shared by the parser, the store and the CLI

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Topic name that maps back onto the root namespace.
pub const GENERAL_TOPIC: &str = "General";

/// Key to last-seen value. `topic/key` for keys read inside a section.
pub type ScalarTable = BTreeMap<String, String>;

/// Key to every value appended through `key[]=value`, in encounter order.
pub type ArrayTable = BTreeMap<String, Vec<String>>;

/// The two tables every parsed file writes into.
///
/// Scalars and arrays are separate namespaces: `k=x` and `k[]=y` produce two
/// independent entries under the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tables {
    pub scalars: ScalarTable,
    pub arrays: ArrayTable,
}

impl Tables {
    pub fn set_scalar(&mut self, key: String, value: String) {
        self.scalars.insert(key, value);
    }

    pub fn push_array(&mut self, key: String, value: String) {
        self.arrays.entry(key).or_default().push(value);
    }
}

/// One of the three fixed search locations, in override order (low to high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    /// `/etc/<id>.conf`
    System,
    /// `~/.<id>.conf`
    HomeDotfile,
    /// `~/.config/<id>.conf`
    HomeConfigDir,
}

impl RootKind {
    pub const ALL: [RootKind; 3] =
        [RootKind::System, RootKind::HomeDotfile, RootKind::HomeConfigDir];

    /// Prefix prepended to `<id>.conf` inside the root directory.
    fn file_prefix(self) -> &'static str {
        match self {
            RootKind::HomeDotfile => ".",
            RootKind::System | RootKind::HomeConfigDir => "",
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RootKind::System => "system",
            RootKind::HomeDotfile => "home-dotfile",
            RootKind::HomeConfigDir => "home-config-dir",
        };
        f.write_str(name)
    }
}

/// A resolved search root: the directory plus the naming rule of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRoot {
    pub kind: RootKind,
    pub dir: PathBuf,
}

impl SearchRoot {
    pub fn new(kind: RootKind, dir: impl Into<PathBuf>) -> Self {
        Self { kind, dir: dir.into() }
    }

    /// `<dir>/<prefix><id>.conf`
    pub fn base_file(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}.conf", self.kind.file_prefix(), id))
    }

    /// `<dir>/<prefix><id>.conf.d`
    pub fn dropin_dir(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}.conf.d", self.kind.file_prefix(), id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceOrigin {
    Base,
    DropIn,
}

/// A file that was actually read during the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub path: PathBuf,
    pub root: RootKind,
    pub origin: SourceOrigin,
    /// Scalar assignments made by this file.
    pub scalars: usize,
    /// Array entries appended by this file.
    pub arrays: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// No `=` on the line.
    NoSeparator,
    /// More than one `=` on the line.
    MultipleSeparators { count: usize },
    /// Nothing in front of the `=`.
    EmptyKey,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSeparator => f.write_str("no '=' separator"),
            SkipReason::MultipleSeparators { count } => {
                write!(f, "{} '=' separators, expected exactly one", count)
            }
            SkipReason::EmptyKey => f.write_str("empty key"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum DiagnosticKind {
    Unreadable { reason: String },
    UnreadableDropIn { reason: String },
    SkippedLine { reason: SkipReason },
    DecodedLossy { encoding: String },
}

/// Something the loader ignored. Never changes what ends up in the tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    /// 1-based line number, for line-level diagnostics.
    pub line: Option<usize>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn file(path: &Path, kind: DiagnosticKind) -> Self {
        Self { path: path.to_path_buf(), line: None, kind }
    }

    pub fn line(path: &Path, line: usize, reason: SkipReason) -> Self {
        Self {
            path: path.to_path_buf(),
            line: Some(line),
            kind: DiagnosticKind::SkippedLine { reason },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: ", self.path.display(), line)?,
            None => write!(f, "{}: ", self.path.display())?,
        }
        match &self.kind {
            DiagnosticKind::Unreadable { reason } => write!(f, "unreadable ({})", reason),
            DiagnosticKind::UnreadableDropIn { reason } => {
                write!(f, "drop-in directory unreadable ({})", reason)
            }
            DiagnosticKind::SkippedLine { reason } => write!(f, "line skipped: {}", reason),
            DiagnosticKind::DecodedLossy { encoding } => {
                write!(f, "not valid UTF-8, decoded as {}", encoding)
            }
        }
    }
}
