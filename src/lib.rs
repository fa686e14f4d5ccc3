//! layered-conf: layered INI-style configuration loading
//!
//! Reads `<id>.conf` plus `<id>.conf.d/*.conf` from `/etc`, the home
//! directory (as a dot-file) and `~/.config`, and merges them into a scalar
//! table and an array table.
//!
//! ```no_run
//! use layered_conf::ConfigStore;
//!
//! let store = ConfigStore::new("myapp")?;
//! let port = store.get("Network/port");
//! let hosts = store.array("Network/hosts");
//! # Ok::<(), layered_conf::ConfigError>(())
//! ```

pub mod domain;
pub mod error;
pub mod parse;
pub mod store;
pub mod utils;

pub use domain::{
    Diagnostic, DiagnosticKind, RootKind, SearchRoot, SkipReason, SourceOrigin, SourceReport,
    Tables,
};
pub use error::{ConfigError, Result};
pub use store::{ConfigStore, Loader};
