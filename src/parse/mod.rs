//! Configuration file parsing
//!
//! Each file is parsed line by line into the shared [`Tables`]. Topic state is
//! local to one file and starts at the root namespace.

use crate::domain::{Diagnostic, DiagnosticKind, Tables};
use crate::utils::decode_config_bytes;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub mod line;

pub use line::{classify_line, effective_key, Line};

/// Entries a single file contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseCounts {
    pub scalars: usize,
    pub arrays: usize,
}

/// Parse already-decoded configuration text into `tables`.
///
/// `path` is only used to label diagnostics.
pub fn parse_text(
    text: &str,
    path: &Path,
    tables: &mut Tables,
    diagnostics: &mut Vec<Diagnostic>,
) -> ParseCounts {
    let mut counts = ParseCounts::default();
    let mut topic = String::new();

    for (idx, raw) in text.lines().enumerate() {
        match classify_line(raw) {
            Line::Blank | Line::Comment => {}
            Line::Section(name) => topic = name.to_string(),
            Line::Scalar { key, value } => {
                tables.set_scalar(effective_key(&topic, key, false), value.to_string());
                counts.scalars += 1;
            }
            Line::ArrayEntry { key, value } => {
                tables.push_array(effective_key(&topic, key, true), value.to_string());
                counts.arrays += 1;
            }
            Line::Skipped(reason) => {
                tracing::debug!("{}:{}: skipping line ({})", path.display(), idx + 1, reason);
                diagnostics.push(Diagnostic::line(path, idx + 1, reason));
            }
        }
    }

    counts
}

/// Read and parse one file.
///
/// Returns `None` when nothing was parsed: the file is missing, is not a
/// regular file, or could not be read. Only the last case is recorded as a
/// diagnostic.
pub fn parse_file(
    path: &Path,
    tables: &mut Tables,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ParseCounts> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            tracing::trace!("{} is not a regular file, skipping", path.display());
            return None;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::trace!("{} not found", path.display());
            return None;
        }
        Err(e) => return unreadable(path, e, diagnostics),
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return unreadable(path, e, diagnostics),
    };

    let decoded = decode_config_bytes(&bytes);
    if let Some(encoding) = decoded.fallback_encoding {
        tracing::debug!("{} is not valid UTF-8, decoded as {}", path.display(), encoding);
        diagnostics.push(Diagnostic::file(path, DiagnosticKind::DecodedLossy { encoding }));
    }

    let counts = parse_text(&decoded.text, path, tables, diagnostics);
    tracing::debug!(
        "Parsed {}: {} scalar(s), {} array entr(ies)",
        path.display(),
        counts.scalars,
        counts.arrays
    );
    Some(counts)
}

fn unreadable(
    path: &Path,
    err: std::io::Error,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ParseCounts> {
    tracing::warn!("Skipping unreadable config file {}: {}", path.display(), err);
    let kind = DiagnosticKind::Unreadable { reason: err.to_string() };
    diagnostics.push(Diagnostic::file(path, kind));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiagnosticKind, SkipReason};
    use std::fs;
    use tempfile::TempDir;

    fn parse(text: &str) -> (Tables, Vec<Diagnostic>, ParseCounts) {
        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        let counts = parse_text(text, Path::new("test.conf"), &mut tables, &mut diagnostics);
        (tables, diagnostics, counts)
    }

    #[test]
    fn test_root_and_topic_keys() {
        let (tables, _, counts) = parse("name=svc\n[Network]\nport=80\n[General]\nmode=fast\n");
        assert_eq!(tables.scalars["name"], "svc");
        assert_eq!(tables.scalars["Network/port"], "80");
        assert_eq!(tables.scalars["mode"], "fast");
        assert_eq!(counts, ParseCounts { scalars: 3, arrays: 0 });
    }

    #[test]
    fn test_general_section_equals_no_section() {
        let (with_general, _, _) = parse("[General]\nkey=value\n");
        let (without, _, _) = parse("key=value\n");
        assert_eq!(with_general, without);
    }

    #[test]
    fn test_arrays_accumulate_and_do_not_count_as_scalars() {
        let (tables, _, counts) = parse("[Net]\nhosts[]=a\nhosts[]=b\nplain[]=x\n");
        assert_eq!(tables.arrays["Net/hosts"], vec!["a", "b"]);
        assert_eq!(tables.arrays["Net/plain"], vec!["x"]);
        assert!(tables.scalars.is_empty());
        assert_eq!(counts, ParseCounts { scalars: 0, arrays: 3 });
    }

    #[test]
    fn test_last_write_wins_within_file() {
        let (tables, _, counts) = parse("k=1\nk=2\n");
        assert_eq!(tables.scalars["k"], "2");
        assert_eq!(counts.scalars, 2);
    }

    #[test]
    fn test_comments_blanks_and_malformed_lines_add_nothing() {
        let (tables, diagnostics, counts) = parse("# note\n\n   \nnovalue\na=b=c\n=orphan\n");
        assert!(tables.scalars.is_empty());
        assert!(tables.arrays.is_empty());
        assert_eq!(counts, ParseCounts::default());

        let reasons: Vec<_> = diagnostics
            .iter()
            .map(|d| match &d.kind {
                DiagnosticKind::SkippedLine { reason } => (d.line, *reason),
                other => panic!("unexpected diagnostic {other:?}"),
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                (Some(4), SkipReason::NoSeparator),
                (Some(5), SkipReason::MultipleSeparators { count: 2 }),
                (Some(6), SkipReason::EmptyKey),
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let (tables, _, _) = parse("[Db]\r\nuser=admin\r\n");
        assert_eq!(tables.scalars["Db/user"], "admin");
    }

    #[test]
    fn test_parse_file_missing_is_silent() {
        let tmp = TempDir::new().expect("tmp");
        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();

        let counts = parse_file(&tmp.path().join("absent.conf"), &mut tables, &mut diagnostics);
        assert!(counts.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_file_directory_is_silent() {
        let tmp = TempDir::new().expect("tmp");
        let dir = tmp.path().join("app.conf");
        fs::create_dir(&dir).expect("mkdir");

        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        assert!(parse_file(&dir, &mut tables, &mut diagnostics).is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_file_stray_byte_keeps_other_utf8_values() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.conf");
        fs::write(&path, b"name=caf\xc3\xa9\ncity=Z\xc3\xbcrich\nbad=\xff\n").expect("write");

        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        let counts = parse_file(&path, &mut tables, &mut diagnostics).expect("parsed");

        assert_eq!(counts.scalars, 3);
        assert_eq!(tables.scalars["name"], "café");
        assert_eq!(tables.scalars["city"], "Zürich");
        assert_eq!(tables.scalars["bad"], "\u{fffd}");
        assert_eq!(
            diagnostics,
            vec![Diagnostic::file(
                &path,
                DiagnosticKind::DecodedLossy { encoding: "utf-8".to_string() }
            )]
        );
    }

    #[test]
    fn test_parse_file_records_legacy_encoding() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.conf");
        fs::write(&path, b"drink=caf\xe9\n").expect("write");

        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        parse_file(&path, &mut tables, &mut diagnostics).expect("parsed");

        assert!(tables.scalars["drink"].starts_with("caf"));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0].kind,
            DiagnosticKind::DecodedLossy { encoding } if encoding != "utf-8"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_file_unreadable_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.conf");
        fs::write(&path, "k=v\n").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod");

        // root ignores file permissions
        if fs::read(&path).is_ok() {
            return;
        }

        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        assert!(parse_file(&path, &mut tables, &mut diagnostics).is_none());
        assert!(tables.scalars.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].path, path);
        assert!(matches!(diagnostics[0].kind, DiagnosticKind::Unreadable { .. }));
    }

    #[test]
    fn test_parse_file_reads_and_counts() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("app.conf");
        fs::write(&path, "a=1\nlist[]=x\n").expect("write");

        let mut tables = Tables::default();
        let mut diagnostics = Vec::new();
        let counts = parse_file(&path, &mut tables, &mut diagnostics).expect("parsed");
        assert_eq!(counts, ParseCounts { scalars: 1, arrays: 1 });
        assert_eq!(tables.scalars["a"], "1");
        assert!(diagnostics.is_empty());
    }
}
