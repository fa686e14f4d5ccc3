//! Single-line classification for the INI-like dialect

use crate::domain::{SkipReason, GENERAL_TOPIC};

const LINE_TRIM: &[char] = &[' ', '\t', '\r', '\n'];
const BRACKETS: &[char] = &['[', ']'];

/// What a trimmed line means to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    /// `[Name]`. `General` is already folded into the root topic (`""`).
    Section(&'a str),
    Scalar { key: &'a str, value: &'a str },
    /// `key[]=value`. `key` is the raw token, brackets included.
    ArrayEntry { key: &'a str, value: &'a str },
    Skipped(SkipReason),
}

/// Classify one raw line from a configuration file.
///
/// The line is trimmed of spaces, tabs, CR and LF first. Whitespace around
/// `=` is kept as part of the key or value.
pub fn classify_line(raw: &str) -> Line<'_> {
    let line = raw.trim_matches(LINE_TRIM);

    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }
    if line.starts_with('[') {
        let topic = line.trim_matches(BRACKETS);
        return Line::Section(if topic == GENERAL_TOPIC { "" } else { topic });
    }

    let separators = line.matches('=').count();
    let Some((key, value)) = line.split_once('=') else {
        return Line::Skipped(SkipReason::NoSeparator);
    };
    if separators > 1 {
        return Line::Skipped(SkipReason::MultipleSeparators { count: separators });
    }
    if key.is_empty() {
        return Line::Skipped(SkipReason::EmptyKey);
    }

    if key.ends_with(']') {
        Line::ArrayEntry { key, value }
    } else {
        Line::Scalar { key, value }
    }
}

/// Build the table key for `raw_key` under `topic`.
///
/// Array keys have any leading or trailing brackets removed from the whole
/// composite key, so `[Net]` + `hosts[]` becomes `Net/hosts`.
pub fn effective_key(topic: &str, raw_key: &str, is_array: bool) -> String {
    let key = if topic.is_empty() { raw_key.to_string() } else { format!("{}/{}", topic, raw_key) };

    if is_array {
        key.trim_matches(BRACKETS).to_string()
    } else {
        key
    }
}
