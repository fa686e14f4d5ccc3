//! Decoding configuration bytes into text with UTF-8 fallback logic.
//!
//! Strategy:
//! 1. Strip a UTF-8 BOM if present
//! 2. Use the bytes as-is when they are valid UTF-8 (the common case)
//! 3. Mostly-UTF-8 input is decoded as UTF-8, only the broken sequences
//!    become U+FFFD
//! 4. Otherwise detect the encoding with chardetng and decode with
//!    replacement characters

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

const UTF8_BOM: &[u8] = &[0xef, 0xbb, 0xbf];
const UTF16LE_BOM: &[u8] = &[0xff, 0xfe];
const UTF16BE_BOM: &[u8] = &[0xfe, 0xff];

/// Result of decoding a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Set when the bytes were not valid UTF-8: either `utf-8` (decoded with
    /// replacement characters) or the detected encoding.
    pub fallback_encoding: Option<String>,
}

/// Decode raw file bytes.
///
/// # Arguments
/// * `bytes` - Full file contents
///
/// # Returns
/// The decoded text, plus the encoding name when a fallback was needed
pub fn decode_config_bytes(bytes: &[u8]) -> DecodedText {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(body) {
        return DecodedText { text: text.to_string(), fallback_encoding: None };
    }

    if !has_utf16_bom(body) && looks_like_utf8(body) {
        let (decoded, _had_errors) = UTF_8.decode_without_bom_handling(body);
        return DecodedText {
            text: decoded.into_owned(),
            fallback_encoding: Some(UTF_8.name().to_lowercase()),
        };
    }

    let encoding = detect_encoding(body);
    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);

    DecodedText {
        text: decoded.into_owned(),
        fallback_encoding: Some(encoding.name().to_lowercase()),
    }
}

fn has_utf16_bom(bytes: &[u8]) -> bool {
    bytes.starts_with(UTF16LE_BOM) || bytes.starts_with(UTF16BE_BOM)
}

/// True when at least as many non-ASCII bytes form valid UTF-8 sequences as
/// there are invalid bytes.
fn looks_like_utf8(bytes: &[u8]) -> bool {
    let mut rest = bytes;
    let mut multibyte = 0usize;
    let mut invalid = 0usize;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                multibyte += valid.bytes().filter(|b| !b.is_ascii()).count();
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                multibyte += rest[..valid_up_to].iter().filter(|b| !b.is_ascii()).count();
                // error_len is None for a sequence truncated at end of input
                let bad = e.error_len().unwrap_or(rest.len() - valid_up_to);
                invalid += bad;
                rest = &rest[valid_up_to + bad..];
            }
        }
    }

    multibyte > 0 && invalid <= multibyte
}

fn detect_encoding(sample: &[u8]) -> &'static Encoding {
    // UTF-16 BOMs are reliable and chardetng does not look for them
    if sample.starts_with(UTF16LE_BOM) {
        return UTF_16LE;
    }
    if sample.starts_with(UTF16BE_BOM) {
        return UTF_16BE;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    detector.guess(None, true)
}
