//! Shared helpers

pub mod encoding;

pub use encoding::{decode_config_bytes, DecodedText};
