//! Canonical payload encoding
//!
//! Payload hashes are computed over compact JSON with the fields in
//! declaration order (`sequence`, `timestamp`, `data`, `previousHash`).
//! Inside strings `<`, `>`, `&`, U+2028 and U+2029 are written as `\uXXXX`
//! escapes. Any change here changes every hash in every persisted chain.

use crate::core::block::Payload;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use thiserror::Error;

/// Codec errors
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Encoding error: {0}")]
    Encoding(#[source] serde_json::Error),
    #[error("Decoding error: {0}")]
    Decoding(#[source] serde_json::Error),
}

/// Compact JSON formatter with HTML-safe string escaping
#[derive(Debug, Clone, Copy, Default)]
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;

        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };

            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }

        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encode a payload into its canonical byte form
pub fn encode(payload: &Payload) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(128 + payload.data.len());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    payload
        .serialize(&mut serializer)
        .map_err(CodecError::Encoding)?;
    Ok(buf)
}

/// Decode a payload from its canonical byte form
pub fn decode(bytes: &[u8]) -> Result<Payload, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decoding)
}
