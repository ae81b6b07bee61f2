//! Repair of raw file bytes into UTF-8 text a strict XML reader accepts.
//!
//! The generator writes whatever encoding the sources were in and passes
//! control characters from comments straight through as numeric character
//! references, which XML 1.0 forbids.

use std::{borrow::Cow, sync::LazyLock};

use encoding_rs::{Encoding, UTF_8};
use regex::{bytes, Captures, Regex};

/// How many leading bytes are searched for an XML declaration.
const DECLARATION_WINDOW: usize = 256;

static DECLARED_ENCODING: LazyLock<bytes::Regex> = LazyLock::new(|| {
    bytes::Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap()
});

static CHAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(?:[xX]([0-9A-Fa-f]+)|([0-9]+));").unwrap());

/// Decodes `bytes` to text and purges characters that are illegal in XML.
///
/// The encoding is taken from, in order: a byte order mark, a non UTF-8
/// XML declaration, UTF-8 if the bytes are valid UTF-8, the `fallback`, and
/// finally UTF-8 with replacement characters.
///
/// A declared UTF-8 is not trusted: the generator always declares it, even
/// when the sources it copied comments from were in a legacy encoding.
#[must_use]
pub fn repair(bytes: &[u8], fallback: Option<&'static Encoding>) -> String {
    let text = decode(bytes, fallback);
    if let Cow::Owned(purged) = purge_control_characters(&text) {
        tracing::debug!("purged illegal control characters");
        return purged;
    }
    text.into_owned()
}

fn decode<'a>(bytes: &'a [u8], fallback: Option<&'static Encoding>) -> Cow<'a, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        tracing::trace!(encoding = encoding.name(), "encoding from byte order mark");
        return decode_with(encoding, &bytes[bom_length..]);
    }

    if let Some(encoding) = declared_encoding(bytes).filter(|&encoding| encoding != UTF_8) {
        tracing::trace!(encoding = encoding.name(), "encoding from XML declaration");
        return decode_with(encoding, bytes);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let encoding = fallback.unwrap_or(UTF_8);
    tracing::debug!(encoding = encoding.name(), "input is not UTF-8, using fallback encoding");
    decode_with(encoding, bytes)
}

fn decode_with<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!(
            encoding = encoding.name(),
            "malformed byte sequences replaced while decoding"
        );
    }
    text
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let label = DECLARED_ENCODING.captures(window)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label);
    if encoding.is_none() {
        tracing::warn!(
            label = %String::from_utf8_lossy(label),
            "ignoring unknown encoding in XML declaration"
        );
    }
    encoding
}

/// C0 control characters other than tab, line feed and carriage return.
const fn is_illegal_control(c: char) -> bool {
    c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')
}

/// Removes illegal control characters, both raw and as numeric character
/// references such as `&#x03;`.
#[must_use]
pub fn purge_control_characters(text: &str) -> Cow<'_, str> {
    let text = CHAR_REFERENCE.replace_all(text, |caps: &Captures<'_>| {
        let value = caps.get(1).map_or_else(
            || caps[2].parse().ok(),
            |hex| u32::from_str_radix(hex.as_str(), 16).ok(),
        );
        match value.and_then(char::from_u32) {
            Some(c) if is_illegal_control(c) => String::new(),
            _ => caps[0].to_string(),
        }
    });

    if text.contains(is_illegal_control) {
        Cow::Owned(text.chars().filter(|&c| !is_illegal_control(c)).collect())
    } else {
        text
    }
}
