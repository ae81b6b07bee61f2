//! Decoding of compound XML documents.
//!
//! Two layers share one pull reader: the mixed-content decoder turns
//! free-form documentation markup into a [`DocString`](crate::domain::DocString),
//! and the compound front-end turns a whole document into a
//! [`RawCompound`](raw::RawCompound) that still carries the schema's own
//! strings.

use std::str::FromStr;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

mod compound;
pub use compound::parse_document;

mod docstring;
pub use docstring::decode_docstring;

mod error;
pub use error::{DecodeError, DocumentError};

/// Schema-shaped records produced by the compound front-end.
pub mod raw;

/// A pull reader over one XML document.
///
/// Empty elements are expanded into a start and an end event, so callers
/// only ever deal with [`Event::Start`].
pub(crate) struct XmlReader<'a> {
    inner: Reader<&'a [u8]>,
}

impl<'a> XmlReader<'a> {
    pub(crate) fn new(xml: &'a str) -> Self {
        let mut inner = Reader::from_str(xml);
        inner.config_mut().expand_empty_elements = true;
        Self { inner }
    }

    fn next(&mut self) -> Result<Event<'a>, DecodeError> {
        Ok(self.inner.read_event()?)
    }

    /// Advances to the document element, or `None` if there is none.
    pub(crate) fn root(&mut self) -> Result<Option<BytesStart<'a>>, DecodeError> {
        loop {
            match self.next()? {
                Event::Start(start) => return Ok(Some(start)),
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Returns the next child element of `parent`, or `None` once `parent`
    /// is closed. Character data between children is discarded.
    pub(crate) fn next_child(
        &mut self,
        parent: &BytesStart<'_>,
    ) -> Result<Option<BytesStart<'a>>, DecodeError> {
        loop {
            match self.next()? {
                Event::Start(start) => return Ok(Some(start)),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(DecodeError::UnexpectedEof(element_name(parent))),
                _ => {}
            }
        }
    }

    /// Reads all character data up to the end of `start`, flattening any
    /// nested markup.
    pub(crate) fn read_text(&mut self, start: &BytesStart<'_>) -> Result<String, DecodeError> {
        let mut text = String::new();
        let mut depth = 0_usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(text),
                Event::End(_) => depth -= 1,
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(data) => text.push_str(&String::from_utf8_lossy(&data)),
                Event::Eof => return Err(DecodeError::UnexpectedEof(element_name(start))),
                _ => {}
            }
        }
    }

    /// Skips everything up to and including the end of `start`.
    pub(crate) fn skip(&mut self, start: &BytesStart<'_>) -> Result<(), DecodeError> {
        self.inner.read_to_end(start.name())?;
        Ok(())
    }
}

/// The name of an element, for diagnostics.
pub(crate) fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

pub(crate) fn unknown_tag(child: &BytesStart<'_>, parent: &BytesStart<'_>) -> DecodeError {
    DecodeError::UnknownTag {
        tag: element_name(child),
        context: element_name(parent),
    }
}

/// Reads an optional attribute, unescaping its value.
pub(crate) fn attr(start: &BytesStart<'_>, key: &'static str) -> Result<Option<String>, DecodeError> {
    match start.try_get_attribute(key)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Reads an attribute that must be present.
pub(crate) fn required_attr(start: &BytesStart<'_>, key: &'static str) -> Result<String, DecodeError> {
    attr(start, key)?.ok_or_else(|| DecodeError::MissingAttribute {
        element: element_name(start),
        attribute: key,
    })
}

/// Reads and parses an optional attribute.
pub(crate) fn parse_attr<T: FromStr>(
    start: &BytesStart<'_>,
    key: &'static str,
) -> Result<Option<T>, DecodeError> {
    attr(start, key)?
        .map(|value| {
            value.parse().map_err(|_| DecodeError::InvalidAttribute {
                element: element_name(start),
                attribute: key,
                value,
            })
        })
        .transpose()
}

/// Reads an optional `yes`/`no` attribute.
pub(crate) fn bool_attr(start: &BytesStart<'_>, key: &'static str) -> Result<Option<bool>, DecodeError> {
    attr(start, key)?
        .map(|value| match value.as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            _ => Err(DecodeError::InvalidAttribute {
                element: element_name(start),
                attribute: key,
                value,
            }),
        })
        .transpose()
}
