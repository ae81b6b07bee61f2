use quick_xml::events::attributes::AttrError;

use crate::domain::UnknownKindError;

/// A failure to decode one element of a compound document.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A start tag outside the known set for its context.
    #[error("unknown tag <{tag}> inside <{context}>")]
    UnknownTag {
        /// The unrecognised tag, as written.
        tag: String,
        /// The enclosing element.
        context: String,
    },

    /// An attribute value that does not parse, e.g. `thead="maybe"`.
    #[error("invalid value '{value}' for attribute '{attribute}' of <{element}>")]
    InvalidAttribute {
        /// The element carrying the attribute.
        element: String,
        /// The attribute name.
        attribute: &'static str,
        /// The offending value.
        value: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> has no '{attribute}' attribute")]
    MissingAttribute {
        /// The element missing the attribute.
        element: String,
        /// The attribute name.
        attribute: &'static str,
    },

    /// A required element is absent.
    #[error("expected <{expected}> inside {context}")]
    MissingElement {
        /// The element that was expected.
        expected: &'static str,
        /// Where it was expected.
        context: String,
    },

    /// The input ended inside an open element.
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),

    /// A kind attribute outside the known set.
    #[error(transparent)]
    Kind(#[from] UnknownKindError),

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute list is not well-formed.
    #[error("malformed attribute: {0}")]
    Attr(#[from] AttrError),
}

/// A [`DecodeError`] annotated with the compound being decoded.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {}: {source}", describe(.compound.as_deref()))]
pub struct DocumentError {
    compound: Option<String>,
    #[source]
    source: DecodeError,
}

fn describe(compound: Option<&str>) -> String {
    compound.map_or_else(|| "document".to_string(), |name| format!("compound '{name}'"))
}

impl DocumentError {
    pub(crate) const fn new(compound: Option<String>, source: DecodeError) -> Self {
        Self { compound, source }
    }

    /// The name (or id) of the compound, if decoding got far enough to know
    /// it.
    #[must_use]
    pub fn compound(&self) -> Option<&str> {
        self.compound.as_deref()
    }

    /// The underlying decode failure.
    #[must_use]
    pub const fn decode_error(&self) -> &DecodeError {
        &self.source
    }
}

impl From<DecodeError> for DocumentError {
    fn from(source: DecodeError) -> Self {
        Self::new(None, source)
    }
}
