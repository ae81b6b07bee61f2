//! The per-file pipeline: read, repair, decode, normalize.

use std::{io, path::Path};

use encoding_rs::Encoding;

use super::encoding;
use crate::{
    domain::{Compound, UnknownKindError},
    normalize::normalize,
    xml::{parse_document, DocumentError},
};

/// An error loading a single compound file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    /// The document could not be decoded.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The document decoded, but a kind or protection is not in the model.
    #[error("failed to normalize compound '{compound}': {source}")]
    Normalize {
        /// Name of the compound being normalized.
        compound: String,
        /// The offending kind.
        #[source]
        source: UnknownKindError,
    },
}

impl LoadError {
    /// The name of the compound that failed, when it is known.
    #[must_use]
    pub fn compound(&self) -> Option<&str> {
        match self {
            Self::Io(_) => None,
            Self::Document(e) => e.compound(),
            Self::Normalize { compound, .. } => Some(compound.as_str()),
        }
    }
}

/// Loads one compound from a file.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read, decoded or
/// normalized.
pub fn load_file(path: &Path, fallback: Option<&'static Encoding>) -> Result<Compound, LoadError> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, fallback)
}

/// Loads one compound from raw file contents.
///
/// # Errors
///
/// Returns a [`LoadError`] if the contents cannot be decoded or
/// normalized.
pub fn load_bytes(bytes: &[u8], fallback: Option<&'static Encoding>) -> Result<Compound, LoadError> {
    load_str(&encoding::repair(bytes, fallback))
}

/// Loads one compound from already repaired XML text.
///
/// # Errors
///
/// Returns a [`LoadError`] if the text cannot be decoded or normalized.
pub fn load_str(xml: &str) -> Result<Compound, LoadError> {
    let raw = parse_document(xml)?;
    let compound = raw.name.clone();
    normalize(raw).map_err(|source| LoadError::Normalize { compound, source })
}
