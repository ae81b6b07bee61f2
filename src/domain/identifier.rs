//! Identifier conventions shared by the normalizer and the resolver.

use serde::Serialize;

/// Folds an identifier (or a path used as a lookup key) to its canonical
/// lowercase form.
///
/// Folding is idempotent: folding an already folded string returns it
/// unchanged.
#[must_use]
pub fn fold_id(id: &str) -> String {
    id.to_lowercase()
}

/// Errors produced when a composite member reference does not follow the
/// `<memberId>_<parentId>` convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReimplementsError {
    /// The reference contains no `_` separator.
    #[error("reference '{0}' has no '_' separator")]
    MissingSeparator(String),

    /// One side of the separator is empty.
    #[error("reference '{0}' has an empty member or parent component")]
    EmptyComponent(String),

    /// More than one `_` separator; the split is ambiguous.
    #[error("reference '{0}' contains more than one '_' separator")]
    Ambiguous(String),
}

/// A "reimplements" or "reimplemented by" relation between two members.
///
/// The upstream id scheme encodes these as `<memberId>_<parentId>`. The
/// split is a convention of the id generator rather than a documented
/// format, so anything other than exactly two non-empty components is
/// rejected instead of guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reimplements {
    /// The full (folded) reference id.
    pub ref_id: String,
    /// The part before the separator.
    pub member_id: String,
    /// The part after the separator.
    pub parent_id: String,
}

impl Reimplements {
    /// Parses a reference id, folding it first.
    ///
    /// # Errors
    ///
    /// Returns [`ReimplementsError`] if the id is not exactly two non-empty
    /// components joined by a single `_`.
    pub fn parse(ref_id: &str) -> Result<Self, ReimplementsError> {
        let ref_id = fold_id(ref_id);
        let Some((member_id, parent_id)) = ref_id.split_once('_') else {
            return Err(ReimplementsError::MissingSeparator(ref_id));
        };
        if member_id.is_empty() || parent_id.is_empty() {
            return Err(ReimplementsError::EmptyComponent(ref_id));
        }
        if parent_id.contains('_') {
            return Err(ReimplementsError::Ambiguous(ref_id));
        }

        Ok(Self {
            member_id: member_id.to_string(),
            parent_id: parent_id.to_string(),
            ref_id,
        })
    }
}
