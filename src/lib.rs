//! A normalized documentation model built from Doxygen XML output.
//!
//! Each compound file is decoded into raw schema records, normalized into
//! the kind-tagged model in [`domain`], and finally resolved against the
//! rest of the build into a [`Corpus`] with parent links, file links and a
//! global [`ReferenceTable`].

pub mod domain;
pub use domain::{
    Compound, CompoundKind, Config, Conflict, Corpus, DocElement, DocString, RefEntry, RefKind,
    ReferenceTable,
};

pub mod normalize;

/// Filesystem loading of compound directories.
pub mod storage;
pub use storage::{Directory, Loaded};

pub mod xml;
