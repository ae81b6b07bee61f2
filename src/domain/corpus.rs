//! The resolved documentation corpus.
//!
//! The [`Corpus`] knows nothing about the filesystem. It takes ownership of
//! every normalized compound once all of them exist, and then resolves the
//! links that can only be computed over the whole set: parents, file
//! locations and the reference table.

use std::collections::HashMap;

use serde::Serialize;
use tracing::instrument;

use super::{fold_id, Compound, CompoundKind, RefCollision, ReferenceTable};

/// A conflict found while resolving the corpus.
///
/// Resolution is first-write-wins in corpus order; every rejected write is
/// recorded here so it can be reported rather than silently overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "conflict", rename_all = "kebab-case")]
pub enum Conflict {
    /// Two compounds share an id; the later one was dropped.
    DuplicateCompound {
        /// The shared id.
        id: String,
    },
    /// A compound is listed as an inner child by more than one compound.
    Parent {
        /// The child compound.
        child: String,
        /// The parent that was kept.
        kept: String,
        /// The parent that was rejected.
        rejected: String,
    },
    /// Two reference-table entries share a key.
    Reference(RefCollision),
}

/// All compounds of one documentation build, with their cross links
/// resolved.
#[derive(Debug, Default, Serialize)]
pub struct Corpus {
    /// The compounds, stored contiguously in corpus order.
    compounds: Vec<Compound>,

    /// An index from compound id to position in `compounds`.
    #[serde(skip)]
    index: HashMap<String, usize>,

    references: ReferenceTable,

    #[serde(skip)]
    conflicts: Vec<Conflict>,
}

impl Corpus {
    /// Resolves a complete set of compounds.
    ///
    /// This is the synchronisation point after per-file decoding: it must
    /// only be called once every compound of the build is available,
    /// because links may point at compounds discovered in any order. The
    /// iteration order of `compounds` is the corpus order used to break
    /// ties.
    #[must_use]
    pub fn resolve(compounds: impl IntoIterator<Item = Compound>) -> Self {
        let compounds = compounds.into_iter();
        let mut corpus = Self::with_capacity(compounds.size_hint().0);
        for compound in compounds {
            corpus.insert(compound);
        }

        corpus.link_parents();
        corpus.link_files();
        corpus.build_references();
        corpus
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            compounds: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            references: ReferenceTable::default(),
            conflicts: Vec::new(),
        }
    }

    fn insert(&mut self, compound: Compound) {
        if self.index.contains_key(&compound.id) {
            tracing::warn!(id = %compound.id, "duplicate compound id, keeping the first");
            self.conflicts
                .push(Conflict::DuplicateCompound { id: compound.id });
            return;
        }
        self.index.insert(compound.id.clone(), self.compounds.len());
        self.compounds.push(compound);
    }

    /// Sets each compound's parent from the inner-reference lists of the
    /// other compounds.
    #[instrument(level = "debug", skip(self))]
    fn link_parents(&mut self) {
        let edges: Vec<(String, String)> = self
            .compounds
            .iter()
            .flat_map(|parent| {
                parent
                    .inner
                    .iter()
                    .map(move |inner| (parent.id.clone(), inner.target_id.clone()))
            })
            .collect();

        for (parent, child) in edges {
            if parent == child {
                tracing::warn!(id = %parent, "compound lists itself as an inner compound");
                continue;
            }
            let Some(&idx) = self.index.get(&child) else {
                tracing::debug!(%parent, %child, "inner reference to an undocumented compound");
                continue;
            };
            let target = &mut self.compounds[idx];
            let Some(existing) = target.parent.clone() else {
                target.parent = Some(parent);
                continue;
            };
            if existing != parent {
                tracing::warn!(
                    %child,
                    kept = %existing,
                    rejected = %parent,
                    "compound has more than one parent, keeping the first"
                );
                self.conflicts.push(Conflict::Parent {
                    child,
                    kept: existing,
                    rejected: parent,
                });
            }
        }
    }

    /// Points each location at the File compound documenting its path.
    #[instrument(level = "debug", skip(self))]
    fn link_files(&mut self) {
        let files: HashMap<String, String> = self
            .compounds
            .iter()
            .filter(|c| c.kind == CompoundKind::File && !c.location.file.is_empty())
            .map(|c| (fold_id(&c.location.file), c.id.clone()))
            .collect();

        for compound in &mut self.compounds {
            let location = &mut compound.location;
            location.file_ref = files.get(&fold_id(&location.file)).cloned();
            location.body_file_ref = location
                .body
                .as_ref()
                .and_then(|body| files.get(&fold_id(&body.file)))
                .cloned();
        }
    }

    #[instrument(level = "debug", skip(self))]
    fn build_references(&mut self) {
        self.references = ReferenceTable::build(&self.compounds);
        self.conflicts.extend(
            self.references
                .collisions()
                .iter()
                .cloned()
                .map(Conflict::Reference),
        );
    }

    /// Retrieves a compound by id; the id is folded before lookup.
    #[must_use]
    pub fn compound(&self, id: &str) -> Option<&Compound> {
        self.index
            .get(id)
            .or_else(|| self.index.get(&fold_id(id)))
            .map(|&idx| &self.compounds[idx])
    }

    /// All compounds in corpus order.
    #[must_use]
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// The compounds whose parent is `id`, in corpus order.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Compound> + 'a {
        self.compounds
            .iter()
            .filter(move |c| c.parent.as_deref() == Some(id))
    }

    /// Compounds of the given kind without a parent.
    pub fn roots(&self, kind: CompoundKind) -> impl Iterator<Item = &Compound> {
        self.compounds
            .iter()
            .filter(move |c| c.kind == kind && c.parent.is_none())
    }

    /// The corpus-wide reference table.
    #[must_use]
    pub const fn references(&self) -> &ReferenceTable {
        &self.references
    }

    /// Conflicts found while resolving, in the order they were found.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// The number of compounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    /// Returns `true` if the corpus has no compounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}
