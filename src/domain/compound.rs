use serde::Serialize;

use super::{
    CompoundKind, Define, DocString, Enum, Friend, Function, Protection, SectionKind, Typedef,
    Variable,
};

/// Brief, detailed and in-body descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Descriptions {
    /// `<briefdescription>`
    pub brief: DocString,
    /// `<detaileddescription>`
    pub detailed: DocString,
    /// `<inbodydescription>`
    pub in_body: DocString,
}

impl Descriptions {
    /// The three descriptions in the order they are indexed.
    #[must_use]
    pub fn all(&self) -> [&DocString; 3] {
        [&self.detailed, &self.brief, &self.in_body]
    }

    /// Lowercases identifiers in all three descriptions.
    pub fn fold_ids(&mut self) {
        self.brief.fold_ids();
        self.detailed.fold_ids();
        self.in_body.fold_ids();
    }
}

/// The span of a definition's body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BodyRange {
    /// File containing the body.
    pub file: String,
    /// First line of the body.
    pub start: i64,
    /// Last line of the body; `-1` when the body runs to the end of the file.
    pub end: i64,
}

/// Where an entity is declared, plus the File compounds it resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Declaring file path, as written by the generator.
    pub file: String,
    /// Declaring line.
    pub line: Option<u32>,
    /// Declaring column.
    pub column: Option<u32>,
    /// Body range, when the entity has a body.
    pub body: Option<BodyRange>,
    /// Id of the File compound for [`Location::file`]; set by the resolver.
    pub file_ref: Option<String>,
    /// Id of the File compound for the body file; set by the resolver.
    pub body_file_ref: Option<String>,
}

/// An unresolved edge from a compound to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InnerRef {
    /// Folded id of the child compound.
    pub target_id: String,
    /// Protection at the point of reference.
    pub protection: Protection,
    /// Display text of the reference.
    pub text: String,
}

/// The five categories of inner-compound references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InnerRefs {
    /// `<innerclass>`
    pub classes: Vec<InnerRef>,
    /// `<innerfile>`
    pub files: Vec<InnerRef>,
    /// `<innerdir>`
    pub dirs: Vec<InnerRef>,
    /// `<innergroup>`
    pub groups: Vec<InnerRef>,
    /// `<innernamespace>`
    pub namespaces: Vec<InnerRef>,
}

impl InnerRefs {
    /// Iterates over every inner reference, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &InnerRef> {
        self.classes
            .iter()
            .chain(&self.files)
            .chain(&self.dirs)
            .chain(&self.groups)
            .chain(&self.namespaces)
    }

    /// The total number of inner references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
            + self.files.len()
            + self.dirs.len()
            + self.groups.len()
            + self.namespaces.len()
    }

    /// Returns `true` if there are no inner references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reference to a base or derived compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundRef {
    /// Folded id of the referenced compound, when it is documented.
    pub ref_id: Option<String>,
    /// Inheritance protection.
    pub protection: Protection,
    /// `virtual` or `non-virtual`.
    pub virtuality: Option<String>,
    /// Display name.
    pub name: String,
}

/// An `#include` edge of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Include {
    /// Folded id of the included file, when it is documented.
    pub ref_id: Option<String>,
    /// `#include "..."` rather than `#include <...>`.
    pub local: bool,
    /// The include text.
    pub name: String,
}

/// A named grouping of members within a compound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Folded section id, when present.
    pub id: Option<String>,
    /// Section kind.
    pub kind: SectionKind,
    /// Protection taken from a composite kind such as `"public-func"`.
    pub protection: Protection,
    /// The explicit header, or one inferred from kind and protection.
    pub header: String,
    /// Section description.
    pub description: DocString,
    /// Functions.
    pub functions: Vec<Function>,
    /// Enumerations.
    pub enums: Vec<Enum>,
    /// Variables and data members.
    pub attributes: Vec<Variable>,
    /// Macros.
    pub defines: Vec<Define>,
    /// Type aliases.
    pub typedefs: Vec<Typedef>,
    /// Friend declarations.
    pub friends: Vec<Friend>,
}

impl Section {
    /// Builds the header for a section without an explicit one.
    ///
    /// Group compounds get the bare kind title ("Enumerations"); every other
    /// compound kind prefixes the protection word ("Public Functions") when
    /// a protection is known.
    #[must_use]
    pub fn infer_header(
        compound: CompoundKind,
        kind: SectionKind,
        protection: Protection,
    ) -> String {
        match (compound, protection.header_word()) {
            (CompoundKind::Group, _) | (_, None) => kind.title().to_string(),
            (_, Some(word)) => format!("{word} {}", kind.title()),
        }
    }

    /// Total number of members across all member lists.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.functions.len()
            + self.enums.len()
            + self.attributes.len()
            + self.defines.len()
            + self.typedefs.len()
            + self.friends.len()
    }
}

/// One top-level documented entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compound {
    /// Folded identifier.
    pub id: String,
    /// Compound kind.
    pub kind: CompoundKind,
    /// Qualified name.
    pub name: String,
    /// Title; the name when no title is given.
    pub title: String,
    /// Declared protection.
    pub protection: Protection,
    /// Source language, when given.
    pub language: Option<String>,
    /// `virtual` / `non-virtual`, when given.
    pub virtuality: Option<String>,
    /// Declaring location.
    pub location: Location,
    /// Member sections.
    pub sections: Vec<Section>,
    /// References to child compounds.
    pub inner: InnerRefs,
    /// Base classes.
    pub base_compounds: Vec<CompoundRef>,
    /// Derived classes.
    pub derived_compounds: Vec<CompoundRef>,
    /// Files included by this file.
    pub includes: Vec<Include>,
    /// Files including this file.
    pub included_by: Vec<Include>,
    /// Inline program listing of a file.
    pub program_listing: Option<DocString>,
    /// Id of the compound listing this one as an inner child; set by the
    /// resolver.
    pub parent: Option<String>,
    /// Compound descriptions.
    #[serde(flatten)]
    pub descriptions: Descriptions,
}

impl Compound {
    /// Creates a compound with no sections, references or descriptions.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: CompoundKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            kind,
            title: name.clone(),
            name,
            protection: Protection::Unspecified,
            language: None,
            virtuality: None,
            location: Location::default(),
            sections: Vec::new(),
            inner: InnerRefs::default(),
            base_compounds: Vec::new(),
            derived_compounds: Vec::new(),
            includes: Vec::new(),
            included_by: Vec::new(),
            program_listing: None,
            parent: None,
            descriptions: Descriptions::default(),
        }
    }
}
