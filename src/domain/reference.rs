//! The corpus-wide reference table.
//!
//! Every addressable target (compounds, members, enum values, anchors and
//! sections with an id) gets one entry, keyed by its folded identifier and
//! pointing back at the compound that owns it.

use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer};

use super::{identifier::fold_id, Compound, CompoundKind, DocElement, DocString};

/// Owner marker for entries that have no owning compound (compounds
/// themselves).
pub const NO_OWNER: &str = "N/D";

/// What a reference-table entry points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefKind {
    /// A compound.
    Compound(CompoundKind),
    /// A function member.
    Function,
    /// An enumeration member.
    Enum,
    /// A value of an enumeration.
    EnumValue,
    /// A variable or data member.
    Attribute,
    /// A macro.
    Define,
    /// A type alias.
    Typedef,
    /// A friend declaration.
    Friend,
    /// An anchor inside documentation text.
    Anchor,
    /// A section inside documentation text, with its kind or element name.
    Section(String),
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compound(kind) => fmt::Display::fmt(kind, f),
            Self::Function => f.write_str("function"),
            Self::Enum => f.write_str("enum"),
            Self::EnumValue => f.write_str("enumvalue"),
            Self::Attribute => f.write_str("attribute"),
            Self::Define => f.write_str("define"),
            Self::Typedef => f.write_str("typedef"),
            Self::Friend => f.write_str("friend"),
            Self::Anchor => f.write_str("anchor"),
            Self::Section(kind) => f.write_str(kind),
        }
    }
}

impl Serialize for RefKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefEntry {
    /// What the entry points at.
    pub kind: RefKind,
    /// Display name.
    pub name: String,
    /// Owning compound id; `None` for compounds.
    #[serde(rename = "owner", serialize_with = "serialize_owner")]
    pub owner: Option<String>,
    /// Folded identifier; also the table key.
    pub id: String,
}

impl RefEntry {
    /// The owning compound id, or [`NO_OWNER`].
    #[must_use]
    pub fn owner_id(&self) -> &str {
        self.owner.as_deref().unwrap_or(NO_OWNER)
    }
}

fn serialize_owner<S: Serializer>(owner: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(owner.as_deref().unwrap_or(NO_OWNER))
}

/// Two different entries were produced for the same key; the first one
/// was kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefCollision {
    /// The entry already in the table.
    pub kept: RefEntry,
    /// The entry that was not inserted.
    pub rejected: RefEntry,
}

/// Map from folded identifier to [`RefEntry`], iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceTable {
    entries: BTreeMap<String, RefEntry>,
    #[serde(skip)]
    collisions: Vec<RefCollision>,
}

impl ReferenceTable {
    /// Builds the table for a set of compounds.
    ///
    /// Each compound contributes an entry for itself, one per member and
    /// enum value, and one per anchor or id-bearing section found anywhere
    /// in its descriptions, section descriptions and member descriptions.
    #[must_use]
    pub fn build<'a>(compounds: impl IntoIterator<Item = &'a Compound>) -> Self {
        let mut table = Self::default();
        for compound in compounds {
            table.index_compound(compound);
        }
        table
    }

    /// Looks up an entry; the key is folded before lookup.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RefEntry> {
        self.entries
            .get(id)
            .or_else(|| self.entries.get(&fold_id(id)))
    }

    /// Returns `true` if an entry exists for the (folded) key.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &RefEntry> {
        self.entries.values()
    }

    /// Key collisions observed while building.
    #[must_use]
    pub fn collisions(&self) -> &[RefCollision] {
        &self.collisions
    }

    /// Inserts an entry unless its key is already taken.
    ///
    /// Re-inserting an identical entry is a no-op; a differing entry is
    /// recorded as a [`RefCollision`] and dropped.
    pub fn insert(&mut self, entry: RefEntry) {
        match self.entries.get(&entry.id) {
            None => {
                self.entries.insert(entry.id.clone(), entry);
            }
            Some(existing) if *existing == entry => {}
            Some(existing) => {
                tracing::warn!(
                    id = %entry.id,
                    kept = %existing.owner_id(),
                    rejected = %entry.owner_id(),
                    "duplicate reference id, keeping the first entry"
                );
                self.collisions.push(RefCollision {
                    kept: existing.clone(),
                    rejected: entry,
                });
            }
        }
    }

    fn index_compound(&mut self, compound: &Compound) {
        let owner = compound.id.as_str();
        self.insert(RefEntry {
            kind: RefKind::Compound(compound.kind),
            name: compound.name.clone(),
            owner: None,
            id: compound.id.clone(),
        });
        for doc in compound.descriptions.all() {
            self.index_docstring(owner, doc);
        }

        for section in &compound.sections {
            self.index_docstring(owner, &section.description);

            for function in &section.functions {
                self.member(owner, RefKind::Function, &function.info.id, &function.info.name);
                for doc in function.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
            for e in &section.enums {
                self.member(owner, RefKind::Enum, &e.info.id, &e.info.name);
                for value in &e.values {
                    self.member(owner, RefKind::EnumValue, &value.id, &value.name);
                    for doc in value.descriptions.all() {
                        self.index_docstring(owner, doc);
                    }
                }
                for doc in e.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
            for attribute in &section.attributes {
                self.member(owner, RefKind::Attribute, &attribute.info.id, &attribute.info.name);
                for doc in attribute.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
            for define in &section.defines {
                self.member(owner, RefKind::Define, &define.info.id, &define.info.name);
                for doc in define.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
            for typedef in &section.typedefs {
                self.member(owner, RefKind::Typedef, &typedef.info.id, &typedef.info.name);
                for doc in typedef.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
            for friend in &section.friends {
                self.member(owner, RefKind::Friend, &friend.info.id, &friend.info.name);
                for doc in friend.info.descriptions.all() {
                    self.index_docstring(owner, doc);
                }
            }
        }
    }

    fn member(&mut self, owner: &str, kind: RefKind, id: &str, name: &str) {
        self.insert(RefEntry {
            kind,
            name: name.to_string(),
            owner: Some(owner.to_string()),
            id: id.to_string(),
        });
    }

    /// Adds every anchor and id-bearing section in `doc`, however deeply
    /// nested, as owned by `owner`.
    fn index_docstring(&mut self, owner: &str, doc: &DocString) {
        let mut found = Vec::new();
        doc.walk(&mut |element| match element {
            DocElement::Anchor { id } if id.is_empty() => {
                tracing::warn!(owner = %owner, "skipping anchor without an id");
            }
            DocElement::Anchor { id } => found.push(RefEntry {
                kind: RefKind::Anchor,
                name: id.clone(),
                owner: Some(owner.to_string()),
                id: id.clone(),
            }),
            DocElement::Section(section) => {
                if let Some(id) = section.id.as_ref().filter(|id| !id.is_empty()) {
                    let kind = section
                        .kind
                        .clone()
                        .unwrap_or_else(|| section.level.tag().to_string());
                    found.push(RefEntry {
                        kind: RefKind::Section(kind),
                        name: section.title().unwrap_or_else(|| id.clone()),
                        owner: Some(owner.to_string()),
                        id: id.clone(),
                    });
                }
            }
            _ => {}
        });

        for entry in found {
            self.insert(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{
        Define, Descriptions, DocSection, Enum, EnumValue, Friend, Function, MemberInfo,
        Protection, Section, SectionKind, SectionLevel, Typedef, Variable,
    };

    fn anchor(id: &str) -> DocElement {
        DocElement::Anchor { id: id.into() }
    }

    fn para(elements: Vec<DocElement>) -> DocElement {
        DocElement::Paragraph(DocString::from(elements))
    }

    fn section(kind: SectionKind) -> Section {
        Section {
            id: None,
            kind,
            protection: Protection::Public,
            header: String::new(),
            description: DocString::new(),
            functions: Vec::new(),
            enums: Vec::new(),
            attributes: Vec::new(),
            defines: Vec::new(),
            typedefs: Vec::new(),
            friends: Vec::new(),
        }
    }

    #[test]
    fn compounds_have_no_owner() {
        let compound = Compound::new("grpa", CompoundKind::Group, "A");
        let table = ReferenceTable::build([&compound]);
        let entry = table.get("grpa").unwrap();
        assert_eq!(entry.owner_id(), NO_OWNER);
        assert_eq!(entry.kind.to_string(), "group");
    }

    #[test]
    fn lookup_folds_the_key() {
        let compound = Compound::new("grpa", CompoundKind::Group, "A");
        let table = ReferenceTable::build([&compound]);
        assert!(table.contains("grpA"));
    }

    #[test]
    fn members_and_enum_values_are_owned_by_the_compound() {
        let mut compound = Compound::new("classfoo", CompoundKind::Class, "Foo");
        let mut functions = section(SectionKind::Functions);
        functions.functions.push(Function {
            info: MemberInfo {
                id: "classfoo_1abc".into(),
                name: "bar".into(),
                ..MemberInfo::default()
            },
            ..Function::default()
        });
        let mut enums = section(SectionKind::Enums);
        enums.enums.push(Enum {
            info: MemberInfo {
                id: "classfoo_1aenum".into(),
                name: "Color".into(),
                ..MemberInfo::default()
            },
            values: vec![EnumValue {
                id: "classfoo_1ared".into(),
                name: "Red".into(),
                ..EnumValue::default()
            }],
            ..Enum::default()
        });
        compound.sections = vec![functions, enums];

        let table = ReferenceTable::build([&compound]);
        assert_eq!(table.len(), 4);
        for id in ["classfoo_1abc", "classfoo_1aenum", "classfoo_1ared"] {
            assert_eq!(table.get(id).unwrap().owner_id(), "classfoo");
        }
        assert_eq!(table.get("classfoo_1ared").unwrap().kind, RefKind::EnumValue);
    }

    #[test_case(RefKind::Attribute; "attribute")]
    #[test_case(RefKind::Define; "define")]
    #[test_case(RefKind::Typedef; "typedef")]
    #[test_case(RefKind::Friend; "friend")]
    fn member_lists_are_owned_by_the_compound(kind: RefKind) {
        let info = MemberInfo {
            id: "filex_1member".into(),
            name: "member".into(),
            descriptions: Descriptions {
                detailed: DocString::from(vec![para(vec![anchor("filex_1member_note")])]),
                ..Descriptions::default()
            },
            ..MemberInfo::default()
        };
        let section = match kind {
            RefKind::Attribute => Section {
                attributes: vec![Variable {
                    info,
                    ..Variable::default()
                }],
                ..section(SectionKind::Variables)
            },
            RefKind::Define => Section {
                defines: vec![Define {
                    info,
                    ..Define::default()
                }],
                ..section(SectionKind::Defines)
            },
            RefKind::Typedef => Section {
                typedefs: vec![Typedef {
                    info,
                    ..Typedef::default()
                }],
                ..section(SectionKind::Typedefs)
            },
            RefKind::Friend => Section {
                friends: vec![Friend {
                    info,
                    ..Friend::default()
                }],
                ..section(SectionKind::Friends)
            },
            other => unreachable!("no member list for {other}"),
        };
        let mut compound = Compound::new("filex", CompoundKind::File, "x.h");
        compound.sections = vec![section];

        let table = ReferenceTable::build([&compound]);
        let entry = table.get("filex_1member").unwrap();
        assert_eq!(entry.kind, kind);
        assert_eq!(entry.name, "member");
        assert_eq!(entry.owner_id(), "filex");
        assert_eq!(table.get("filex_1member_note").unwrap().owner_id(), "filex");
    }

    #[test]
    fn deeply_nested_anchors_belong_to_the_enclosing_compound() {
        let mut compound = Compound::new("pagex", CompoundKind::Page, "X");
        compound.descriptions = Descriptions {
            detailed: DocString::from(vec![DocElement::ItemizedList(vec![DocString::from(
                vec![para(vec![DocElement::Emphasis(DocString::from(vec![anchor(
                    "deep",
                )]))])],
            )])]),
            ..Descriptions::default()
        };

        let table = ReferenceTable::build([&compound]);
        let entry = table.get("deep").unwrap();
        assert_eq!(entry.owner_id(), "pagex");
        assert_eq!(entry.kind, RefKind::Anchor);
    }

    #[test]
    fn sections_with_ids_use_their_title() {
        let mut compound = Compound::new("pagex", CompoundKind::Page, "X");
        compound.descriptions.detailed = DocString::from(vec![DocElement::Section(DocSection {
            level: SectionLevel::Sect1,
            id: Some("pagex_1intro".into()),
            kind: None,
            content: DocString::from(vec![DocElement::Title(DocString::from(vec![
                DocElement::Text("Introduction".into()),
            ]))]),
        })]);

        let table = ReferenceTable::build([&compound]);
        let entry = table.get("pagex_1intro").unwrap();
        assert_eq!(entry.name, "Introduction");
        assert_eq!(entry.kind.to_string(), "sect1");
    }

    #[test]
    fn sections_without_ids_are_not_indexed() {
        let mut compound = Compound::new("pagex", CompoundKind::Page, "X");
        compound.descriptions.brief = DocString::from(vec![DocElement::Section(DocSection {
            level: SectionLevel::Simple,
            id: None,
            kind: Some("note".into()),
            content: DocString::from(vec![anchor("inside")]),
        })]);

        let table = ReferenceTable::build([&compound]);
        assert_eq!(table.len(), 2);
        assert!(table.contains("inside"));
    }

    #[test]
    fn empty_anchor_is_skipped() {
        let mut compound = Compound::new("pagex", CompoundKind::Page, "X");
        compound.descriptions.brief = DocString::from(vec![anchor(""), anchor("ok")]);

        let table = ReferenceTable::build([&compound]);
        assert!(table.contains("ok"));
        assert!(!table.contains(""));
    }

    #[test]
    fn first_entry_wins_on_collision() {
        let mut a = Compound::new("a", CompoundKind::Page, "A");
        a.descriptions.brief = DocString::from(vec![anchor("shared")]);
        let mut b = Compound::new("b", CompoundKind::Page, "B");
        b.descriptions.brief = DocString::from(vec![anchor("shared")]);

        let table = ReferenceTable::build([&a, &b]);
        assert_eq!(table.get("shared").unwrap().owner_id(), "a");
        assert_eq!(table.collisions().len(), 1);
        assert_eq!(table.collisions()[0].rejected.owner_id(), "b");
    }
}
