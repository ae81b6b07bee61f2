//! Mapping of raw schema records onto the canonical model.
//!
//! This is where kind strings become enums, protections are checked, ids
//! (including every id inside documentation text) are folded, and section
//! headers are inferred. Each compound is normalized on its own; nothing
//! here looks at other compounds.

use crate::{
    domain::{
        fold_id, BodyRange, Compound, CompoundKind, CompoundRef, Define, Descriptions, DocString,
        Enum, EnumValue, Friend, Function, Include, InnerRef, InnerRefs, Location, MemberInfo,
        Param, Reimplements, Section, SectionKind, Typedef, UnknownKindError, Variable,
    },
    xml::raw::{
        RawCompound, RawCompoundRef, RawEnum, RawFunction, RawInclude, RawInnerRef, RawLocation,
        RawMember, RawMemberInfo, RawParam, RawSection,
    },
};

/// Normalizes one raw compound.
///
/// # Errors
///
/// Returns [`UnknownKindError`] if the compound kind, a section kind or any
/// protection is outside the known set.
pub fn normalize(raw: RawCompound) -> Result<Compound, UnknownKindError> {
    let kind: CompoundKind = raw.kind.parse()?;
    let mut compound = Compound::new(fold_id(&raw.id), kind, raw.name);
    if let Some(title) = raw.title.filter(|title| !title.is_empty()) {
        compound.title = title;
    }
    compound.protection = raw.protection.parse()?;
    compound.language = raw.language;
    compound.virtuality = raw.virtuality;
    compound.location = location(raw.location);

    compound.inner = InnerRefs {
        classes: inner_refs(raw.inner.classes)?,
        files: inner_refs(raw.inner.files)?,
        dirs: inner_refs(raw.inner.dirs)?,
        groups: inner_refs(raw.inner.groups)?,
        namespaces: inner_refs(raw.inner.namespaces)?,
    };
    compound.base_compounds = compound_refs(raw.base_compounds)?;
    compound.derived_compounds = compound_refs(raw.derived_compounds)?;
    compound.includes = raw.includes.into_iter().map(include).collect();
    compound.included_by = raw.included_by.into_iter().map(include).collect();
    compound.program_listing = raw.program_listing.map(folded);
    compound.descriptions = descriptions(raw.descriptions);

    compound.sections = raw
        .sections
        .into_iter()
        .map(|section| normalize_section(kind, section))
        .collect::<Result<_, _>>()?;

    Ok(compound)
}

fn folded(mut doc: DocString) -> DocString {
    doc.fold_ids();
    doc
}

fn descriptions(mut descriptions: Descriptions) -> Descriptions {
    descriptions.fold_ids();
    descriptions
}

fn location(raw: RawLocation) -> Location {
    let body = raw.body_file.map(|file| BodyRange {
        file,
        start: raw.body_start.unwrap_or_default(),
        end: raw.body_end.unwrap_or(-1),
    });
    Location {
        file: raw.file,
        line: raw.line,
        column: raw.column,
        body,
        file_ref: None,
        body_file_ref: None,
    }
}

fn inner_refs(raw: Vec<RawInnerRef>) -> Result<Vec<InnerRef>, UnknownKindError> {
    raw.into_iter()
        .map(|r| -> Result<_, UnknownKindError> {
            Ok(InnerRef {
                target_id: fold_id(&r.ref_id),
                protection: r.protection.parse()?,
                text: r.text,
            })
        })
        .collect()
}

fn compound_refs(raw: Vec<RawCompoundRef>) -> Result<Vec<CompoundRef>, UnknownKindError> {
    raw.into_iter()
        .map(|r| -> Result<_, UnknownKindError> {
            Ok(CompoundRef {
                ref_id: r.ref_id.as_deref().map(fold_id),
                protection: r.protection.parse()?,
                virtuality: r.virtuality,
                name: r.name,
            })
        })
        .collect()
}

fn include(raw: RawInclude) -> Include {
    Include {
        ref_id: raw.ref_id.as_deref().map(fold_id),
        local: raw.local,
        name: raw.name,
    }
}

/// Normalizes one section of a compound of the given kind.
///
/// # Errors
///
/// Returns [`UnknownKindError`] if the section kind or a member protection
/// is outside the known set.
pub fn normalize_section(
    compound: CompoundKind,
    raw: RawSection,
) -> Result<Section, UnknownKindError> {
    let (kind, protection) = SectionKind::parse_composite(&raw.kind)?;
    let header = raw
        .header
        .filter(|header| !header.trim().is_empty())
        .unwrap_or_else(|| Section::infer_header(compound, kind, protection));

    let mut section = Section {
        id: raw.id.as_deref().map(fold_id),
        kind,
        protection,
        header,
        description: folded(raw.description),
        functions: Vec::new(),
        enums: Vec::new(),
        attributes: Vec::new(),
        defines: Vec::new(),
        typedefs: Vec::new(),
        friends: Vec::new(),
    };

    for member in raw.members {
        match member {
            RawMember::Function(f) => section.functions.push(function(f)?),
            RawMember::Enum(e) => section.enums.push(enumeration(e)?),
            RawMember::Variable(v) => section.attributes.push(Variable {
                info: member_info(v.info)?,
                type_: folded(v.type_),
                definition: v.definition,
                args_string: v.args_string,
                initializer: v.initializer,
                is_static: v.is_static,
            }),
            RawMember::Define(d) => section.defines.push(Define {
                info: member_info(d.info)?,
                params: d.params,
                initializer: d.initializer,
            }),
            RawMember::Typedef(t) => section.typedefs.push(Typedef {
                info: member_info(t.info)?,
                type_: folded(t.type_),
                definition: t.definition,
                args_string: t.args_string,
            }),
            RawMember::Friend(f) => section.friends.push(Friend {
                info: member_info(f.info)?,
                type_: folded(f.type_),
                definition: f.definition,
            }),
        }
    }

    Ok(section)
}

fn member_info(raw: RawMemberInfo) -> Result<MemberInfo, UnknownKindError> {
    Ok(MemberInfo {
        id: fold_id(&raw.id),
        name: raw.name,
        protection: raw.protection.parse()?,
        location: location(raw.location),
        descriptions: descriptions(raw.descriptions),
    })
}

fn function(raw: RawFunction) -> Result<Function, UnknownKindError> {
    let info = member_info(raw.info)?;
    let reimplements = raw
        .reimplements
        .and_then(|ref_id| parse_reimplements(&info.id, &ref_id));
    let reimplemented_by = raw
        .reimplemented_by
        .iter()
        .filter_map(|ref_id| parse_reimplements(&info.id, ref_id))
        .collect();

    Ok(Function {
        info,
        type_: folded(raw.type_),
        definition: raw.definition,
        args_string: raw.args_string,
        params: raw.params.into_iter().map(param).collect(),
        is_static: raw.is_static,
        is_const: raw.is_const,
        virtuality: raw.virtuality.filter(|v| v != "non-virtual"),
        reimplements,
        reimplemented_by,
    })
}

/// Parses a reimplements relation, dropping it with a warning when the id
/// does not follow the `<memberId>_<parentId>` rule.
fn parse_reimplements(member: &str, ref_id: &str) -> Option<Reimplements> {
    Reimplements::parse(ref_id)
        .inspect_err(|e| tracing::warn!(%member, error = %e, "dropping reimplements relation"))
        .ok()
}

fn param(raw: RawParam) -> Param {
    Param {
        type_: folded(raw.type_),
        name: raw.decl_name.or(raw.def_name).unwrap_or_default(),
        default: raw.default.map(folded),
    }
}

fn enumeration(raw: RawEnum) -> Result<Enum, UnknownKindError> {
    let values = raw
        .values
        .into_iter()
        .map(|v| -> Result<_, UnknownKindError> {
            Ok(EnumValue {
                id: fold_id(&v.id),
                name: v.name,
                initializer: v.initializer,
                protection: v.protection.parse()?,
                descriptions: descriptions(v.descriptions),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Enum {
        info: member_info(raw.info)?,
        type_: folded(raw.type_),
        strong: raw.strong,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DocElement, KindCategory, Protection},
        xml::raw::{RawEnumValue, RawFriend, RawInner, RawVariable},
    };

    fn raw_compound(id: &str, kind: &str) -> RawCompound {
        RawCompound {
            id: id.into(),
            kind: kind.into(),
            name: id.into(),
            ..RawCompound::default()
        }
    }

    fn raw_section(kind: &str, members: Vec<RawMember>) -> RawSection {
        RawSection {
            kind: kind.into(),
            members,
            ..RawSection::default()
        }
    }

    fn raw_info(id: &str) -> RawMemberInfo {
        RawMemberInfo {
            id: id.into(),
            name: id.into(),
            protection: "public".into(),
            ..RawMemberInfo::default()
        }
    }

    #[test]
    fn protected_attrib_section() {
        let mut raw = raw_compound("classFoo", "class");
        raw.sections.push(raw_section(
            "protected-attrib",
            vec![RawMember::Variable(RawVariable {
                info: raw_info("classFoo_1aX"),
                ..RawVariable::default()
            })],
        ));
        let compound = normalize(raw).unwrap();
        let section = &compound.sections[0];
        assert_eq!(section.kind, SectionKind::Attributes);
        assert_eq!(section.protection, Protection::Protected);
        assert_eq!(section.header, "Protected Attributes");
        assert_eq!(section.attributes[0].info.id, "classfoo_1ax");
    }

    #[test]
    fn group_enum_section_has_no_prefix() {
        let mut raw = raw_compound("grpA", "group");
        raw.sections.push(raw_section("enum", Vec::new()));
        let compound = normalize(raw).unwrap();
        assert_eq!(compound.sections[0].header, "Enumerations");
    }

    #[test]
    fn explicit_header_wins() {
        let mut raw = raw_compound("classFoo", "class");
        let mut section = raw_section("user-defined", Vec::new());
        section.header = Some("Accessors".into());
        raw.sections.push(section);
        let compound = normalize(raw).unwrap();
        assert_eq!(compound.sections[0].header, "Accessors");
        assert_eq!(compound.sections[0].kind, SectionKind::UserDefined);
    }

    #[test]
    fn reimplements_is_split() {
        let mut raw = raw_compound("classFoo", "class");
        raw.sections.push(raw_section(
            "public-func",
            vec![RawMember::Function(RawFunction {
                info: raw_info("classFoo_1aF"),
                reimplements: Some("func123_class456".into()),
                reimplemented_by: vec!["bad_id_here".into(), "Sub_Impl".into()],
                virtuality: Some("non-virtual".into()),
                ..RawFunction::default()
            })],
        ));
        let compound = normalize(raw).unwrap();
        let function = &compound.sections[0].functions[0];
        let reimplements = function.reimplements.as_ref().unwrap();
        assert_eq!(reimplements.member_id, "func123");
        assert_eq!(reimplements.parent_id, "class456");
        assert_eq!(function.reimplemented_by.len(), 1);
        assert_eq!(function.reimplemented_by[0].member_id, "sub");
        assert!(function.virtuality.is_none());
    }

    #[test]
    fn structs_are_classes() {
        let compound = normalize(raw_compound("structPoint", "struct")).unwrap();
        assert_eq!(compound.kind, CompoundKind::Class);
        assert_eq!(compound.id, "structpoint");
        assert_eq!(compound.title, "structPoint");
        assert_eq!(compound.protection, Protection::Unspecified);
    }

    #[test]
    fn unknown_compound_kind() {
        let error = normalize(raw_compound("x", "interface")).unwrap_err();
        assert_eq!(error.category(), KindCategory::Compound);
        assert_eq!(error.value(), "interface");
    }

    #[test]
    fn unknown_protection() {
        let mut raw = raw_compound("classFoo", "class");
        raw.protection = "package".into();
        let error = normalize(raw).unwrap_err();
        assert_eq!(error.category(), KindCategory::Protection);
    }

    #[test]
    fn unknown_section_kind() {
        let mut raw = raw_compound("classFoo", "class");
        raw.sections.push(raw_section("public-slot", Vec::new()));
        let error = normalize(raw).unwrap_err();
        assert_eq!(error.category(), KindCategory::Section);
        assert_eq!(error.value(), "public-slot");
    }

    #[test]
    fn ids_are_folded_everywhere() {
        let mut raw = raw_compound("grpB", "group");
        raw.inner = RawInner {
            groups: vec![RawInnerRef {
                ref_id: "grpC".into(),
                protection: String::new(),
                text: "C".into(),
            }],
            ..RawInner::default()
        };
        raw.descriptions.detailed =
            DocString::from(vec![DocElement::Anchor { id: "anchorX".into() }]);
        raw.sections.push(raw_section(
            "enum",
            vec![RawMember::Enum(RawEnum {
                info: raw_info("grpB_1E"),
                values: vec![RawEnumValue {
                    id: "grpB_1E_V".into(),
                    name: "V".into(),
                    ..RawEnumValue::default()
                }],
                ..RawEnum::default()
            })],
        ));

        let compound = normalize(raw).unwrap();
        assert_eq!(compound.id, "grpb");
        assert_eq!(compound.inner.groups[0].target_id, "grpc");
        assert_eq!(
            compound.descriptions.detailed.elements(),
            [DocElement::Anchor { id: "anchorx".into() }]
        );
        let e = &compound.sections[0].enums[0];
        assert_eq!(e.info.id, "grpb_1e");
        assert_eq!(e.values[0].id, "grpb_1e_v");
        assert_eq!(e.values[0].protection, Protection::Unspecified);
    }

    #[test]
    fn folding_is_idempotent() {
        let raw = raw_compound("already_lower", "page");
        let once = normalize(raw.clone()).unwrap();
        let mut again = raw;
        again.id = once.id.clone();
        assert_eq!(normalize(again).unwrap().id, once.id);
    }

    #[test]
    fn body_ranges_and_friends() {
        let mut raw = raw_compound("classFoo", "class");
        raw.location = RawLocation {
            file: "src/Foo.h".into(),
            line: Some(3),
            column: None,
            body_file: Some("src/Foo.h".into()),
            body_start: Some(3),
            body_end: None,
        };
        let mut info = raw_info("classFoo_1aOp");
        info.protection = "private".into();
        raw.sections.push(raw_section(
            "friend",
            vec![RawMember::Friend(RawFriend {
                info,
                definition: "friend class Bar".into(),
                ..RawFriend::default()
            })],
        ));

        let compound = normalize(raw).unwrap();
        assert_eq!(compound.location.file, "src/Foo.h");
        assert_eq!(
            compound.location.body,
            Some(BodyRange {
                file: "src/Foo.h".into(),
                start: 3,
                end: -1,
            })
        );
        let section = &compound.sections[0];
        assert_eq!(section.header, "Friends");
        assert_eq!(section.friends[0].info.protection, Protection::Private);
    }
}
