//! The compound front-end.
//!
//! One document holds one `<compounddef>` under a `<doxygen>` root. The
//! front-end reads the parts the model needs and skips the rest
//! (dependency graphs, member listings, template parameters). Inside a
//! `<sectiondef>` the vocabulary is closed, and each `<memberdef>` is
//! dispatched on its `kind`.

use quick_xml::events::BytesStart;

use super::{
    attr, bool_attr, element_name, parse_attr, raw::*, required_attr, unknown_tag, DecodeError,
    DocumentError, XmlReader,
};
use crate::domain::{Descriptions, DocString, MemberKind};

/// Decodes one compound document.
///
/// # Errors
///
/// Returns a [`DocumentError`] if the document has no `<doxygen>` root or
/// `<compounddef>`, or if any part of the compound fails to decode. The
/// error carries the compound's name when it was read before the failure.
pub fn parse_document(xml: &str) -> Result<RawCompound, DocumentError> {
    let mut reader = XmlReader::new(xml);
    let root = match reader.root()? {
        Some(root) if root.name().as_ref() == b"doxygen" => root,
        _ => {
            return Err(DecodeError::MissingElement {
                expected: "doxygen",
                context: "document".to_string(),
            }
            .into());
        }
    };

    while let Some(child) = reader.next_child(&root)? {
        if child.name().as_ref() != b"compounddef" {
            tracing::trace!(tag = %element_name(&child), "skipping element outside compounddef");
            reader.skip(&child)?;
            continue;
        }

        let mut compound = RawCompound::default();
        return match reader.compound(&child, &mut compound) {
            Ok(()) => Ok(compound),
            Err(source) => {
                let name = [compound.name, compound.id]
                    .into_iter()
                    .find(|s| !s.is_empty());
                Err(DocumentError::new(name, source))
            }
        };
    }

    Err(DecodeError::MissingElement {
        expected: "compounddef",
        context: "<doxygen>".to_string(),
    }
    .into())
}

/// Accumulates every field a `<memberdef>` may carry before it is
/// narrowed to one kind.
#[derive(Default)]
struct MemberFields {
    info: RawMemberInfo,
    type_: DocString,
    definition: String,
    args_string: String,
    initializer: String,
    params: Vec<RawParam>,
    values: Vec<RawEnumValue>,
    is_static: bool,
    is_const: bool,
    strong: bool,
    virtuality: Option<String>,
    reimplements: Option<String>,
    reimplemented_by: Vec<String>,
}

impl MemberFields {
    fn into_member(self, kind: MemberKind) -> RawMember {
        let Self {
            info,
            type_,
            definition,
            args_string,
            initializer,
            params,
            values,
            is_static,
            is_const,
            strong,
            virtuality,
            reimplements,
            reimplemented_by,
        } = self;

        match kind {
            MemberKind::Function => RawMember::Function(RawFunction {
                info,
                type_,
                definition,
                args_string,
                params,
                is_static,
                is_const,
                virtuality,
                reimplements,
                reimplemented_by,
            }),
            MemberKind::Enum => RawMember::Enum(RawEnum {
                info,
                type_,
                strong,
                values,
            }),
            MemberKind::Variable => RawMember::Variable(RawVariable {
                info,
                type_,
                definition,
                args_string,
                initializer,
                is_static,
            }),
            MemberKind::Define => RawMember::Define(RawDefine {
                info,
                params: params
                    .into_iter()
                    .filter_map(|p| p.def_name.or(p.decl_name))
                    .collect(),
                initializer,
            }),
            MemberKind::Typedef => RawMember::Typedef(RawTypedef {
                info,
                type_,
                definition,
                args_string,
            }),
            MemberKind::Friend => RawMember::Friend(RawFriend {
                info,
                type_,
                definition,
            }),
        }
    }
}

impl XmlReader<'_> {
    fn compound(&mut self, start: &BytesStart<'_>, raw: &mut RawCompound) -> Result<(), DecodeError> {
        raw.id = required_attr(start, "id")?;
        raw.kind = required_attr(start, "kind")?;
        raw.protection = attr(start, "prot")?.unwrap_or_default();
        raw.language = attr(start, "language")?;
        raw.virtuality = attr(start, "virt")?;

        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"compoundname" => raw.name = self.read_text(&child)?,
                b"title" => raw.title = Some(self.read_text(&child)?),
                b"basecompoundref" => raw.base_compounds.push(self.compound_ref(&child)?),
                b"derivedcompoundref" => raw.derived_compounds.push(self.compound_ref(&child)?),
                b"includes" => raw.includes.push(self.include(&child)?),
                b"includedby" => raw.included_by.push(self.include(&child)?),
                b"innerclass" => raw.inner.classes.push(self.inner_ref(&child)?),
                b"innerfile" => raw.inner.files.push(self.inner_ref(&child)?),
                b"innerdir" => raw.inner.dirs.push(self.inner_ref(&child)?),
                b"innergroup" => raw.inner.groups.push(self.inner_ref(&child)?),
                b"innernamespace" => raw.inner.namespaces.push(self.inner_ref(&child)?),
                b"sectiondef" => raw.sections.push(self.section(&child)?),
                b"programlisting" => raw.program_listing = Some(self.listing(&child)?.content),
                b"location" => raw.location = self.location(&child)?,
                b"briefdescription" | b"detaileddescription" | b"inbodydescription" => {
                    self.description(&child, &mut raw.descriptions)?;
                }
                _ => {
                    tracing::trace!(tag = %element_name(&child), "skipping compound element");
                    self.skip(&child)?;
                }
            }
        }
        Ok(())
    }

    fn description(
        &mut self,
        start: &BytesStart<'_>,
        descriptions: &mut Descriptions,
    ) -> Result<(), DecodeError> {
        let doc = self.docstring(start)?;
        match start.name().as_ref() {
            b"briefdescription" => descriptions.brief = doc,
            b"detaileddescription" => descriptions.detailed = doc,
            _ => descriptions.in_body = doc,
        }
        Ok(())
    }

    fn location(&mut self, start: &BytesStart<'_>) -> Result<RawLocation, DecodeError> {
        let location = RawLocation {
            file: attr(start, "file")?.unwrap_or_default(),
            line: parse_attr(start, "line")?,
            column: parse_attr(start, "column")?,
            body_file: attr(start, "bodyfile")?,
            body_start: parse_attr(start, "bodystart")?,
            body_end: parse_attr(start, "bodyend")?,
        };
        self.skip(start)?;
        Ok(location)
    }

    fn inner_ref(&mut self, start: &BytesStart<'_>) -> Result<RawInnerRef, DecodeError> {
        Ok(RawInnerRef {
            ref_id: required_attr(start, "refid")?,
            protection: attr(start, "prot")?.unwrap_or_default(),
            text: self.read_text(start)?,
        })
    }

    fn compound_ref(&mut self, start: &BytesStart<'_>) -> Result<RawCompoundRef, DecodeError> {
        Ok(RawCompoundRef {
            ref_id: attr(start, "refid")?,
            protection: attr(start, "prot")?.unwrap_or_default(),
            virtuality: attr(start, "virt")?,
            name: self.read_text(start)?,
        })
    }

    fn include(&mut self, start: &BytesStart<'_>) -> Result<RawInclude, DecodeError> {
        Ok(RawInclude {
            ref_id: attr(start, "refid")?,
            local: bool_attr(start, "local")?.unwrap_or(false),
            name: self.read_text(start)?,
        })
    }

    fn section(&mut self, start: &BytesStart<'_>) -> Result<RawSection, DecodeError> {
        let mut section = RawSection {
            kind: required_attr(start, "kind")?,
            id: attr(start, "id")?,
            ..RawSection::default()
        };

        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"header" => section.header = Some(self.read_text(&child)?),
                b"description" => section.description = self.docstring(&child)?,
                b"memberdef" => section.members.push(self.member(&child)?),
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        Ok(section)
    }

    fn member(&mut self, start: &BytesStart<'_>) -> Result<RawMember, DecodeError> {
        let kind: MemberKind = required_attr(start, "kind")?.parse()?;
        let mut fields = MemberFields {
            info: RawMemberInfo {
                id: required_attr(start, "id")?,
                protection: attr(start, "prot")?.unwrap_or_default(),
                ..RawMemberInfo::default()
            },
            is_static: bool_attr(start, "static")?.unwrap_or(false),
            is_const: bool_attr(start, "const")?.unwrap_or(false),
            strong: bool_attr(start, "strong")?.unwrap_or(false),
            virtuality: attr(start, "virt")?,
            ..MemberFields::default()
        };

        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"name" => fields.info.name = self.read_text(&child)?,
                b"type" => fields.type_ = self.docstring(&child)?,
                b"definition" => fields.definition = self.read_text(&child)?,
                b"argsstring" => fields.args_string = self.read_text(&child)?,
                b"initializer" => fields.initializer = self.read_text(&child)?,
                b"param" => fields.params.push(self.param(&child)?),
                b"enumvalue" => fields.values.push(self.enum_value(&child)?),
                b"reimplements" => {
                    fields.reimplements = Some(required_attr(&child, "refid")?);
                    self.skip(&child)?;
                }
                b"reimplementedby" => {
                    fields.reimplemented_by.push(required_attr(&child, "refid")?);
                    self.skip(&child)?;
                }
                b"location" => fields.info.location = self.location(&child)?,
                b"briefdescription" | b"detaileddescription" | b"inbodydescription" => {
                    self.description(&child, &mut fields.info.descriptions)?;
                }
                _ => {
                    tracing::trace!(tag = %element_name(&child), "skipping member element");
                    self.skip(&child)?;
                }
            }
        }

        Ok(fields.into_member(kind))
    }

    fn param(&mut self, start: &BytesStart<'_>) -> Result<RawParam, DecodeError> {
        let mut param = RawParam::default();
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"type" => param.type_ = self.docstring(&child)?,
                b"declname" => param.decl_name = Some(self.read_text(&child)?),
                b"defname" => param.def_name = Some(self.read_text(&child)?),
                b"defval" => param.default = Some(self.docstring(&child)?),
                _ => self.skip(&child)?,
            }
        }
        Ok(param)
    }

    fn enum_value(&mut self, start: &BytesStart<'_>) -> Result<RawEnumValue, DecodeError> {
        let mut value = RawEnumValue {
            id: required_attr(start, "id")?,
            protection: attr(start, "prot")?.unwrap_or_default(),
            ..RawEnumValue::default()
        };
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"name" => value.name = self.read_text(&child)?,
                b"initializer" => value.initializer = self.read_text(&child)?,
                b"briefdescription" | b"detaileddescription" | b"inbodydescription" => {
                    self.description(&child, &mut value.descriptions)?;
                }
                _ => self.skip(&child)?,
            }
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocElement, KindCategory};

    const CLASS: &str = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
<doxygen xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" version="1.9.8" xml:lang="en-US">
  <compounddef id="classShape" kind="class" language="C++" prot="public" abstract="yes">
    <compoundname>geo::Shape</compoundname>
    <basecompoundref prot="public" virt="non-virtual">Printable</basecompoundref>
    <derivedcompoundref refid="classCircle" prot="public" virt="non-virtual">geo::Circle</derivedcompoundref>
    <includes refid="shape_8h" local="no">shape.h</includes>
    <innerclass refid="structShape_1_1Extent" prot="public">geo::Shape::Extent</innerclass>
    <sectiondef kind="public-func">
      <memberdef kind="function" id="classShape_1a1" prot="public" static="no" const="yes" explicit="no" inline="no" virt="pure-virtual">
        <type>double</type>
        <definition>virtual double geo::Shape::area</definition>
        <argsstring>() const =0</argsstring>
        <name>area</name>
        <qualifiedname>geo::Shape::area</qualifiedname>
        <reimplements refid="iface_base" >area</reimplements>
        <reimplementedby refid="area_circle">area</reimplementedby>
        <param><type><ref refid="classUnit" kindref="compound">Unit</ref></type><declname>unit</declname><defval>Unit::Metre</defval></param>
        <briefdescription><para>The area.</para></briefdescription>
        <detaileddescription></detaileddescription>
        <inbodydescription></inbodydescription>
        <location file="src/shape.h" line="12" column="18"/>
        <referencedby refid="x" compoundref="y">caller</referencedby>
      </memberdef>
    </sectiondef>
    <sectiondef kind="public-type">
      <memberdef kind="enum" id="classShape_1aKind" prot="public" static="no" strong="yes">
        <type>int</type>
        <name>Kind</name>
        <enumvalue id="classShape_1aKindRound" prot="public">
          <name>Round</name>
          <initializer>= 1</initializer>
          <briefdescription><para>Curved.</para></briefdescription>
          <detaileddescription></detaileddescription>
        </enumvalue>
        <briefdescription></briefdescription>
        <detaileddescription></detaileddescription>
        <inbodydescription></inbodydescription>
        <location file="src/shape.h" line="8" column="1" bodyfile="src/shape.h" bodystart="8" bodyend="10"/>
      </memberdef>
    </sectiondef>
    <briefdescription><para>A shape.</para></briefdescription>
    <detaileddescription><para>See <anchor id="classShape_1notes"/>notes.</para></detaileddescription>
    <inheritancegraph><node id="1"><label>geo::Shape</label></node></inheritancegraph>
    <location file="src/shape.h" line="5" column="1" bodyfile="src/shape.h" bodystart="5" bodyend="-1"/>
    <listofallmembers><member refid="classShape_1a1" prot="public" virt="pure-virtual"><scope>geo::Shape</scope><name>area</name></member></listofallmembers>
  </compounddef>
</doxygen>
"#;

    fn wrap(compounddef: &str) -> String {
        format!("<?xml version='1.0'?><doxygen>{compounddef}</doxygen>")
    }

    #[test]
    fn reads_compound_attributes_and_links() {
        let raw = parse_document(CLASS).unwrap();
        assert_eq!(raw.id, "classShape");
        assert_eq!(raw.kind, "class");
        assert_eq!(raw.name, "geo::Shape");
        assert_eq!(raw.protection, "public");
        assert_eq!(raw.language.as_deref(), Some("C++"));
        assert_eq!(raw.base_compounds[0].ref_id, None);
        assert_eq!(raw.derived_compounds[0].ref_id.as_deref(), Some("classCircle"));
        assert!(!raw.includes[0].local);
        assert_eq!(raw.inner.classes[0].ref_id, "structShape_1_1Extent");
        assert_eq!(raw.inner.classes[0].text, "geo::Shape::Extent");
        assert_eq!(raw.location.line, Some(5));
        assert_eq!(raw.location.body_end, Some(-1));
        assert_eq!(raw.descriptions.brief.plain_text(), "A shape.");
    }

    #[test]
    fn dispatches_members_by_kind() {
        let raw = parse_document(CLASS).unwrap();
        assert_eq!(raw.sections.len(), 2);
        assert_eq!(raw.sections[0].kind, "public-func");

        let [RawMember::Function(function)] = raw.sections[0].members.as_slice() else {
            panic!("expected one function");
        };
        assert_eq!(function.info.name, "area");
        assert!(function.is_const);
        assert!(!function.is_static);
        assert_eq!(function.virtuality.as_deref(), Some("pure-virtual"));
        assert_eq!(function.reimplements.as_deref(), Some("iface_base"));
        assert_eq!(function.reimplemented_by, ["area_circle"]);
        assert_eq!(function.params[0].decl_name.as_deref(), Some("unit"));
        assert!(matches!(
            function.params[0].type_.elements(),
            [DocElement::Ref(_)]
        ));
        assert_eq!(function.info.location.column, Some(18));

        let [RawMember::Enum(kind)] = raw.sections[1].members.as_slice() else {
            panic!("expected one enum");
        };
        assert!(kind.strong);
        assert_eq!(kind.values[0].name, "Round");
        assert_eq!(kind.values[0].initializer, "= 1");
        assert_eq!(kind.info.location.body_file.as_deref(), Some("src/shape.h"));
    }

    #[test]
    fn defines_take_parameter_names() {
        let xml = wrap(
            r#"<compounddef id="util_8h" kind="file"><compoundname>util.h</compoundname>
            <sectiondef kind="define">
              <memberdef kind="define" id="util_8h_1max" prot="public" static="no">
                <name>MAX</name>
                <param><defname>a</defname></param><param><defname>b</defname></param>
                <initializer>((a) &gt; (b) ? (a) : (b))</initializer>
              </memberdef>
            </sectiondef></compounddef>"#,
        );
        let raw = parse_document(&xml).unwrap();
        let [RawMember::Define(define)] = raw.sections[0].members.as_slice() else {
            panic!("expected one define");
        };
        assert_eq!(define.params, ["a", "b"]);
        assert_eq!(define.initializer, "((a) > (b) ? (a) : (b))");
    }

    #[test]
    fn unknown_member_kind_names_the_compound() {
        let xml = wrap(
            r#"<compounddef id="classW" kind="class"><compoundname>Widget</compoundname>
            <sectiondef kind="signal"><memberdef kind="signal" id="classW_1s"><name>clicked</name></memberdef></sectiondef>
            </compounddef>"#,
        );
        let error = parse_document(&xml).unwrap_err();
        assert_eq!(error.compound(), Some("Widget"));
        match error.decode_error() {
            DecodeError::Kind(kind) => {
                assert_eq!(kind.category(), KindCategory::Member);
                assert_eq!(kind.value(), "signal");
            }
            other => panic!("expected a kind error, got {other:?}"),
        }
    }

    #[test]
    fn member_without_kind_is_rejected() {
        let xml = wrap(
            r#"<compounddef id="classW" kind="class"><compoundname>W</compoundname>
            <sectiondef kind="public-func"><memberdef id="classW_1f"><name>f</name></memberdef></sectiondef>
            </compounddef>"#,
        );
        let error = parse_document(&xml).unwrap_err();
        assert!(matches!(
            error.decode_error(),
            DecodeError::MissingAttribute { attribute: "kind", .. }
        ));
    }

    #[test]
    fn unknown_section_child_is_rejected() {
        let xml = wrap(
            r#"<compounddef id="classW" kind="class"><compoundname>W</compoundname>
            <sectiondef kind="public-func"><bogus/></sectiondef></compounddef>"#,
        );
        let error = parse_document(&xml).unwrap_err();
        assert!(matches!(
            error.decode_error(),
            DecodeError::UnknownTag { tag, context } if tag == "bogus" && context == "sectiondef"
        ));
    }

    #[test]
    fn docstring_failure_names_the_compound() {
        let xml = wrap(
            r#"<compounddef id="grpA" kind="group"><compoundname>A</compoundname>
            <detaileddescription><para><blink/></para></detaileddescription></compounddef>"#,
        );
        let error = parse_document(&xml).unwrap_err();
        assert_eq!(error.compound(), Some("A"));
        assert!(error.to_string().contains("<blink>"));
    }

    #[test]
    fn missing_compounddef() {
        let error = parse_document("<doxygen></doxygen>").unwrap_err();
        assert!(error.compound().is_none());
        assert!(matches!(
            error.decode_error(),
            DecodeError::MissingElement { expected: "compounddef", .. }
        ));
    }

    #[test]
    fn wrong_root_element() {
        let error = parse_document("<doxygenindex></doxygenindex>").unwrap_err();
        assert!(matches!(
            error.decode_error(),
            DecodeError::MissingElement { expected: "doxygen", .. }
        ));
    }

    #[test]
    fn page_title_and_program_listing() {
        let xml = wrap(
            r#"<compounddef id="main_8c" kind="file" language="C"><compoundname>main.c</compoundname>
            <programlisting><codeline><highlight class="normal">int<sp/>main();</highlight></codeline></programlisting>
            <location file="main.c"/></compounddef>"#,
        );
        let raw = parse_document(&xml).unwrap();
        let listing = raw.program_listing.unwrap();
        assert_eq!(listing.plain_text(), "int main();\n");
        assert_eq!(raw.location.file, "main.c");
        assert!(raw.location.line.is_none());
    }
}
