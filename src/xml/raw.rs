//! These records mirror the compound schema. Kinds and protections are
//! still the strings found in the document and ids are not yet folded;
//! the normalizer does both.

use crate::domain::{Descriptions, DocString};

/// A `<location>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLocation {
    /// `file`
    pub file: String,
    /// `line`
    pub line: Option<u32>,
    /// `column`
    pub column: Option<u32>,
    /// `bodyfile`
    pub body_file: Option<String>,
    /// `bodystart`
    pub body_start: Option<i64>,
    /// `bodyend`
    pub body_end: Option<i64>,
}

/// One of the `<innerclass>`, `<innerfile>`, ... references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInnerRef {
    /// `refid`
    pub ref_id: String,
    /// `prot`, empty when absent.
    pub protection: String,
    /// The element text.
    pub text: String,
}

/// The five categories of inner references, in document order per
/// category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInner {
    /// `<innerclass>`
    pub classes: Vec<RawInnerRef>,
    /// `<innerfile>`
    pub files: Vec<RawInnerRef>,
    /// `<innerdir>`
    pub dirs: Vec<RawInnerRef>,
    /// `<innergroup>`
    pub groups: Vec<RawInnerRef>,
    /// `<innernamespace>`
    pub namespaces: Vec<RawInnerRef>,
}

/// A `<basecompoundref>` or `<derivedcompoundref>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompoundRef {
    /// `refid`, absent for undocumented bases.
    pub ref_id: Option<String>,
    /// `prot`
    pub protection: String,
    /// `virt`
    pub virtuality: Option<String>,
    /// The element text.
    pub name: String,
}

/// An `<includes>` or `<includedby>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInclude {
    /// `refid`, absent for files outside the corpus.
    pub ref_id: Option<String>,
    /// `local="yes"`
    pub local: bool,
    /// The element text.
    pub name: String,
}

/// A `<compounddef>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCompound {
    /// `id`
    pub id: String,
    /// `kind`
    pub kind: String,
    /// `<compoundname>`
    pub name: String,
    /// `<title>`
    pub title: Option<String>,
    /// `prot`
    pub protection: String,
    /// `language`
    pub language: Option<String>,
    /// `virt`
    pub virtuality: Option<String>,
    /// `<location>`
    pub location: RawLocation,
    /// `<sectiondef>` children.
    pub sections: Vec<RawSection>,
    /// Inner compound references.
    pub inner: RawInner,
    /// `<basecompoundref>` children.
    pub base_compounds: Vec<RawCompoundRef>,
    /// `<derivedcompoundref>` children.
    pub derived_compounds: Vec<RawCompoundRef>,
    /// `<includes>` children.
    pub includes: Vec<RawInclude>,
    /// `<includedby>` children.
    pub included_by: Vec<RawInclude>,
    /// `<programlisting>`
    pub program_listing: Option<DocString>,
    /// Brief, detailed and in-body descriptions.
    pub descriptions: Descriptions,
}

/// A `<sectiondef>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSection {
    /// `kind`, possibly composite (`"public-func"`).
    pub kind: String,
    /// `id`
    pub id: Option<String>,
    /// `<header>`
    pub header: Option<String>,
    /// `<description>`
    pub description: DocString,
    /// The `<memberdef>` children, dispatched by kind.
    pub members: Vec<RawMember>,
}

/// Fields every `<memberdef>` carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMemberInfo {
    /// `id`
    pub id: String,
    /// `<name>`
    pub name: String,
    /// `prot`
    pub protection: String,
    /// `<location>`
    pub location: RawLocation,
    /// Brief, detailed and in-body descriptions.
    pub descriptions: Descriptions,
}

/// A `<param>` of a function or macro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParam {
    /// `<type>`
    pub type_: DocString,
    /// `<declname>`
    pub decl_name: Option<String>,
    /// `<defname>`
    pub def_name: Option<String>,
    /// `<defval>`
    pub default: Option<DocString>,
}

/// `<memberdef kind="function">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFunction {
    /// Common fields.
    pub info: RawMemberInfo,
    /// `<type>`
    pub type_: DocString,
    /// `<definition>`
    pub definition: String,
    /// `<argsstring>`
    pub args_string: String,
    /// `<param>` children.
    pub params: Vec<RawParam>,
    /// `static="yes"`
    pub is_static: bool,
    /// `const="yes"`
    pub is_const: bool,
    /// `virt`
    pub virtuality: Option<String>,
    /// `<reimplements refid>`
    pub reimplements: Option<String>,
    /// `<reimplementedby refid>` children.
    pub reimplemented_by: Vec<String>,
}

/// An `<enumvalue>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnumValue {
    /// `id`
    pub id: String,
    /// `<name>`
    pub name: String,
    /// `<initializer>`
    pub initializer: String,
    /// `prot`
    pub protection: String,
    /// Value descriptions.
    pub descriptions: Descriptions,
}

/// `<memberdef kind="enum">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnum {
    /// Common fields.
    pub info: RawMemberInfo,
    /// `<type>`
    pub type_: DocString,
    /// `strong="yes"`
    pub strong: bool,
    /// `<enumvalue>` children.
    pub values: Vec<RawEnumValue>,
}

/// `<memberdef kind="variable">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVariable {
    /// Common fields.
    pub info: RawMemberInfo,
    /// `<type>`
    pub type_: DocString,
    /// `<definition>`
    pub definition: String,
    /// `<argsstring>`
    pub args_string: String,
    /// `<initializer>`
    pub initializer: String,
    /// `static="yes"`
    pub is_static: bool,
}

/// `<memberdef kind="define">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDefine {
    /// Common fields.
    pub info: RawMemberInfo,
    /// Parameter names.
    pub params: Vec<String>,
    /// `<initializer>`
    pub initializer: String,
}

/// `<memberdef kind="typedef">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTypedef {
    /// Common fields.
    pub info: RawMemberInfo,
    /// `<type>`
    pub type_: DocString,
    /// `<definition>`
    pub definition: String,
    /// `<argsstring>`
    pub args_string: String,
}

/// `<memberdef kind="friend">`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFriend {
    /// Common fields.
    pub info: RawMemberInfo,
    /// `<type>`
    pub type_: DocString,
    /// `<definition>`
    pub definition: String,
}

/// A `<memberdef>`, dispatched on its `kind` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMember {
    /// `function`
    Function(RawFunction),
    /// `enum`
    Enum(RawEnum),
    /// `variable`
    Variable(RawVariable),
    /// `define`
    Define(RawDefine),
    /// `typedef`
    Typedef(RawTypedef),
    /// `friend`
    Friend(RawFriend),
}

impl RawMember {
    /// The fields shared by every member kind.
    #[must_use]
    pub const fn info(&self) -> &RawMemberInfo {
        match self {
            Self::Function(m) => &m.info,
            Self::Enum(m) => &m.info,
            Self::Variable(m) => &m.info,
            Self::Define(m) => &m.info,
            Self::Typedef(m) => &m.info,
            Self::Friend(m) => &m.info,
        }
    }
}
