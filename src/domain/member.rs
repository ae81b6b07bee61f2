//! Typed member records held by a [`Section`](super::Section).

use serde::Serialize;

use super::{Descriptions, DocString, Location, Protection, Reimplements};

/// Fields shared by every member kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    /// Folded identifier.
    pub id: String,
    /// Declared name.
    pub name: String,
    /// Declared protection.
    pub protection: Protection,
    /// Where the member is declared.
    pub location: Location,
    /// Brief, detailed and in-body descriptions.
    #[serde(flatten)]
    pub descriptions: Descriptions,
}

/// A function parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Parameter type.
    #[serde(rename = "type")]
    pub type_: DocString,
    /// Declared name; empty for unnamed parameters.
    pub name: String,
    /// Default value, if any.
    pub default: Option<DocString>,
}

/// A function or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Function {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// Return type.
    #[serde(rename = "type")]
    pub type_: DocString,
    /// Full declaration, e.g. `void Foo::bar`.
    pub definition: String,
    /// Argument string, e.g. `(int x) const`.
    pub args_string: String,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// `static` member.
    pub is_static: bool,
    /// `const` member.
    pub is_const: bool,
    /// `virtual` or `pure-virtual`, when not `non-virtual`.
    pub virtuality: Option<String>,
    /// The member this one overrides.
    pub reimplements: Option<Reimplements>,
    /// Members overriding this one.
    pub reimplemented_by: Vec<Reimplements>,
}

/// One value of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    /// Folded identifier.
    pub id: String,
    /// Value name.
    pub name: String,
    /// Initializer text, e.g. `= 3`.
    pub initializer: String,
    /// Declared protection.
    pub protection: Protection,
    /// Value descriptions.
    #[serde(flatten)]
    pub descriptions: Descriptions,
}

/// An enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enum {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// Underlying type, if declared.
    #[serde(rename = "type")]
    pub type_: DocString,
    /// `enum class`.
    pub strong: bool,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
}

/// A data member or variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_: DocString,
    /// Full declaration.
    pub definition: String,
    /// Trailing declarator text such as array bounds.
    pub args_string: String,
    /// Initializer text.
    pub initializer: String,
    /// `static` member.
    pub is_static: bool,
}

/// A preprocessor macro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Define {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// Macro parameter names.
    pub params: Vec<String>,
    /// Replacement text.
    pub initializer: String,
}

/// A type alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Typedef {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// The aliased type.
    #[serde(rename = "type")]
    pub type_: DocString,
    /// Full declaration.
    pub definition: String,
    /// Trailing declarator text, e.g. a function pointer's arguments.
    pub args_string: String,
}

/// A friend declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Friend {
    /// Common member fields.
    #[serde(flatten)]
    pub info: MemberInfo,
    /// Declared type (`class`, `struct`, a return type, ...).
    #[serde(rename = "type")]
    pub type_: DocString,
    /// Full declaration.
    pub definition: String,
}
