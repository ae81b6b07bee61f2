use std::{fmt, str::FromStr};

use serde::Serialize;

/// The category of a kind string that failed to map onto the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCategory {
    /// The `kind` attribute of a `compounddef`.
    Compound,
    /// The `kind` attribute of a `sectiondef`.
    Section,
    /// A `prot` attribute, or the protection prefix of a section kind.
    Protection,
    /// The `kind` attribute of a `memberdef`.
    Member,
}

impl fmt::Display for KindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compound => "compound kind",
            Self::Section => "section kind",
            Self::Protection => "protection",
            Self::Member => "member kind",
        })
    }
}

/// A kind, protection or member string that is not in the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {category} '{value}'")]
pub struct UnknownKindError {
    category: KindCategory,
    value: String,
}

impl UnknownKindError {
    /// Creates an error for the given category and offending string.
    #[must_use]
    pub fn new(category: KindCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }

    /// Which kind of string was rejected.
    #[must_use]
    pub const fn category(&self) -> KindCategory {
        self.category
    }

    /// The offending string, exactly as it appeared in the input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The kind of a documented compound.
///
/// Structs and classes are unified into [`CompoundKind::Class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundKind {
    /// A class or struct.
    Class,
    /// A source file.
    File,
    /// A namespace.
    Namespace,
    /// A user-defined group (module).
    Group,
    /// A directory.
    Dir,
    /// A union.
    Union,
    /// A free-standing documentation page.
    Page,
}

impl CompoundKind {
    /// The canonical lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::File => "file",
            Self::Namespace => "namespace",
            Self::Group => "group",
            Self::Dir => "dir",
            Self::Union => "union",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompoundKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" | "struct" => Ok(Self::Class),
            "file" => Ok(Self::File),
            "namespace" => Ok(Self::Namespace),
            "group" => Ok(Self::Group),
            "dir" => Ok(Self::Dir),
            "union" => Ok(Self::Union),
            "page" => Ok(Self::Page),
            other => Err(UnknownKindError::new(KindCategory::Compound, other)),
        }
    }
}

/// Access protection of a compound, section or member.
///
/// The variants are ordered from most to least visible. An empty `prot`
/// attribute maps to [`Protection::Unspecified`], which is not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protection {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// No protection was given.
    #[default]
    Unspecified,
}

impl Protection {
    /// The capitalised word used as a section header prefix, if any.
    #[must_use]
    pub const fn header_word(self) -> Option<&'static str> {
        match self {
            Self::Public => Some("Public"),
            Self::Protected => Some("Protected"),
            Self::Private => Some("Private"),
            Self::Unspecified => None,
        }
    }
}

impl FromStr for Protection {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "protected" => Ok(Self::Protected),
            "private" => Ok(Self::Private),
            "" => Ok(Self::Unspecified),
            other => Err(UnknownKindError::new(KindCategory::Protection, other)),
        }
    }
}

/// The kind of a member grouping within a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Member functions.
    Functions,
    /// Static member functions.
    StaticFunctions,
    /// Data members.
    Attributes,
    /// Static data members.
    StaticAttributes,
    /// Nested types.
    Types,
    /// Friend declarations.
    Friends,
    /// A user-defined member group.
    UserDefined,
    /// Preprocessor macros.
    Defines,
    /// Type aliases.
    Typedefs,
    /// Non-member variables.
    Variables,
    /// Enumerations.
    Enums,
    /// Related non-member functions.
    Related,
}

impl SectionKind {
    /// The header text used when a section carries no explicit header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Functions => "Functions",
            Self::StaticFunctions => "Static Functions",
            Self::Attributes => "Attributes",
            Self::StaticAttributes => "Static Attributes",
            Self::Types => "Types",
            Self::Friends => "Friends",
            Self::UserDefined => "User Defined",
            Self::Defines => "Defines",
            Self::Typedefs => "Typedefs",
            Self::Variables => "Variables",
            Self::Enums => "Enumerations",
            Self::Related => "Related",
        }
    }

    /// Interprets a raw `sectiondef` kind.
    ///
    /// The string is first read as a single token (`"enum"`, `"static-func"`).
    /// Only if that fails is it split on the first `-` into a protection
    /// prefix and a kind suffix (`"public-func"`, `"protected-static-attrib"`).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownKindError`] when neither reading succeeds. A bad
    /// protection prefix is reported as a protection error.
    pub fn parse_composite(raw: &str) -> Result<(Self, Protection), UnknownKindError> {
        if let Ok(kind) = raw.parse() {
            return Ok((kind, Protection::Unspecified));
        }

        match raw.split_once('-') {
            Some((protection, kind)) if !protection.is_empty() => {
                let protection = protection.parse()?;
                let kind = kind
                    .parse()
                    .map_err(|_| UnknownKindError::new(KindCategory::Section, raw))?;
                Ok((kind, protection))
            }
            _ => Err(UnknownKindError::new(KindCategory::Section, raw)),
        }
    }
}

impl FromStr for SectionKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "func" | "function" => Ok(Self::Functions),
            "static-func" => Ok(Self::StaticFunctions),
            "attrib" => Ok(Self::Attributes),
            "static-attrib" => Ok(Self::StaticAttributes),
            "type" => Ok(Self::Types),
            "friend" => Ok(Self::Friends),
            "user-defined" => Ok(Self::UserDefined),
            "define" => Ok(Self::Defines),
            "typedef" => Ok(Self::Typedefs),
            "var" => Ok(Self::Variables),
            "enum" => Ok(Self::Enums),
            "related" => Ok(Self::Related),
            other => Err(UnknownKindError::new(KindCategory::Section, other)),
        }
    }
}

/// The `kind` attribute of a `memberdef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// `function`
    Function,
    /// `enum`
    Enum,
    /// `variable`
    Variable,
    /// `define`
    Define,
    /// `typedef`
    Typedef,
    /// `friend`
    Friend,
}

impl FromStr for MemberKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Self::Function),
            "enum" => Ok(Self::Enum),
            "variable" => Ok(Self::Variable),
            "define" => Ok(Self::Define),
            "typedef" => Ok(Self::Typedef),
            "friend" => Ok(Self::Friend),
            other => Err(UnknownKindError::new(KindCategory::Member, other)),
        }
    }
}
