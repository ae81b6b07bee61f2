//! The canonical documentation model.
//!
//! These types are independent of the XML they are decoded from: kinds are
//! closed enums, identifiers are folded, and sections carry typed member
//! lists. A [`Corpus`] ties a set of compounds together.

mod compound;
pub use compound::{
    BodyRange, Compound, CompoundRef, Descriptions, Include, InnerRef, InnerRefs, Location,
    Section,
};

mod config;
pub use config::Config;

/// Resolution of a complete compound set into a linked corpus.
pub mod corpus;
pub use corpus::{Conflict, Corpus};

/// Documentation text trees.
pub mod docstring;
pub use docstring::{
    DocElement, DocImage, DocRef, DocSection, DocString, Listing, ParameterItem, ParameterList,
    SectionLevel, Table, TableCell, XRefSect,
};

mod identifier;
pub use identifier::{fold_id, Reimplements, ReimplementsError};

mod kind;
pub use kind::{
    CompoundKind, KindCategory, MemberKind, Protection, SectionKind, UnknownKindError,
};

mod member;
pub use member::{Define, Enum, EnumValue, Friend, Function, MemberInfo, Param, Typedef, Variable};

/// The corpus-wide reference table.
pub mod reference;
pub use reference::{RefCollision, RefEntry, RefKind, ReferenceTable, NO_OWNER};
