//! Free-form documentation text as an ordered tree of typed nodes.
//!
//! A [`DocString`] owns its elements and every element owns its nested
//! content, so the tree is finite and acyclic. The set of node kinds is
//! closed: code that walks a tree matches [`DocElement`] exhaustively and
//! the compiler points at every walk when a kind is added.

use serde::Serialize;

use crate::domain::identifier::fold_id;

/// An ordered sequence of documentation elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DocString(Vec<DocElement>);

impl DocString {
    /// Creates an empty docstring.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of top-level elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the top-level elements in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, DocElement> {
        self.0.iter()
    }

    /// The top-level elements as a slice.
    #[must_use]
    pub fn elements(&self) -> &[DocElement] {
        &self.0
    }

    /// Appends an element.
    pub fn push(&mut self, element: DocElement) {
        self.0.push(element);
    }

    /// Appends character data, merging it into a trailing text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(DocElement::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(DocElement::Text(text.to_string()));
        }
    }

    /// Visits every element of the tree in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DocElement)) {
        for element in &self.0 {
            visit(element);
            for child in element.children() {
                child.walk(visit);
            }
        }
    }

    /// Concatenates all text in the tree, ignoring markup.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.walk(&mut |element| match element {
            DocElement::Text(t) => text.push_str(t),
            DocElement::LineBreak => text.push('\n'),
            _ => {}
        });
        text
    }

    /// Lowercases every identifier carried by the tree (ref targets, anchors,
    /// section and xrefsect ids).
    pub fn fold_ids(&mut self) {
        for element in &mut self.0 {
            match element {
                DocElement::Ref(r) => r.ref_id = fold_id(&r.ref_id),
                DocElement::Anchor { id } => *id = fold_id(id),
                DocElement::Section(s) => {
                    if let Some(id) = &mut s.id {
                        *id = fold_id(id);
                    }
                }
                DocElement::XRefSect(x) => x.id = fold_id(&x.id),
                _ => {}
            }
            for child in element.children_mut() {
                child.fold_ids();
            }
        }
    }
}

impl From<Vec<DocElement>> for DocString {
    fn from(elements: Vec<DocElement>) -> Self {
        Self(elements)
    }
}

impl<'a> IntoIterator for &'a DocString {
    type Item = &'a DocElement;
    type IntoIter = std::slice::Iter<'a, DocElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One node of a [`DocString`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DocElement {
    /// Character data.
    Text(String),
    /// `<para>`
    Paragraph(DocString),
    /// `<title>`
    Title(DocString),
    /// `<heading level="n">`
    Heading {
        /// Heading level, 1 being the outermost.
        level: u8,
        /// Heading text.
        content: DocString,
    },
    /// `<sect1>` .. `<sect4>` and `<simplesect>`
    Section(DocSection),
    /// `<ref refid=".." kindref="..">`
    Ref(DocRef),
    /// `<anchor id="..">`
    Anchor {
        /// Anchor identifier.
        id: String,
    },
    /// `<image type=".." name="..">`
    Image(DocImage),
    /// `<parameterlist kind="..">`
    ParameterList(ParameterList),
    /// `<itemizedlist>`; one docstring per list item.
    ItemizedList(Vec<DocString>),
    /// `<orderedlist>`; one docstring per list item.
    OrderedList(Vec<DocString>),
    /// `<variablelist>`; one docstring per entry or item.
    VariableList(Vec<DocString>),
    /// `<xrefsect id="..">`
    XRefSect(XRefSect),
    /// `<table>`
    Table(Table),
    /// `<bold>`
    Bold(DocString),
    /// `<emphasis>`
    Emphasis(DocString),
    /// `<verbatim>`
    Verbatim(DocString),
    /// `<preformatted>`
    Preformatted(DocString),
    /// `<term>`
    Term(DocString),
    /// `<computeroutput>`
    ComputerOutput(DocString),
    /// `<programlisting>`: highlighted source code.
    Highlight(Listing),
    /// `<linebreak/>`
    LineBreak,
}

impl DocElement {
    /// The docstrings nested directly inside this element.
    #[must_use]
    pub fn children(&self) -> Vec<&DocString> {
        match self {
            Self::Text(_) | Self::Anchor { .. } | Self::Image(_) | Self::LineBreak => Vec::new(),
            Self::Paragraph(content)
            | Self::Title(content)
            | Self::Heading { content, .. }
            | Self::Bold(content)
            | Self::Emphasis(content)
            | Self::Verbatim(content)
            | Self::Preformatted(content)
            | Self::Term(content)
            | Self::ComputerOutput(content) => vec![content],
            Self::Section(s) => vec![&s.content],
            Self::Ref(r) => vec![&r.content],
            Self::Highlight(l) => vec![&l.content],
            Self::XRefSect(x) => vec![&x.description],
            Self::ParameterList(p) => p.items.iter().map(|item| &item.description).collect(),
            Self::ItemizedList(items) | Self::OrderedList(items) | Self::VariableList(items) => {
                items.iter().collect()
            }
            Self::Table(t) => t
                .caption
                .iter()
                .chain(t.rows.iter().flatten().map(|cell| &cell.content))
                .collect(),
        }
    }

    fn children_mut(&mut self) -> Vec<&mut DocString> {
        match self {
            Self::Text(_) | Self::Anchor { .. } | Self::Image(_) | Self::LineBreak => Vec::new(),
            Self::Paragraph(content)
            | Self::Title(content)
            | Self::Heading { content, .. }
            | Self::Bold(content)
            | Self::Emphasis(content)
            | Self::Verbatim(content)
            | Self::Preformatted(content)
            | Self::Term(content)
            | Self::ComputerOutput(content) => vec![content],
            Self::Section(s) => vec![&mut s.content],
            Self::Ref(r) => vec![&mut r.content],
            Self::Highlight(l) => vec![&mut l.content],
            Self::XRefSect(x) => vec![&mut x.description],
            Self::ParameterList(p) => p
                .items
                .iter_mut()
                .map(|item| &mut item.description)
                .collect(),
            Self::ItemizedList(items) | Self::OrderedList(items) | Self::VariableList(items) => {
                items.iter_mut().collect()
            }
            Self::Table(t) => t
                .caption
                .iter_mut()
                .chain(t.rows.iter_mut().flatten().map(|cell| &mut cell.content))
                .collect(),
        }
    }
}

/// The nesting level of a [`DocSection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLevel {
    /// `<sect1>`
    Sect1,
    /// `<sect2>`
    Sect2,
    /// `<sect3>`
    Sect3,
    /// `<sect4>`
    Sect4,
    /// `<simplesect>` (return values, notes, "see also", ...)
    Simple,
}

impl SectionLevel {
    /// The element name this level was decoded from.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Sect1 => "sect1",
            Self::Sect2 => "sect2",
            Self::Sect3 => "sect3",
            Self::Sect4 => "sect4",
            Self::Simple => "simplesect",
        }
    }
}

/// A section inside documentation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocSection {
    /// Which element the section came from.
    pub level: SectionLevel,
    /// Optional identifier; addressable through the reference table.
    pub id: Option<String>,
    /// The `kind` attribute (`"return"`, `"note"`, ...), if any.
    pub kind: Option<String>,
    /// Section body, including its `<title>` if present.
    pub content: DocString,
}

impl DocSection {
    /// The plain text of the section's first title element.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.content.iter().find_map(|element| match element {
            DocElement::Title(title) => Some(title.plain_text()),
            _ => None,
        })
    }
}

/// A cross reference to another documented entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocRef {
    /// Target identifier.
    pub ref_id: String,
    /// `"compound"` or `"member"`.
    pub kind_ref: String,
    /// Link text.
    pub content: DocString,
}

/// An embedded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocImage {
    /// Output format the image is meant for (`"html"`, `"latex"`, ...).
    pub kind: String,
    /// Image file name.
    pub name: String,
    /// Caption text.
    pub caption: String,
}

/// A list of documented parameters, return values or exceptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterList {
    /// `"param"`, `"retval"`, `"exception"`, `"templateparam"`.
    pub kind: String,
    /// The documented items, in order.
    pub items: Vec<ParameterItem>,
}

/// One entry of a [`ParameterList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterItem {
    /// Parameter name(s); several names documented together are joined
    /// with `", "`.
    pub name: String,
    /// `"in"`, `"out"` or `"inout"`, when given.
    pub direction: Option<String>,
    /// Description of the parameter.
    pub description: DocString,
}

/// A cross-reference section such as a todo or deprecated note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XRefSect {
    /// Identifier of the entry on the generated list page.
    pub id: String,
    /// Section title (`"Todo"`, `"Deprecated"`, ...).
    pub title: String,
    /// Section body.
    pub description: DocString,
}

/// A table; row and column counts are derived from [`Table::rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Row count as declared by the `rows` attribute. A hint only.
    pub declared_rows: usize,
    /// Column count as declared by the `cols` attribute. A hint only.
    pub declared_cols: usize,
    /// Optional caption.
    pub caption: Option<DocString>,
    /// Cells, row by row.
    pub rows: Vec<Vec<TableCell>>,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    /// Whether the cell belongs to the table head.
    pub head: bool,
    /// Cell content.
    pub content: DocString,
}

/// A program listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// The `filename` attribute, e.g. `".cpp"`, if present.
    pub filename: Option<String>,
    /// The code, one line break after every code line.
    pub content: DocString,
}
