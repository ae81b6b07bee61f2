//! The mixed-content decoder.
//!
//! Documentation markup interleaves character data with a fixed vocabulary
//! of nested elements. Each known element becomes one [`DocElement`]; a
//! handful of punctuation elements are replaced by literal text; the code
//! listing wrappers are transparent. Anything else fails the decode, naming
//! the tag, so that a vocabulary change upstream is noticed instead of
//! quietly losing content.

use quick_xml::events::{BytesStart, Event};

use super::{
    attr, bool_attr, element_name, parse_attr, required_attr, unknown_tag, DecodeError,
    XmlReader,
};
use crate::domain::{
    DocElement, DocImage, DocRef, DocSection, DocString, Listing, ParameterItem, ParameterList,
    SectionLevel, Table, TableCell, XRefSect,
};

/// Placeholder text emitted in front of the body of a `<ulink>`.
const LINK_PLACEHOLDER: &str = "<href>";

/// Replacement text for `<hruler/>`.
const HORIZONTAL_RULE: &str = "---------------------------------";

/// Decodes the first element of `xml` as a docstring.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownTag`] for markup outside the known set, and
/// other [`DecodeError`] variants for malformed attributes or XML.
pub fn decode_docstring(xml: &str) -> Result<DocString, DecodeError> {
    let mut reader = XmlReader::new(xml);
    let root = reader.root()?.ok_or_else(|| DecodeError::MissingElement {
        expected: "docstring element",
        context: "input".to_string(),
    })?;
    reader.docstring(&root)
}

impl XmlReader<'_> {
    /// Decodes the content of `start` up to its end tag.
    pub(crate) fn docstring(&mut self, start: &BytesStart<'_>) -> Result<DocString, DecodeError> {
        let mut doc = DocString::new();
        self.decode_into(&mut doc, start)?;
        Ok(doc)
    }

    fn decode_into(&mut self, doc: &mut DocString, parent: &BytesStart<'_>) -> Result<(), DecodeError> {
        loop {
            match self.next()? {
                Event::Start(child) => self.decode_child(doc, parent, &child)?,
                Event::Text(text) => doc.push_text(&text.unescape()?),
                Event::CData(data) => doc.push_text(&String::from_utf8_lossy(&data)),
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(DecodeError::UnexpectedEof(element_name(parent))),
                _ => {}
            }
        }
    }

    fn decode_child(
        &mut self,
        doc: &mut DocString,
        parent: &BytesStart<'_>,
        child: &BytesStart<'_>,
    ) -> Result<(), DecodeError> {
        let element = match child.name().as_ref() {
            b"para" => DocElement::Paragraph(self.docstring(child)?),
            b"title" => DocElement::Title(self.docstring(child)?),
            b"bold" => DocElement::Bold(self.docstring(child)?),
            b"emphasis" => DocElement::Emphasis(self.docstring(child)?),
            b"verbatim" => DocElement::Verbatim(self.docstring(child)?),
            b"preformatted" => DocElement::Preformatted(self.docstring(child)?),
            b"term" => DocElement::Term(self.docstring(child)?),
            b"computeroutput" => DocElement::ComputerOutput(self.docstring(child)?),
            b"heading" => {
                let level = parse_attr(child, "level")?.ok_or_else(|| DecodeError::MissingAttribute {
                    element: element_name(child),
                    attribute: "level",
                })?;
                DocElement::Heading {
                    level,
                    content: self.docstring(child)?,
                }
            }
            b"sect1" => self.doc_section(child, SectionLevel::Sect1)?,
            b"sect2" => self.doc_section(child, SectionLevel::Sect2)?,
            b"sect3" => self.doc_section(child, SectionLevel::Sect3)?,
            b"sect4" => self.doc_section(child, SectionLevel::Sect4)?,
            b"simplesect" => self.doc_section(child, SectionLevel::Simple)?,
            b"ref" => DocElement::Ref(DocRef {
                ref_id: required_attr(child, "refid")?,
                kind_ref: attr(child, "kindref")?.unwrap_or_default(),
                content: self.docstring(child)?,
            }),
            b"anchor" => {
                let id = attr(child, "id")?.unwrap_or_default();
                self.skip(child)?;
                DocElement::Anchor { id }
            }
            b"image" => DocElement::Image(DocImage {
                kind: attr(child, "type")?.unwrap_or_default(),
                name: attr(child, "name")?.unwrap_or_default(),
                caption: self.read_text(child)?,
            }),
            b"parameterlist" => DocElement::ParameterList(self.parameter_list(child)?),
            b"itemizedlist" => DocElement::ItemizedList(self.list_items(child)?),
            b"orderedlist" => DocElement::OrderedList(self.list_items(child)?),
            b"variablelist" => DocElement::VariableList(self.variable_list(child)?),
            b"xrefsect" => DocElement::XRefSect(self.xref_section(child)?),
            b"table" => DocElement::Table(self.table(child)?),
            b"programlisting" => DocElement::Highlight(self.listing(child)?),
            b"linebreak" => {
                self.skip(child)?;
                DocElement::LineBreak
            }
            b"ndash" => return self.substitute(doc, child, "\u{2013}"),
            b"mdash" => return self.substitute(doc, child, "\u{2014}"),
            b"hruler" => return self.substitute(doc, child, HORIZONTAL_RULE),
            b"zwj" => return self.substitute(doc, child, "\u{200D}"),
            b"sp" => return self.substitute(doc, child, " "),
            b"nonbreakablespace" => return self.substitute(doc, child, "\u{00A0}"),
            b"ulink" => {
                doc.push_text(LINK_PLACEHOLDER);
                return self.decode_into(doc, child);
            }
            b"highlight" => return self.decode_into(doc, child),
            b"codeline" => {
                self.decode_into(doc, child)?;
                doc.push(DocElement::LineBreak);
                return Ok(());
            }
            _ => return Err(unknown_tag(child, parent)),
        };
        doc.push(element);
        Ok(())
    }

    fn substitute(
        &mut self,
        doc: &mut DocString,
        start: &BytesStart<'_>,
        text: &str,
    ) -> Result<(), DecodeError> {
        self.skip(start)?;
        doc.push_text(text);
        Ok(())
    }

    fn doc_section(
        &mut self,
        start: &BytesStart<'_>,
        level: SectionLevel,
    ) -> Result<DocElement, DecodeError> {
        Ok(DocElement::Section(DocSection {
            level,
            id: attr(start, "id")?,
            kind: attr(start, "kind")?,
            content: self.docstring(start)?,
        }))
    }

    pub(crate) fn listing(&mut self, start: &BytesStart<'_>) -> Result<Listing, DecodeError> {
        Ok(Listing {
            filename: attr(start, "filename")?,
            content: self.docstring(start)?,
        })
    }

    fn parameter_list(&mut self, start: &BytesStart<'_>) -> Result<ParameterList, DecodeError> {
        let kind = attr(start, "kind")?.unwrap_or_else(|| "param".to_string());
        let mut items = Vec::new();
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"parameteritem" => items.push(self.parameter_item(&child)?),
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        Ok(ParameterList { kind, items })
    }

    fn parameter_item(&mut self, start: &BytesStart<'_>) -> Result<ParameterItem, DecodeError> {
        let mut names = Vec::new();
        let mut direction = None;
        let mut description = DocString::new();

        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"parameternamelist" => {
                    while let Some(name) = self.next_child(&child)? {
                        match name.name().as_ref() {
                            b"parametername" => {
                                if direction.is_none() {
                                    direction = attr(&name, "direction")?;
                                }
                                names.push(self.read_text(&name)?);
                            }
                            b"parametertype" => self.skip(&name)?,
                            _ => return Err(unknown_tag(&name, &child)),
                        }
                    }
                }
                b"parameterdescription" => description = self.docstring(&child)?,
                _ => return Err(unknown_tag(&child, start)),
            }
        }

        Ok(ParameterItem {
            name: names.join(", "),
            direction,
            description,
        })
    }

    fn list_items(&mut self, start: &BytesStart<'_>) -> Result<Vec<DocString>, DecodeError> {
        let mut items = Vec::new();
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"listitem" => items.push(self.docstring(&child)?),
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        Ok(items)
    }

    fn variable_list(&mut self, start: &BytesStart<'_>) -> Result<Vec<DocString>, DecodeError> {
        let mut items = Vec::new();
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"varlistentry" | b"listitem" => items.push(self.docstring(&child)?),
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        Ok(items)
    }

    fn xref_section(&mut self, start: &BytesStart<'_>) -> Result<XRefSect, DecodeError> {
        let mut xref = XRefSect {
            id: attr(start, "id")?.unwrap_or_default(),
            title: String::new(),
            description: DocString::new(),
        };
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"xreftitle" => xref.title = self.read_text(&child)?,
                b"xrefdescription" => xref.description = self.docstring(&child)?,
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        Ok(xref)
    }

    fn table(&mut self, start: &BytesStart<'_>) -> Result<Table, DecodeError> {
        let mut table = Table {
            declared_rows: parse_attr(start, "rows")?.unwrap_or_default(),
            declared_cols: parse_attr(start, "cols")?.unwrap_or_default(),
            caption: None,
            rows: Vec::new(),
        };
        while let Some(child) = self.next_child(start)? {
            match child.name().as_ref() {
                b"caption" => table.caption = Some(self.docstring(&child)?),
                b"row" => {
                    let mut cells = Vec::new();
                    while let Some(entry) = self.next_child(&child)? {
                        match entry.name().as_ref() {
                            b"entry" => cells.push(TableCell {
                                head: bool_attr(&entry, "thead")?.unwrap_or(false),
                                content: self.docstring(&entry)?,
                            }),
                            _ => return Err(unknown_tag(&entry, &child)),
                        }
                    }
                    table.rows.push(cells);
                }
                _ => return Err(unknown_tag(&child, start)),
            }
        }
        if table.rows.len() != table.declared_rows {
            tracing::trace!(
                declared = table.declared_rows,
                actual = table.rows.len(),
                "table row count differs from its declaration"
            );
        }
        Ok(table)
    }
}
