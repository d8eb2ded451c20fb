//! Minimal XML element tree.
//!
//! Built by the encoder and serialized in one pass through
//! `quick_xml::Writer`; produced by the decoder from `quick_xml::Reader`
//! events. The reader never processes DTDs or resolves external or
//! custom entities, and a DOCTYPE that reaches it is rejected.

use crate::core::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Deepest element nesting accepted by [`Document::parse`].
pub const MAX_DEPTH: usize = 256;

/// Child of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, already unescaped
    Text(String),
    /// Raw content of a CDATA section
    CData(String),
}

/// An XML element with attributes and ordered children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Qualified tag name
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a text child.
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    /// Add a CDATA child.
    pub fn with_cdata(mut self, text: &str) -> Self {
        self.children.push(Node::CData(text.to_string()));
        self
    }

    /// Add a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First descendant named `name`, depth-first, excluding `self`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every element named `name` in document order, `self` included.
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(name, &mut found);
        found
    }

    fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        if self.name == name {
            found.push(self);
        }
        for child in self.elements() {
            child.collect(name, found);
        }
    }

    /// Concatenated text and CDATA of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.append_text(&mut out, &|s| s.to_string());
        out
    }

    /// Like [`text_content`](Self::text_content), but CDATA content is
    /// passed through `cdata` first.
    pub fn text_content_with(&self, cdata: &dyn Fn(&str) -> String) -> String {
        let mut out = String::new();
        self.append_text(&mut out, cdata);
        out
    }

    fn append_text(&self, out: &mut String, cdata: &dyn Fn(&str) -> String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::CData(text) => out.push_str(&cdata(text)),
                Node::Element(el) => el.append_text(out, cdata),
            }
        }
    }
}

/// A document: declaration encoding plus a single root element.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Encoding label written to the declaration
    pub encoding: String,
    /// Root element
    pub root: Element,
}

impl Document {
    /// Create a document.
    pub fn new(encoding: &str, root: Element) -> Self {
        Self {
            encoding: encoding.to_string(),
            root,
        }
    }

    /// Serialize, indented by two spaces when `pretty`, else on one line.
    pub fn to_xml(&self, pretty: bool) -> Result<String> {
        let mut writer = if pretty {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some(&self.encoding), None)))
            .map_err(write_error)?;
        write_element(&mut writer, &self.root)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Serialization(format!("writer produced invalid UTF-8: {}", e)))
    }

    /// Parse `text` into a document.
    ///
    /// Fails on mismatched or unclosed tags, a missing or repeated root,
    /// content outside the root, unknown entity references, any DOCTYPE,
    /// and nesting deeper than [`MAX_DEPTH`].
    pub fn parse(text: &str) -> Result<Document> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().check_end_names = true;

        let mut encoding = String::from("UTF-8");
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed("more than one root element"));
                    }
                    if stack.len() >= MAX_DEPTH {
                        return Err(malformed(&format!(
                            "elements nested deeper than {}",
                            MAX_DEPTH
                        )));
                    }
                    stack.push(element_from(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without an open element"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed("text outside the root element")),
                    }
                }
                Event::CData(data) => {
                    let content = std::str::from_utf8(&data)
                        .map_err(|e| malformed(&format!("CDATA is not valid UTF-8: {}", e)))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(content.to_string())),
                        None => return Err(malformed("CDATA outside the root element")),
                    }
                }
                Event::Decl(decl) => {
                    if let Some(Ok(label)) = decl.encoding() {
                        encoding = String::from_utf8_lossy(&label).into_owned();
                    }
                }
                Event::DocType(_) => {
                    return Err(Error::ForbiddenContent(
                        "document type declaration reached the parser".to_string(),
                    ));
                }
                Event::Comment(_) | Event::PI(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed(&format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or_else(|| malformed("no root element"))?;
        Ok(Document { encoding, root })
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(writer, el)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?,
            Node::CData(text) => {
                if text.contains("]]>") {
                    return Err(Error::Serialization(
                        "CDATA content may not contain ]]>".to_string(),
                    ));
                }
                writer
                    .write_event(Event::CData(BytesCData::new(text.as_str())))
                    .map_err(write_error)?
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| malformed(&format!("tag name is not valid UTF-8: {}", e)))?
        .to_string();

    let mut element = Element::new(&name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(&e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("more than one root element")),
    }
    Ok(())
}

fn malformed(reason: &str) -> Error {
    Error::MalformedDocument(reason.to_string())
}

fn write_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Serialization(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("passwords").with_child(
            Element::new("password")
                .with_attribute("id", "1")
                .with_child(Element::new("value").with_cdata("a&amp;b")),
        )
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let xml = Document::new("UTF-8", sample()).to_xml(false).unwrap();
        assert!(!xml.contains('\n'));
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><passwords><password id=\"1\"><value><![CDATA[a&amp;b]]></value></password></passwords>"
        );
    }

    #[test]
    fn test_pretty_output_indents() {
        let xml = Document::new("UTF-8", sample()).to_xml(true).unwrap();
        assert!(xml.contains("\n  <password id=\"1\">"));
        assert!(xml.contains("\n    <value><![CDATA[a&amp;b]]></value>"));
        assert!(xml.ends_with("</passwords>"));
    }

    #[test]
    fn test_text_is_escaped_on_write() {
        let root = Element::new("r").with_text("<&>");
        let xml = Document::new("UTF-8", root).to_xml(false).unwrap();
        assert!(xml.contains("<r>&lt;&amp;&gt;</r>"));
    }

    #[test]
    fn test_cdata_terminator_rejected() {
        let root = Element::new("r").with_cdata("x]]>y");
        assert!(matches!(
            Document::new("UTF-8", root).to_xml(false),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_parse_tree() {
        let doc = Document::parse(
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<root><a id=\"x&amp;y\">t&lt;1</a><b><![CDATA[<raw>]]></b><c/></root>",
        )
        .unwrap();

        assert_eq!(doc.encoding, "ISO-8859-1");
        assert_eq!(doc.root.name, "root");
        let a = doc.root.find("a").unwrap();
        assert_eq!(a.attribute("id"), Some("x&y"));
        assert_eq!(a.text_content(), "t<1");
        assert_eq!(doc.root.find("b").unwrap().text_content(), "<raw>");
        assert!(doc.root.find("c").is_some());
    }

    #[test]
    fn test_parse_depth_limit() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        let doc = Document::parse(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(doc.root.find_all("a").len(), MAX_DEPTH);

        assert!(matches!(
            Document::parse(&nested(MAX_DEPTH + 1)),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_find_all_includes_nested_and_self() {
        let doc = Document::parse("<p><p><x><p/></x></p></p>").unwrap();
        assert_eq!(doc.root.find_all("p").len(), 3);
        assert!(doc.root.find("missing").is_none());
    }

    #[test]
    fn test_text_content_with_transforms_cdata_only() {
        let el = Element::new("v").with_text("a").with_cdata("b");
        assert_eq!(el.text_content_with(&|s| s.to_uppercase()), "aB");
    }

    #[test]
    fn test_parse_rejects_structural_errors() {
        for bad in [
            "<a><b></a>",
            "<a>",
            "",
            "<a/><b/>",
            "text<a/>",
            "<a>&custom;</a>",
        ] {
            assert!(
                matches!(Document::parse(bad), Err(Error::MalformedDocument(_))),
                "expected malformed for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_doctype() {
        let result = Document::parse("<!DOCTYPE a><a/>");
        assert!(matches!(result, Err(Error::ForbiddenContent(_))));
    }
}
