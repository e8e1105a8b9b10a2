//! Minimal XML element tree read and written with quick-xml.

use super::error::{FormatError, Result};
use super::MAX_NESTING;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// Deepest element nesting `parse` accepts. Text-only leaf elements sit one
/// level below the deepest map.
const MAX_ELEMENT_DEPTH: usize = MAX_NESTING + 1;

/// XmlElement is an element with ordered attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// XmlNode is a child of an element: another element or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        XmlElement {
            tag: tag.into(),
            ..XmlElement::default()
        }
    }

    /// Sets an attribute, replacing the value of an existing one.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn append_element(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// The text of an element whose only child is a single text node.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [XmlNode::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Parses a document and returns its root element.
    ///
    /// Whitespace-only text is dropped; comments, processing instructions
    /// and the declaration are ignored. Documents nesting elements deeper
    /// than [`MAX_NESTING`] + 1 levels are rejected.
    pub fn parse(text: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    check_depth(stack.len() + 1)?;
                    stack.push(element_from(&start)?);
                }
                Event::Empty(start) => {
                    check_depth(stack.len() + 1)?;
                    let element = element_from(&start)?;
                    close(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| FormatError::malformed("closing tag without element"))?;
                    close(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut stack, &text);
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_text(&mut stack, &text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(FormatError::malformed(format!("unclosed element <{}>", open.tag)));
        }
        root.ok_or_else(|| FormatError::malformed("document has no root element"))
    }

    /// Writes the element as an indented document with an XML declaration.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| FormatError::malformed(format!("output is not UTF-8: {}", e)))
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_ELEMENT_DEPTH {
        return Err(FormatError::malformed("nesting too deep"));
    }
    Ok(())
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((name, value));
    }
    Ok(element)
}

fn close(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.append_element(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(FormatError::malformed(format!(
            "second root element <{}>",
            element.tag
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.append_text(text);
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.tag.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elements_attributes_and_text() {
        let doc = r#"<?xml version="1.0"?>
            <Jane kind="person">
                <heightInCm>170</heightInCm>
                <!-- comment -->
                <Pet><species>dog &amp; cat</species></Pet>
                <empty/>
            </Jane>"#;
        let root = XmlElement::parse(doc).unwrap();

        assert_eq!(root.tag, "Jane");
        assert_eq!(root.attribute("kind"), Some("person"));
        let children: Vec<_> = root.elements().collect();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text(), Some("170"));
        assert_eq!(children[1].text(), None);
        let species = children[1].elements().next().unwrap();
        assert_eq!(species.text(), Some("dog & cat"));
        assert!(children[2].children.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        assert!(XmlElement::parse("").is_err());
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a>").is_err());
        assert!(XmlElement::parse("<a/><b/>").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nest = |depth: usize| "<a>".repeat(depth) + &"</a>".repeat(depth);
        assert!(XmlElement::parse(&nest(MAX_ELEMENT_DEPTH)).is_ok());

        let err = XmlElement::parse(&nest(MAX_ELEMENT_DEPTH + 1)).unwrap_err();
        assert!(matches!(err, FormatError::Malformed { .. }));
        let empty_leaf = "<a>".repeat(MAX_ELEMENT_DEPTH) + "<b/>" + &"</a>".repeat(MAX_ELEMENT_DEPTH);
        assert!(XmlElement::parse(&empty_leaf).is_err());
        assert!(XmlElement::parse(&nest(50_000)).is_err());
    }

    #[test]
    fn test_write_then_parse() {
        let mut root = XmlElement::new("Jane");
        root.set_attribute("height", "170");
        root.set_attribute("height", "171");
        let mut name = XmlElement::new("nickName");
        name.append_text("J <3");
        root.append_element(name);
        root.append_element(XmlElement::new("Pet"));

        let text = root.to_xml_string().unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("height=\"171\""));
        assert!(text.contains("<nickName>J &lt;3</nickName>"));

        assert_eq!(XmlElement::parse(&text).unwrap(), root);
    }
}
