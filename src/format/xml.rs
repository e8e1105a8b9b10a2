//! XML documents.
//!
//! Maps become child elements named by their key. Scalars become either
//! attributes or text-only child elements, depending on [`XmlOptions`].
//! Reading treats attributes and text-only elements as scalars and every
//! other element as a nested map.

use super::dom::XmlElement;
use super::error::Result;
use super::{check_nesting, read_text, report, write_text};
use crate::merge::{deserialize, serialize, ObjectFactory};
use crate::reflect::Reflect;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// XmlOptions controls how scalar values are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XmlOptions {
    /// Keys written as attributes instead of child elements.
    pub attribute_keys: Vec<String>,
    /// Write every scalar as an attribute.
    pub all_properties_as_attributes: bool,
    /// Leave out scalars whose text is empty.
    pub skip_empty: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        XmlOptions {
            attribute_keys: Vec::new(),
            all_properties_as_attributes: false,
            skip_empty: true,
        }
    }
}

impl XmlOptions {
    pub fn new() -> Self {
        XmlOptions::default()
    }

    pub fn attribute(mut self, key: impl Into<String>) -> Self {
        self.attribute_keys.push(key.into());
        self
    }

    pub fn all_properties_as_attributes(mut self, all: bool) -> Self {
        self.all_properties_as_attributes = all;
        self
    }

    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    fn is_attribute(&self, key: &str) -> bool {
        self.all_properties_as_attributes || self.attribute_keys.iter().any(|k| k == key)
    }
}

/// Builds the element `root_tag` holding `data`.
pub fn to_xml(root_tag: &str, data: &Map, options: &XmlOptions) -> XmlElement {
    let mut element = XmlElement::new(root_tag);
    for (key, value) in data {
        match value {
            Value::Map(child) => element.append_element(to_xml(key, child, options)),
            Value::List(items) => {
                for item in items {
                    match item {
                        Value::Map(child) => element.append_element(to_xml(key, child, options)),
                        other => append_scalar(&mut element, key, other, options),
                    }
                }
            }
            other => append_scalar(&mut element, key, other, options),
        }
    }
    element
}

fn append_scalar(element: &mut XmlElement, key: &str, value: &Value, options: &XmlOptions) {
    let Some(text) = value.to_text() else {
        return;
    };
    if text.is_empty() && options.skip_empty {
        return;
    }
    if options.is_attribute(key) {
        element.set_attribute(key, text);
    } else {
        let mut child = XmlElement::new(key);
        child.append_text(text);
        element.append_element(child);
    }
}

/// Reads the map held by `element`.
///
/// Attributes become string entries. A child element whose only content is
/// one text node becomes a string entry, any other child element a nested
/// map. Repeated child tags collect into lists.
pub fn from_xml(element: &XmlElement) -> Map {
    let mut data = Map::new();
    for (name, value) in &element.attributes {
        data.set(name.clone(), value.clone());
    }
    for child in element.elements() {
        match child.text() {
            Some(text) => data.add_mapped(child.tag.clone(), text),
            None => data.add_mapped(child.tag.clone(), from_xml(child)),
        }
    }
    data
}

pub fn to_xml_string(root_tag: &str, data: &Map, options: &XmlOptions) -> Result<String> {
    check_nesting(data)?;
    to_xml(root_tag, data, options).to_xml_string()
}

/// Parses a document and reads the map held by its root element.
pub fn from_xml_str(text: &str) -> Result<Map> {
    Ok(from_xml(&XmlElement::parse(text)?))
}

pub fn write_xml_file(
    root_tag: &str,
    data: &Map,
    path: impl AsRef<Path>,
    options: &XmlOptions,
) -> Result<()> {
    let text = to_xml_string(root_tag, data, options)?;
    write_text(path.as_ref(), &text)
}

/// Reads the root element of the document at `path`.
pub fn read_xml_file(path: impl AsRef<Path>) -> Result<XmlElement> {
    let text = read_text(path.as_ref())?;
    XmlElement::parse(&text)
}

/// The root element tag for `node`: its instance name, or its type-tag
/// when it has none.
pub fn root_tag(node: &dyn Reflect) -> &str {
    if node.instance_name().is_empty() {
        node.type_tag()
    } else {
        node.instance_name()
    }
}

/// Serializes `node` and writes it to `path` as XML.
pub fn save_xml(node: &dyn Reflect, path: impl AsRef<Path>, options: &XmlOptions) -> bool {
    let path = path.as_ref();
    let data = serialize(node, None, true);
    report(
        "save XML",
        path,
        write_xml_file(root_tag(node), &data, path, options),
    )
    .is_some()
}

/// Reads the XML file at `path` and merges it into `node`.
pub fn load_xml(node: &mut dyn Reflect, path: impl AsRef<Path>, factory: &ObjectFactory) -> bool {
    let path = path.as_ref();
    match report("load XML", path, read_xml_file(path)) {
        Some(root) => {
            deserialize(node, &from_xml(&root), factory);
            true
        }
        None => false,
    }
}

/// Builds a new tree from the XML file at `path`.
///
/// The root node is created by the factory entry for the root element's
/// tag. Returns `None` if the file cannot be read or the tag has no entry.
pub fn load_xml_new(path: impl AsRef<Path>, factory: &ObjectFactory) -> Option<Box<dyn Reflect>> {
    let path = path.as_ref();
    let root = report("load XML", path, read_xml_file(path))?;
    let Some(mut node) = factory.create(&root.tag) else {
        debug!(tag = %root.tag, "no creator for root element");
        return None;
    };
    deserialize(&mut *node, &from_xml(&root), factory);
    Some(node)
}
