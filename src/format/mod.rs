//! Format module - Reading and writing serialized trees as documents.
//!
//! JSON and YAML documents map one to one onto [`Map`]. XML goes through a
//! small element tree and a policy deciding which scalars become attributes.
//! The `read_*`/`write_*`/`load_*`/`save_*` functions taking a live node
//! report failures as `false` after logging them.
//!
//! [`Map`]: crate::value::Map

mod dom;
mod error;
mod json;
mod xml;
mod yaml;

pub use dom::*;
pub use error::*;
pub use json::*;
pub use xml::*;
pub use yaml::*;

use crate::value::{Map, Value};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Deepest List/Map nesting a document may have.
///
/// Writers refuse deeper data and the XML reader refuses deeper documents,
/// so everything written can be read back. The value stays below the
/// recursion limits of serde_json and serde_yaml.
pub const MAX_NESTING: usize = 100;

/// Format is a document syntax, usually chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    /// Picks the format from the extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// Parses document text into a map.
    ///
    /// XML documents yield the map held by the root element, whose tag is
    /// dropped.
    pub fn parse(self, text: &str) -> Result<Map> {
        match self {
            Format::Json => from_json_str(text),
            Format::Yaml => from_yaml_str(text),
            Format::Xml => from_xml_str(text),
        }
    }

    /// Renders `data` as document text. `root_tag` and `options` only apply
    /// to XML.
    pub fn render(self, data: &Map, root_tag: &str, options: &XmlOptions) -> Result<String> {
        match self {
            Format::Json => to_json_string(data),
            Format::Yaml => to_yaml_string(data),
            Format::Xml => to_xml_string(root_tag, data, options),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
            Format::Xml => write!(f, "xml"),
        }
    }
}

pub(crate) fn document_map(value: Value) -> Map {
    match value {
        Value::Map(map) => map,
        _ => {
            debug!("document top level is not a map, reading it as empty");
            Map::new()
        }
    }
}

pub(crate) fn check_nesting(data: &Map) -> Result<()> {
    let depth = data.depth();
    if depth > MAX_NESTING {
        return Err(FormatError::malformed(format!(
            "nesting depth {} exceeds the limit of {}",
            depth, MAX_NESTING
        )));
    }
    Ok(())
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| FormatError::file(path, e))
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| FormatError::file(path, e))
}

/// Logs a failed file operation and converts the result to an option.
pub(crate) fn report<T>(operation: &str, path: &Path, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to {}", operation);
            None
        }
    }
}
