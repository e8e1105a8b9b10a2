//! JSON documents.

use super::error::Result;
use super::{check_nesting, document_map, read_text, report, write_text};
use crate::merge::{deserialize, ObjectFactory, SerializeOptions};
use crate::reflect::Reflect;
use crate::value::{Map, Value};
use std::path::Path;

/// Renders `data` as an indented JSON object.
///
/// Fails for data nested deeper than [`MAX_NESTING`](super::MAX_NESTING).
pub fn to_json_string(data: &Map) -> Result<String> {
    check_nesting(data)?;
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parses a JSON document. A top level other than an object yields an
/// empty map.
pub fn from_json_str(text: &str) -> Result<Map> {
    let value: Value = serde_json::from_str(text)?;
    Ok(document_map(value))
}

pub fn write_json_file(data: &Map, path: impl AsRef<Path>) -> Result<()> {
    let text = to_json_string(data)?;
    write_text(path.as_ref(), &text)
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<Map> {
    let text = read_text(path.as_ref())?;
    from_json_str(&text)
}

/// Serializes `node` and writes it to `path` as JSON.
///
/// Returns false if the file could not be written.
pub fn write_json(
    node: &dyn Reflect,
    path: impl AsRef<Path>,
    max_depth: Option<usize>,
    include_read_only: bool,
) -> bool {
    let options = SerializeOptions::new()
        .max_depth(max_depth)
        .include_read_only(include_read_only);
    write_json_with(node, path, &options)
}

/// Like [`write_json`], with every serialization option.
pub fn write_json_with(
    node: &dyn Reflect,
    path: impl AsRef<Path>,
    options: &SerializeOptions,
) -> bool {
    let path = path.as_ref();
    let data = options.serialize(node);
    report("write JSON", path, write_json_file(&data, path)).is_some()
}

/// Reads the JSON file at `path` and merges it into `node`.
///
/// Returns false if the file could not be read or parsed; `node` is then
/// left untouched.
pub fn read_json(node: &mut dyn Reflect, path: impl AsRef<Path>, factory: &ObjectFactory) -> bool {
    let path = path.as_ref();
    match report("read JSON", path, read_json_file(path)) {
        Some(data) => {
            deserialize(node, &data, factory);
            true
        }
        None => false,
    }
}
