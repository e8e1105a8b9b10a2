//! YAML documents, shaped like the JSON ones.

use super::error::Result;
use super::{check_nesting, document_map, read_text, report, write_text};
use crate::merge::{deserialize, ObjectFactory, SerializeOptions};
use crate::reflect::Reflect;
use crate::value::{Map, Value};
use std::path::Path;

pub fn to_yaml_string(data: &Map) -> Result<String> {
    check_nesting(data)?;
    Ok(serde_yaml::to_string(data)?)
}

/// Parses a YAML document. A top level other than a mapping yields an
/// empty map.
pub fn from_yaml_str(text: &str) -> Result<Map> {
    let value: Value = serde_yaml::from_str(text)?;
    Ok(document_map(value))
}

pub fn write_yaml_file(data: &Map, path: impl AsRef<Path>) -> Result<()> {
    let text = to_yaml_string(data)?;
    write_text(path.as_ref(), &text)
}

pub fn read_yaml_file(path: impl AsRef<Path>) -> Result<Map> {
    let text = read_text(path.as_ref())?;
    from_yaml_str(&text)
}

/// Serializes `node` and writes it to `path` as YAML.
pub fn write_yaml(
    node: &dyn Reflect,
    path: impl AsRef<Path>,
    max_depth: Option<usize>,
    include_read_only: bool,
) -> bool {
    let options = SerializeOptions::new()
        .max_depth(max_depth)
        .include_read_only(include_read_only);
    write_yaml_with(node, path, &options)
}

/// Like [`write_yaml`], with every serialization option.
pub fn write_yaml_with(
    node: &dyn Reflect,
    path: impl AsRef<Path>,
    options: &SerializeOptions,
) -> bool {
    let path = path.as_ref();
    let data = options.serialize(node);
    report("write YAML", path, write_yaml_file(&data, path)).is_some()
}

/// Reads the YAML file at `path` and merges it into `node`.
pub fn read_yaml(node: &mut dyn Reflect, path: impl AsRef<Path>, factory: &ObjectFactory) -> bool {
    let path = path.as_ref();
    match report("read YAML", path, read_yaml_file(path)) {
        Some(data) => {
            deserialize(node, &data, factory);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::serialize;
    use crate::format::MAX_NESTING;
    use crate::reflect::DynamicObject;
    use crate::testing::{chain, child, family, Person, Pet};
    use tempfile::TempDir;

    #[test]
    fn test_yaml_text_round_trip() {
        let data = serialize(&family(), None, false);
        let text = to_yaml_string(&data).unwrap();
        let parsed = from_yaml_str(&text).unwrap();

        assert_eq!(parsed.get("objectName"), Some(&Value::from("Jane")));
        assert_eq!(parsed.get("heightInCm"), Some(&Value::Int(170)));
        let people = parsed.get("Person").and_then(Value::as_list).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].as_map().and_then(|m| m.get("heightInCm")), Some(&Value::Int(190)));
        assert!(from_yaml_str("- a\n- b\n").unwrap().is_empty());
    }

    #[test]
    fn test_write_and_read_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jane.yaml");
        assert!(write_yaml(&family(), &path, None, true));

        let mut factory = ObjectFactory::new();
        factory.register_kind::<Person>();
        factory.register_kind::<Pet>();

        let mut copy = Person::default();
        assert!(read_yaml(&mut copy, &path, &factory));
        assert_eq!(copy.height_in_cm, 170);
        assert_eq!(child::<Person>(&copy, 0).height_in_cm, 190);
        assert!(!read_yaml(&mut copy, dir.path().join("missing.yaml"), &factory));
    }

    #[test]
    fn test_deep_tree_round_trips_up_to_nesting_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep.yaml");
        let tree = chain(MAX_NESTING);
        assert!(write_yaml(&tree, &path, None, true));

        let mut fresh = DynamicObject::new();
        assert!(read_yaml(&mut fresh, &path, &ObjectFactory::new()));
        assert_eq!(serialize(&fresh, None, true), serialize(&tree, None, true));

        assert!(!write_yaml(&chain(MAX_NESTING + 1), dir.path().join("too_deep.yaml"), None, true));
    }
}
