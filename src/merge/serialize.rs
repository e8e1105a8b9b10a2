//! Serialization of live object trees into value maps.

use crate::reflect::{PropertyValue, Reflect, INSTANCE_NAME_KEY};
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// SerializeOptions bundles the arguments of [`serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializeOptions {
    /// How many levels of children to include. `None` means unbounded and
    /// `Some(0)` serializes properties only.
    pub max_depth: Option<usize>,
    /// Whether properties that cannot be written back are included.
    pub include_read_only: bool,
    /// Whether the root's instance name is included. Descendants always
    /// carry theirs so they can be matched when merged back.
    pub include_instance_name: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions {
            max_depth: None,
            include_read_only: true,
            include_instance_name: true,
        }
    }
}

impl SerializeOptions {
    pub fn new() -> Self {
        SerializeOptions::default()
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn include_read_only(mut self, include: bool) -> Self {
        self.include_read_only = include;
        self
    }

    pub fn include_instance_name(mut self, include: bool) -> Self {
        self.include_instance_name = include;
        self
    }

    /// Serializes `node` with these options.
    pub fn serialize(&self, node: &dyn Reflect) -> Map {
        serialize_node(
            node,
            self.max_depth,
            self.include_read_only,
            self.include_instance_name,
        )
    }
}

/// Serializes `node` and, down to `max_depth`, its children into a map.
///
/// Properties go under their names, children under their type-tags, and
/// both follow [`Map::add_mapped`]: a tag shared by several children
/// becomes a list of maps while a single child stays a bare map. A
/// non-empty instance name is stored under [`INSTANCE_NAME_KEY`].
///
/// Properties referring to live objects are replaced by the serialized
/// objects, so they read back like children keyed by the property name.
pub fn serialize(node: &dyn Reflect, max_depth: Option<usize>, include_read_only: bool) -> Map {
    serialize_node(node, max_depth, include_read_only, true)
}

fn serialize_node(
    node: &dyn Reflect,
    max_depth: Option<usize>,
    include_read_only: bool,
    include_instance_name: bool,
) -> Map {
    let mut data = Map::new();
    let child_depth = max_depth.map(|depth| depth.saturating_sub(1));

    if include_instance_name && !node.instance_name().is_empty() {
        data.add_mapped(INSTANCE_NAME_KEY, node.instance_name());
    }

    for descriptor in node.properties() {
        if !descriptor.readable || !(include_read_only || descriptor.writable) {
            continue;
        }
        if descriptor.name == INSTANCE_NAME_KEY {
            continue;
        }
        let Some(value) = node.property(&descriptor.name) else {
            trace!(tag = node.type_tag(), property = %descriptor.name, "property has no value");
            continue;
        };
        let value = match value {
            PropertyValue::Value(v) => v,
            PropertyValue::Object(object) => {
                Value::Map(serialize(object, child_depth, include_read_only))
            }
            PropertyValue::Objects(objects) => Value::List(
                objects
                    .into_iter()
                    .map(|object| Value::Map(serialize(object, child_depth, include_read_only)))
                    .collect(),
            ),
        };
        data.add_mapped(descriptor.name, value);
    }

    if max_depth != Some(0) {
        for child in node.children() {
            let child_data = serialize(&**child, child_depth, include_read_only);
            data.add_mapped(child.type_tag(), Value::Map(child_data));
        }
    }

    data
}

/// Serializes each node of `nodes` into a list of maps.
pub fn serialize_all(
    nodes: &[Box<dyn Reflect>],
    max_depth: Option<usize>,
    include_read_only: bool,
) -> Vec<Value> {
    nodes
        .iter()
        .map(|node| Value::Map(serialize(&**node, max_depth, include_read_only)))
        .collect()
}
