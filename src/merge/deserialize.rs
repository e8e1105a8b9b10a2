//! Merging value maps back into live object trees.

use super::factory::ObjectFactory;
use crate::reflect::{DynamicObject, Reflect, BASE_TYPE_TAG, INSTANCE_NAME_KEY};
use crate::value::{Map, Value};
use tracing::{debug, trace};

/// Merges `data` into `node` and its descendants.
///
/// Each entry is dispatched on the shape of its value:
///
/// - A map is a child keyed by type-tag. With an instance name it merges
///   into the child with that tag and name, without one into the first
///   child with that tag. Otherwise a new child is created through the
///   factory. If the tag belongs to none of `node`'s children and cannot be
///   created either, the map is written as a structured property instead.
/// - A list holds several children sharing a tag, a list-valued property,
///   or both. Map elements consume existing children: named matches first,
///   then unnamed children in order, then new ones from the factory.
/// - Anything else is a property write.
///
/// Merging only adds and overwrites. Children and properties absent from
/// `data` are left alone, and data that cannot be placed is dropped.
pub fn deserialize(node: &mut dyn Reflect, data: &Map, factory: &ObjectFactory) {
    for (key, value) in data {
        match value {
            Value::Map(child_data) => merge_child(node, key, child_data, factory),
            Value::List(items) => merge_list(node, key, items, factory),
            scalar => assign(node, key, scalar),
        }
    }
}

/// Merges the maps of `data` into `objects` by position.
///
/// Objects missing at the end are created with `creator_key` or, failing
/// that, with the tag of the first existing object, and appended. Merging
/// stops at the first map for which no object can be created. Non-map
/// elements are skipped.
pub fn deserialize_all(
    objects: &mut Vec<Box<dyn Reflect>>,
    data: &[Value],
    factory: &ObjectFactory,
    creator_key: Option<&str>,
) {
    let fallback_tag = objects.first().map(|o| o.type_tag().to_string());
    let mut index = 0;
    for item in data {
        let Value::Map(item_data) = item else {
            continue;
        };
        if index >= objects.len() {
            let created = creator_key
                .and_then(|key| factory.create(key))
                .or_else(|| fallback_tag.as_deref().and_then(|tag| factory.create(tag)));
            let Some(object) = created else {
                debug!(index, "cannot create object for list entry, stopping");
                return;
            };
            objects.push(object);
        }
        deserialize(&mut *objects[index], item_data, factory);
        index += 1;
    }
}

fn merge_child(node: &mut dyn Reflect, key: &str, data: &Map, factory: &ObjectFactory) {
    let existing = match instance_name_of(data) {
        Some(name) => node
            .children()
            .iter()
            .position(|c| c.type_tag() == key && c.instance_name() == name),
        None => node.children().iter().position(|c| c.type_tag() == key),
    };
    if let Some(index) = existing {
        trace!(tag = key, index, "merging into existing child");
        deserialize(&mut *node.children_mut()[index], data, factory);
        return;
    }
    if let Some(child) = instantiate(key, factory) {
        adopt(node, child, data, factory);
        return;
    }
    if node.children().iter().any(|c| c.type_tag() == key) {
        debug!(tag = key, "no matching child and no creator, dropping entry");
        return;
    }
    trace!(property = key, "writing map-shaped property");
    node.set_property(key, &Value::Map(data.clone()));
}

fn merge_list(node: &mut dyn Reflect, key: &str, items: &[Value], factory: &ObjectFactory) {
    if !items.iter().any(Value::is_map) {
        trace!(property = key, "writing list-valued property");
        node.set_property(key, &Value::List(items.to_vec()));
        return;
    }

    let mut named = Vec::new();
    let mut unnamed = Vec::new();
    for (index, child) in node.children().iter().enumerate() {
        if child.type_tag() != key {
            continue;
        }
        if child.instance_name().is_empty() {
            unnamed.push(index);
        } else {
            named.push(index);
        }
    }
    let mut unnamed = unnamed.into_iter();

    for item in items {
        let Value::Map(data) = item else {
            assign(node, key, item);
            continue;
        };
        let by_name = instance_name_of(data).and_then(|name| {
            let pos = named
                .iter()
                .position(|&i| node.children()[i].instance_name() == name)?;
            Some(named.remove(pos))
        });
        match by_name.or_else(|| unnamed.next()) {
            Some(index) => {
                trace!(tag = key, index, "merging list entry into existing child");
                deserialize(&mut *node.children_mut()[index], data, factory);
            }
            None => match instantiate(key, factory) {
                Some(child) => adopt(node, child, data, factory),
                None => debug!(tag = key, "no matching child and no creator, dropping list entry"),
            },
        }
    }
}

fn assign(node: &mut dyn Reflect, key: &str, value: &Value) {
    if key == INSTANCE_NAME_KEY {
        if let Some(name) = value.to_text() {
            node.set_instance_name(name);
        }
        return;
    }
    if !node.set_property(key, value) {
        trace!(tag = node.type_tag(), property = key, "property write ignored");
    }
}

fn adopt(node: &mut dyn Reflect, child: Box<dyn Reflect>, data: &Map, factory: &ObjectFactory) {
    debug!(parent = node.type_tag(), tag = child.type_tag(), "created child");
    let child = node.add_child(child);
    deserialize(child, data, factory);
}

fn instantiate(tag: &str, factory: &ObjectFactory) -> Option<Box<dyn Reflect>> {
    if tag == BASE_TYPE_TAG {
        return Some(Box::new(DynamicObject::new()));
    }
    factory.create(tag)
}

/// The non-empty instance name carried by `data`, if any.
fn instance_name_of(data: &Map) -> Option<String> {
    data.get(INSTANCE_NAME_KEY)
        .and_then(Value::to_text)
        .filter(|name| !name.is_empty())
}
