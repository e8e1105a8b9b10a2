//! Shared object state and the universal base kind.

use super::reflect::{PropertyDescriptor, Reflect, BASE_TYPE_TAG, INSTANCE_NAME_KEY};
use crate::value::{Map, Value};

/// ObjectBase holds the state every live object carries.
///
/// An object exclusively owns its children. Dynamic properties form an open
/// set: any name can be written and is enumerated after being written.
#[derive(Debug, Default)]
pub struct ObjectBase {
    name: String,
    dynamic: Map,
    children: Vec<Box<dyn Reflect>>,
}

impl ObjectBase {
    pub fn new() -> Self {
        ObjectBase::default()
    }

    /// Creates a base carrying the given instance name.
    pub fn named(name: impl Into<String>) -> Self {
        ObjectBase {
            name: name.into(),
            ..ObjectBase::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn children(&self) -> &[Box<dyn Reflect>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Box<dyn Reflect>] {
        &mut self.children
    }

    /// Appends `child` and returns it.
    pub fn adopt(&mut self, child: Box<dyn Reflect>) -> &mut dyn Reflect {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut *self.children[last]
    }

    /// Descriptors for the dynamic properties, in key order.
    pub fn dynamic_descriptors(&self) -> Vec<PropertyDescriptor> {
        self.dynamic
            .iter()
            .map(|(name, _)| PropertyDescriptor::read_write(name.clone()))
            .collect()
    }

    pub fn dynamic_property(&self, name: &str) -> Option<&Value> {
        self.dynamic.get(name)
    }

    pub fn set_dynamic_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.dynamic.set(name, value);
    }

    /// Open-set property write.
    ///
    /// The instance-name key renames the object, anything else becomes a
    /// dynamic property. Always accepted except for a name without text.
    pub fn write(&mut self, name: &str, value: &Value) -> bool {
        if name == INSTANCE_NAME_KEY {
            return match value.to_text() {
                Some(text) => {
                    self.name = text;
                    true
                }
                None => false,
            };
        }
        self.dynamic.set(name, value.clone());
        true
    }
}

/// DynamicObject is the universal base kind.
///
/// It declares no properties of its own and accepts any property write, so
/// it can hold arbitrary serialized data. Its type-tag defaults to
/// [`BASE_TYPE_TAG`] but can be set to stand in for any other kind.
#[derive(Debug)]
pub struct DynamicObject {
    tag: String,
    base: ObjectBase,
}

impl DynamicObject {
    pub fn new() -> Self {
        DynamicObject::with_tag(BASE_TYPE_TAG)
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        DynamicObject {
            tag: tag.into(),
            base: ObjectBase::new(),
        }
    }

    /// Creates a tagged, named object.
    pub fn named(tag: impl Into<String>, name: impl Into<String>) -> Self {
        DynamicObject {
            tag: tag.into(),
            base: ObjectBase::named(name),
        }
    }

    /// Builder-style dynamic property write.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.base.set_dynamic_property(name, value);
        self
    }

    /// Builder-style child adoption.
    pub fn with_child(mut self, child: impl Reflect) -> Self {
        self.base.adopt(Box::new(child));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.base.dynamic_property(name)
    }
}

impl Default for DynamicObject {
    fn default() -> Self {
        DynamicObject::new()
    }
}

impl Reflect for DynamicObject {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn object(&self) -> &ObjectBase {
        &self.base
    }

    fn object_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
