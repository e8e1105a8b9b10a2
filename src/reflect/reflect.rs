//! The reflection seam between live objects and the merge engine.

use super::object::ObjectBase;
use crate::value::Value;
use std::any::Any;
use std::fmt;

/// Key under which an object's instance name travels in serialized data.
pub const INSTANCE_NAME_KEY: &str = "objectName";

/// Type-tag of the universal base kind, [`DynamicObject`](super::DynamicObject).
///
/// The merge engine can always create nodes of this kind, with or without a
/// factory entry.
pub const BASE_TYPE_TAG: &str = "Object";

/// PropertyDescriptor describes one named property of a live object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    /// Creates a descriptor for a readable and writable property.
    pub fn read_write(name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            readable: true,
            writable: true,
        }
    }

    /// Creates a descriptor for a property that can only be read.
    pub fn read_only(name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            readable: true,
            writable: false,
        }
    }

    /// Creates a descriptor for a property that can only be written.
    pub fn write_only(name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            readable: false,
            writable: true,
        }
    }
}

/// The value of a property as read from a live object.
///
/// Properties may hold plain values or refer to other live objects. Object
/// references are serialized in place as nested maps.
#[derive(Debug)]
pub enum PropertyValue<'a> {
    Value(Value),
    Object(&'a dyn Reflect),
    Objects(Vec<&'a dyn Reflect>),
}

impl PropertyValue<'_> {
    /// Returns the plain value, or `None` for object references.
    pub fn into_value(self) -> Option<Value> {
        match self {
            PropertyValue::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for PropertyValue<'_> {
    fn from(value: Value) -> Self {
        PropertyValue::Value(value)
    }
}

/// Reflect exposes a live object to the merge engine.
///
/// Implementors supply their type-tag and the [`ObjectBase`] holding the
/// state every object shares: instance name, dynamic properties and owned
/// children. Kinds with declared properties override [`properties`],
/// [`property`] and [`set_property`] and fall back to the base for anything
/// they do not declare.
///
/// [`properties`]: Reflect::properties
/// [`property`]: Reflect::property
/// [`set_property`]: Reflect::set_property
pub trait Reflect: Any + fmt::Debug {
    /// The string identifying this object's kind.
    fn type_tag(&self) -> &str;

    fn object(&self) -> &ObjectBase;

    fn object_mut(&mut self) -> &mut ObjectBase;

    /// Ordered property descriptors. Defaults to the dynamic properties.
    fn properties(&self) -> Vec<PropertyDescriptor> {
        self.object().dynamic_descriptors()
    }

    /// Reads a property by name.
    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        self.object()
            .dynamic_property(name)
            .cloned()
            .map(PropertyValue::Value)
    }

    /// Writes a property by name, coercing the value to the property's type.
    ///
    /// Returns false when the value was ignored, either because the name is
    /// unknown to a closed property set or because it could not be coerced.
    /// The default stores the value as a dynamic property.
    fn set_property(&mut self, name: &str, value: &Value) -> bool {
        self.object_mut().write(name, value)
    }

    fn instance_name(&self) -> &str {
        self.object().name()
    }

    fn set_instance_name(&mut self, name: String) {
        self.object_mut().set_name(name);
    }

    fn children(&self) -> &[Box<dyn Reflect>] {
        self.object().children()
    }

    fn children_mut(&mut self) -> &mut [Box<dyn Reflect>] {
        self.object_mut().children_mut()
    }

    /// Takes ownership of `child` as the last child and returns it.
    fn add_child(&mut self, child: Box<dyn Reflect>) -> &mut dyn Reflect {
        self.object_mut().adopt(child)
    }
}

impl dyn Reflect {
    /// Returns `true` if the underlying object is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }

    /// Finds a descendant by instance name.
    ///
    /// Direct children are searched before grandchildren.
    pub fn find_child(&self, name: &str) -> Option<&(dyn Reflect + 'static)> {
        if let Some(child) = self.children().iter().find(|c| c.instance_name() == name) {
            return Some(&**child);
        }
        self.children()
            .iter()
            .find_map(|c| (**c).find_child(name))
    }

    /// Returns the direct children carrying `tag`, in order.
    pub fn children_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a (dyn Reflect + 'static)> + 'a {
        self.children()
            .iter()
            .filter(move |c| c.type_tag() == tag)
            .map(|c| &**c)
    }
}
