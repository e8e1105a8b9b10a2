//! Object factory for creating nodes during deserialization.

use crate::reflect::{DynamicObject, Reflect};
use std::collections::BTreeMap;
use std::fmt;

/// Creator is a zero-argument constructor for one kind of object.
pub type Creator = Box<dyn Fn() -> Box<dyn Reflect>>;

/// ObjectFactory maps type-tags to creators.
///
/// The factory is built by the caller and handed to every deserialize call.
/// Deserialization only reads it.
#[derive(Default)]
pub struct ObjectFactory {
    creators: BTreeMap<String, Creator>,
}

impl ObjectFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        ObjectFactory::default()
    }

    /// Registers `creator` for `tag`, replacing any previous creator.
    pub fn register<F>(&mut self, tag: impl Into<String>, creator: F)
    where
        F: Fn() -> Box<dyn Reflect> + 'static,
    {
        self.creators.insert(tag.into(), Box::new(creator));
    }

    /// Registers `T::default` for `tag`.
    pub fn register_default<T>(&mut self, tag: impl Into<String>)
    where
        T: Reflect + Default,
    {
        self.register(tag, || Box::new(T::default()));
    }

    /// Registers `T::default` under the type-tag a default `T` reports.
    pub fn register_kind<T>(&mut self)
    where
        T: Reflect + Default,
    {
        let tag = T::default().type_tag().to_string();
        self.register_default::<T>(tag);
    }

    /// Registers a creator of [`DynamicObject`]s carrying `tag`.
    pub fn register_dynamic(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        let object_tag = tag.clone();
        self.register(tag, move || Box::new(DynamicObject::with_tag(object_tag.clone())));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, tag: impl Into<String>, creator: F) -> Self
    where
        F: Fn() -> Box<dyn Reflect> + 'static,
    {
        self.register(tag, creator);
        self
    }

    pub fn has(&self, tag: &str) -> bool {
        self.creators.contains_key(tag)
    }

    /// Runs the creator for `tag` once and returns the new, unparented node.
    pub fn create(&self, tag: &str) -> Option<Box<dyn Reflect>> {
        self.creators.get(tag).map(|creator| creator())
    }

    /// Creates a node for `tag` and hands it to `parent` as its last child.
    pub fn create_child<'p>(
        &self,
        tag: &str,
        parent: &'p mut dyn Reflect,
    ) -> Option<&'p mut dyn Reflect> {
        let child = self.create(tag)?;
        Some(parent.add_child(child))
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl fmt::Debug for ObjectFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("tags", &self.creators.keys().collect::<Vec<_>>())
            .finish()
    }
}
