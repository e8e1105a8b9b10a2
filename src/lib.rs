//! # Property Tree
//!
//! Serialization of live object trees into generic structured data, and
//! merging of such data back into live trees.
//!
//! Objects expose themselves through the [`Reflect`] trait: a type-tag, an
//! instance name, named properties and owned children. The merge engine
//! flattens a tree into a [`Map`] and merges a [`Map`] back, matching
//! existing children by instance name before creating new ones through an
//! [`ObjectFactory`]. The format adapters move a [`Map`] to and from JSON,
//! YAML and XML documents.
//!
//! ## Modules
//!
//! - [`value`] - Variant values and ordered maps of serialized data
//! - [`reflect`] - The reflection trait and the shared object state
//! - [`merge`] - Serialization, merging and the object factory
//! - [`format`] - JSON, YAML and XML documents and the file-level API

pub mod format;
pub mod merge;
pub mod reflect;
pub mod value;

#[cfg(test)]
mod testing;

pub use format::{
    load_xml, load_xml_new, read_json, read_yaml, save_xml, write_json, write_json_with, write_yaml,
    write_yaml_with,
};
pub use format::{FormatError, XmlOptions};
pub use merge::{
    deserialize, deserialize_all, serialize, serialize_all, ObjectFactory, SerializeOptions,
};
pub use reflect::{DynamicObject, ObjectBase, PropertyDescriptor, PropertyValue, Reflect};
pub use value::{Map, Value};
