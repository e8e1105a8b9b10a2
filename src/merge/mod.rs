//! Merge module - Serialization of live object trees and merging back.
//!
//! This module provides the engine that flattens a [`Reflect`] tree into a
//! [`Map`], merges a [`Map`] into a live tree, and the [`ObjectFactory`]
//! used to create nodes the tree does not have yet.
//!
//! [`Reflect`]: crate::reflect::Reflect
//! [`Map`]: crate::value::Map

mod deserialize;
mod factory;
mod serialize;


pub use deserialize::*;
pub use factory::*;
pub use serialize::*;
