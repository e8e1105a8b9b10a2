//! Reflect module - How the merge engine sees live objects.
//!
//! A live object exposes its type-tag, instance name, properties and owned
//! children through the [`Reflect`] trait. [`ObjectBase`] carries the shared
//! state and [`DynamicObject`] is the kind the engine can always create.

mod object;
mod reflect;

pub use object::*;
pub use reflect::*;
